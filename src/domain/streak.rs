/// Streak calculation
///
/// This module turns a habit's completion history into its current streak,
/// its longest streak and the most recent completion date. The computation is
/// a pure function of the habit and the caller's notion of "today".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{format_date, is_consecutive_day, parse_date, yesterday, DomainError, Habit};

/// Freshly computed streak information for a habit
///
/// Merged back into the habit with [`Habit::apply_streak`]; never stored on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    /// Consecutive days ending today or yesterday
    pub current_streak: u32,
    /// Best streak ever recorded for this habit
    pub longest_streak: u32,
    /// Most recent completion, `None` only when there are no completions
    pub last_completed_date: Option<String>,
}

impl StreakResult {
    /// Badge text shown next to a habit, `None` when there is no streak
    pub fn badge(&self) -> Option<String> {
        match self.current_streak {
            0 => None,
            1 => Some("🔥 1 Day".to_string()),
            n => Some(format!("🔥 {} Days", n)),
        }
    }
}

/// Compute a habit's streak as of `today`
///
/// The current streak is a greedy run counted backwards from the most recent
/// completion, provided that completion is today or yesterday. The longest
/// streak is a high-water mark: the larger of the stored value and the new
/// current streak. Completion history is never rescanned for older runs.
pub fn compute_streak(habit: &Habit, today: NaiveDate) -> Result<StreakResult, DomainError> {
    if habit.completed_dates.is_empty() {
        return Ok(StreakResult {
            current_streak: 0,
            longest_streak: habit.longest_streak,
            last_completed_date: None,
        });
    }

    let mut dates = habit
        .completed_dates
        .iter()
        .map(|d| parse_date(d))
        .collect::<Result<Vec<_>, _>>()?;

    // Newest first; a duplicated day would otherwise read as a gap
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.dedup();

    let latest = dates[0];
    let current_streak = if latest == today || latest == yesterday(today) {
        1 + dates
            .windows(2)
            .take_while(|pair| is_consecutive_day(pair[1], pair[0]))
            .count() as u32
    } else {
        0
    };

    Ok(StreakResult {
        current_streak,
        longest_streak: current_streak.max(habit.longest_streak),
        last_completed_date: Some(format_date(latest)),
    })
}

/// Whether a stored streak is stale and would drop to zero on recompute
///
/// True when the habit has a last completion that is neither today nor
/// yesterday and today itself isn't completed.
pub fn should_reset_streak(habit: &Habit, today: NaiveDate) -> bool {
    let Some(last) = habit
        .last_completed_date
        .as_deref()
        .and_then(|d| parse_date(d).ok())
    else {
        return false;
    };

    last != today && !is_consecutive_day(last, today) && !habit.is_completed_on(today)
}
