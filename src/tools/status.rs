/// Tool for checking habit status and streaks
///
/// This module implements the habit_status MCP tool. Checking status also
/// refreshes each habit's cached streak as of today, so a streak that lapsed
/// overnight reads as zero without waiting for the next toggle.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{compute_streak, should_reset_streak, Habit, HabitId, StreakResult};
use crate::storage::{HabitStorage, StorageError};

/// Parameters for checking habit status
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatusParams {
    /// ID of a specific habit (optional, shows all habits if omitted)
    pub habit_id: Option<String>,
}

/// Information about a single habit's status
#[derive(Debug, Serialize)]
pub struct HabitStatus {
    pub habit_id: String,
    pub title: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed_date: Option<String>,
    pub badge: Option<String>,
    /// "new", "completed_today", "on_track" or "streak_broken"
    pub status: String,
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitStatus>,
    /// Number of habits whose stored streak changed during the refresh
    pub refreshed: u32,
    pub summary: String,
    pub message: String,
}

fn status_label(habit: &Habit, today: NaiveDate) -> &'static str {
    if habit.completed_dates.is_empty() {
        "new"
    } else if habit.is_completed_on(today) {
        "completed_today"
    } else if should_reset_streak(habit, today) {
        "streak_broken"
    } else {
        "on_track"
    }
}

/// Recompute a habit's streak and persist it if it changed
///
/// Returns whether the stored record was updated. A habit whose history
/// can't be parsed keeps its stored values.
pub fn refresh_streak<S: HabitStorage>(
    storage: &S,
    habit: &mut Habit,
    today: NaiveDate,
) -> Result<bool, StorageError> {
    let streak = match compute_streak(habit, today) {
        Ok(streak) => streak,
        Err(e) => {
            tracing::warn!("Skipping streak refresh for habit {}: {}", habit.id, e);
            return Ok(false);
        }
    };

    if habit.streak_matches(&streak) {
        return Ok(false);
    }

    habit.apply_streak(&streak);
    storage.update_habit(habit)?;
    tracing::debug!(
        "Refreshed streak for habit {}: current {}, longest {}",
        habit.id,
        habit.current_streak,
        habit.longest_streak
    );
    Ok(true)
}

/// Get status for habits using the provided storage
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    params: StatusParams,
    today: NaiveDate,
) -> Result<StatusResponse, StorageError> {
    let mut habits = match params.habit_id {
        Some(id) => vec![storage.get_habit(&HabitId::from_string(&id)?)?],
        None => storage.list_habits(None)?,
    };

    let mut refreshed = 0;
    for habit in habits.iter_mut() {
        if refresh_streak(storage, habit, today)? {
            refreshed += 1;
        }
    }

    let statuses: Vec<HabitStatus> = habits
        .iter()
        .map(|habit| HabitStatus {
            habit_id: habit.id.to_string(),
            title: habit.title.clone(),
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            last_completed_date: habit.last_completed_date.clone(),
            badge: StreakResult {
                current_streak: habit.current_streak,
                longest_streak: habit.longest_streak,
                last_completed_date: habit.last_completed_date.clone(),
            }
            .badge(),
            status: status_label(habit, today).to_string(),
        })
        .collect();

    let summary = if statuses.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let active_count = statuses.iter().filter(|h| h.current_streak > 0).count();
        format!(
            "📊 Status: {} of {} habits on a streak. Total streak days: {}",
            active_count,
            statuses.len(),
            statuses.iter().map(|h| h.current_streak).sum::<u32>()
        )
    };

    let message = format!(
        "{}\n\n{}",
        summary,
        statuses
            .iter()
            .map(|h| format!(
                "🎯 {} [{}]\n   Current streak: {} days | Best: {} days | Status: {}{}",
                h.title,
                h.habit_id,
                h.current_streak,
                h.longest_streak,
                h.status,
                h.last_completed_date
                    .as_ref()
                    .map(|last| format!("\n   Last completed: {}", last))
                    .unwrap_or_default()
            ))
            .collect::<Vec<_>>()
            .join("\n\n")
    );

    Ok(StatusResponse {
        habits: statuses,
        refreshed,
        summary,
        message,
    })
}
