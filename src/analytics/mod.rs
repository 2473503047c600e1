/// Analytics engine for weekly statistics and completion charts
///
/// Everything here is a pure function of a habit snapshot and the caller's
/// "today". Results are recomputed on every request and never stored.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{format_date, start_of_week, week_dates, weekday_label, Category, Habit};

/// Completion statistics for the Monday-to-Sunday week containing "today"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAnalytics {
    /// Monday that begins the window
    pub week_start_date: String,
    /// Completions across all habits inside the window
    pub total_completed: u32,
    /// Percentage of all habit-days in the full week, 0-100
    pub completion_rate: u32,
    /// Title of the habit with the strictly highest count, first wins ties
    pub best_habit: Option<String>,
    /// Habit-days elapsed so far this week that were not completed
    pub missed_days: u32,
    /// Completions per category; categories without habits are absent
    pub category_breakdown: BTreeMap<Category, u32>,
}

/// One bar of a completion chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCompletion {
    pub date: String,
    /// Short weekday label ("Mon" .. "Sun")
    pub day: String,
    /// At least one habit (or the given habit) was done that day
    pub completed: bool,
}

/// Analytics engine for processing habit data
///
/// Stateless; kept as a type so the server can hand it around next to the
/// storage layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Weekly statistics for `habits` as of `today`
    pub fn weekly_analytics(&self, habits: &[Habit], today: NaiveDate) -> WeeklyAnalytics {
        compute_weekly_analytics(habits, today)
    }

    /// Per-day "anything done" series for the week containing `today`
    pub fn weekly_chart(&self, habits: &[Habit], today: NaiveDate) -> Vec<DayCompletion> {
        weekly_chart(habits, today)
    }

    /// Per-day series for a single habit covering the last `days` days
    pub fn habit_completion_data(
        &self,
        habit: &Habit,
        today: NaiveDate,
        days: u32,
    ) -> Vec<DayCompletion> {
        habit_completion_data(habit, today, days)
    }

    /// Share of days since creation on which the habit was done, 0-100
    pub fn success_rate(&self, habit: &Habit, today: NaiveDate) -> u32 {
        success_rate(habit, today)
    }
}

/// Compute weekly statistics for `habits` as of `today`
///
/// Completions are matched by set membership against the seven window date
/// strings, so entries that aren't canonical ISO dates simply never count.
pub fn compute_weekly_analytics(habits: &[Habit], today: NaiveDate) -> WeeklyAnalytics {
    let week_start = start_of_week(today);
    let window = week_dates(week_start);
    let window_set: HashSet<&str> = window.iter().map(String::as_str).collect();

    let mut total_completed = 0u32;
    let mut category_breakdown = BTreeMap::new();
    let mut best_habit = None;
    let mut best_count = 0u32;

    for habit in habits {
        let count = habit
            .completed_dates
            .iter()
            .filter(|d| window_set.contains(d.as_str()))
            .count() as u32;

        total_completed += count;
        *category_breakdown.entry(habit.category).or_insert(0) += count;

        if count > best_count {
            best_count = count;
            best_habit = Some(habit.title.clone());
        }
    }

    let habit_count = habits.len() as u32;
    let possible = habit_count * 7;
    let completion_rate = if possible > 0 {
        (f64::from(total_completed) / f64::from(possible) * 100.0).round() as u32
    } else {
        0
    };

    let today_str = format_date(today);
    let days_elapsed = window
        .iter()
        .position(|d| *d == today_str)
        .map_or(0, |index| index as u32 + 1);
    let missed_days = (habit_count * days_elapsed).saturating_sub(total_completed);

    WeeklyAnalytics {
        week_start_date: window[0].clone(),
        total_completed,
        completion_rate,
        best_habit,
        missed_days,
        category_breakdown,
    }
}

/// For each day of the current week, whether any habit was completed
pub fn weekly_chart(habits: &[Habit], today: NaiveDate) -> Vec<DayCompletion> {
    let week_start = start_of_week(today);

    (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            let key = format_date(date);
            let done_count = habits
                .iter()
                .filter(|h| h.completed_dates.iter().any(|d| *d == key))
                .count();

            DayCompletion {
                date: key,
                day: weekday_label(date).to_string(),
                completed: done_count > 0,
            }
        })
        .collect()
}

/// Completion series for one habit, oldest day first, ending at `today`
pub fn habit_completion_data(habit: &Habit, today: NaiveDate, days: u32) -> Vec<DayCompletion> {
    let completed: HashSet<&str> = habit.completed_dates.iter().map(String::as_str).collect();

    (0..i64::from(days))
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let key = format_date(date);
            DayCompletion {
                completed: completed.contains(key.as_str()),
                day: weekday_label(date).to_string(),
                date: key,
            }
        })
        .collect()
}

/// Completions over days since creation (inclusive), capped at 100
pub fn success_rate(habit: &Habit, today: NaiveDate) -> u32 {
    if habit.completed_dates.is_empty() {
        return 0;
    }
    let days_since_creation = ((today - habit.created_at).num_days() + 1).max(1);
    let rate = (habit.completed_dates.len() as f64 / days_since_creation as f64 * 100.0).round();
    rate.min(100.0) as u32
}
