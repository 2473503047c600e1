/// Tool for toggling habit completions
///
/// This module implements the habit_toggle MCP tool: mark a day as done, or
/// undo it if it already was, then recompute and persist the streak.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{compute_streak, format_date, parse_date, HabitId};
use crate::storage::{HabitStorage, StorageError};

/// Parameters for toggling a habit completion
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleHabitParams {
    /// ID of the habit to toggle
    pub habit_id: String,
    /// Day to toggle as YYYY-MM-DD (optional, defaults to today)
    pub date: Option<String>,
}

/// Response from toggling a habit
#[derive(Debug, Serialize)]
pub struct ToggleHabitResponse {
    pub success: bool,
    /// Whether the day is completed after the toggle
    pub completed: bool,
    pub date: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub message: String,
}

/// Toggle a habit completion using the provided storage
///
/// A malformed date is rejected before anything changes. If the streak can't
/// be recomputed (a corrupt stored date), the completion is still saved and
/// the previous streak fields are kept.
pub fn toggle_habit<S: HabitStorage>(
    storage: &S,
    params: ToggleHabitParams,
    today: NaiveDate,
) -> Result<ToggleHabitResponse, StorageError> {
    let habit_id = HabitId::from_string(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let date = match params.date.as_deref() {
        Some(raw) => format_date(parse_date(raw)?),
        None => format_date(today),
    };
    let completed = habit.toggle_completion(&date)?;

    match compute_streak(&habit, today) {
        Ok(streak) => habit.apply_streak(&streak),
        Err(e) => {
            tracing::warn!(
                "Could not recompute streak for habit {}: {}; keeping previous values",
                habit.id,
                e
            );
        }
    }

    storage.update_habit(&habit)?;
    tracing::debug!(
        "Toggled habit {} on {} (completed: {}, streak: {})",
        habit.id,
        date,
        completed,
        habit.current_streak
    );

    let message = if completed {
        format!(
            "🔥 Marked '{}' done for {}! Current streak: {} day{}",
            habit.title,
            date,
            habit.current_streak,
            if habit.current_streak == 1 { "" } else { "s" }
        )
    } else {
        format!(
            "↩️ Unmarked '{}' for {}. Current streak: {} day{}",
            habit.title,
            date,
            habit.current_streak,
            if habit.current_streak == 1 { "" } else { "s" }
        )
    };

    Ok(ToggleHabitResponse {
        success: true,
        completed,
        date,
        current_streak: habit.current_streak,
        longest_streak: habit.longest_streak,
        message,
    })
}
