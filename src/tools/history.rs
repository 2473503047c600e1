/// Tool for a single habit's completion history
///
/// This module implements the habit_history MCP tool: a day-by-day series
/// ending today (or covering one calendar month), plus the habit's overall
/// success rate.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, DayCompletion};
use crate::domain::{days_in_month, parse_date, DomainError, HabitId};
use crate::storage::{HabitStorage, StorageError};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Parameters for the history tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct HistoryParams {
    /// ID of the habit
    pub habit_id: String,
    /// Number of days to include, ending today (default: 30, max: 365)
    pub days: Option<u32>,
    /// A whole calendar month as YYYY-MM instead of the last N days
    pub month: Option<String>,
}

/// Response from the history tool
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub habit_id: String,
    pub title: String,
    pub days: Vec<DayCompletion>,
    /// Completed days inside the window
    pub completed_in_range: u32,
    pub success_rate: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub message: String,
}

/// Build the completion history for one habit
pub fn get_habit_history<S: HabitStorage>(
    storage: &S,
    params: HistoryParams,
    today: NaiveDate,
) -> Result<HistoryResponse, StorageError> {
    let (end, days, label) = match (params.month.as_deref(), params.days) {
        (Some(_), Some(_)) => {
            return Err(DomainError::Validation {
                message: "Pass either days or month, not both".to_string(),
            }
            .into());
        }
        (Some(month), None) => {
            let (last_day, length) = month_span(month)?;
            (last_day, length, format!("{} days of {}", length, month))
        }
        (None, days) => {
            let days = days.unwrap_or(DEFAULT_HISTORY_DAYS);
            if days == 0 || days > MAX_HISTORY_DAYS {
                return Err(DomainError::Validation {
                    message: format!("days must be between 1 and {}", MAX_HISTORY_DAYS),
                }
                .into());
            }
            (today, days, format!("last {} days", days))
        }
    };

    let habit_id = HabitId::from_string(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;

    let engine = AnalyticsEngine::new();
    let series = engine.habit_completion_data(&habit, end, days);
    let success_rate = engine.success_rate(&habit, today);
    let completed_in_range = series.iter().filter(|d| d.completed).count() as u32;

    let message = format!(
        "📅 '{}': {} of the {} completed\nSuccess rate since {}: {}%\nStreak: {} (best {})",
        habit.title,
        completed_in_range,
        label,
        habit.created_at,
        success_rate,
        habit.current_streak,
        habit.longest_streak
    );

    Ok(HistoryResponse {
        habit_id: habit.id.to_string(),
        title: habit.title,
        days: series,
        completed_in_range,
        success_rate,
        current_streak: habit.current_streak,
        longest_streak: habit.longest_streak,
        message,
    })
}

/// Last day and length of a `YYYY-MM` month
fn month_span(month: &str) -> Result<(NaiveDate, u32), DomainError> {
    let invalid = || DomainError::Validation {
        message: format!("Invalid month '{}' (expected YYYY-MM)", month),
    };
    let first = parse_date(&format!("{}-01", month)).map_err(|_| invalid())?;
    let length = days_in_month(first.year(), first.month()).ok_or_else(invalid)?;
    let last = first.with_day(length).ok_or_else(invalid)?;
    Ok((last, length))
}
