/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Frequency, Habit, HabitDraft};
use crate::storage::{HabitStorage, StorageError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit, 3-50 characters
    pub title: String,
    /// Optional longer description, up to 200 characters
    pub description: Option<String>,
    /// One of: health, productivity, mindfulness, fitness, learning, custom
    pub category: String,
    /// Hex color like #10B981 (optional)
    pub color: Option<String>,
    /// One of: daily, weekly, custom (optional, defaults to daily)
    pub frequency: Option<String>,
    /// Reminder time as HH:MM (optional)
    pub reminder_time: Option<String>,
    pub reminder_enabled: Option<bool>,
    /// Weekday indices 0-6, Sunday = 0 (optional)
    pub target_days: Option<Vec<u8>>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
    today: NaiveDate,
) -> Result<CreateHabitResponse, StorageError> {
    let category = params.category.parse::<Category>()?;
    let frequency = params
        .frequency
        .as_deref()
        .map(str::parse::<Frequency>)
        .transpose()?
        .unwrap_or_default();

    let habit = Habit::new(
        HabitDraft {
            title: params.title,
            description: params.description,
            category,
            color: params.color,
            frequency,
            reminder_time: params.reminder_time,
            reminder_enabled: params.reminder_enabled.unwrap_or(false),
            target_days: params.target_days,
        },
        today,
    )?;

    storage.create_habit(&habit)?;
    tracing::info!("Created habit '{}' ({})", habit.title, habit.id);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("✅ Created habit '{}'! Ready to start your streak!", habit.title),
    })
}
