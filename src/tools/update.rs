/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool to modify
/// existing habit properties like title, category, color and reminders.
/// Completions and streaks are never touched here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, DomainError, Frequency, HabitChanges, HabitId};
use crate::storage::{HabitStorage, StorageError};

/// Parameters for updating an existing habit
///
/// Omitted fields are left alone. An empty description or reminder time
/// clears it, as does an empty target day list.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to update
    pub habit_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub frequency: Option<String>,
    pub reminder_time: Option<String>,
    pub reminder_enabled: Option<bool>,
    pub target_days: Option<Vec<u8>>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, StorageError> {
    let habit_id = HabitId::from_string(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let changes = HabitChanges {
        title: params.title,
        description: params.description.map(blank_to_none),
        category: params
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?,
        color: params.color,
        frequency: params
            .frequency
            .as_deref()
            .map(str::parse::<Frequency>)
            .transpose()?,
        reminder_time: params.reminder_time.map(blank_to_none),
        reminder_enabled: params.reminder_enabled,
        target_days: params
            .target_days
            .map(|days| if days.is_empty() { None } else { Some(days) }),
    };

    if changes.is_empty() {
        return Err(DomainError::Validation {
            message: "No fields to update".to_string(),
        }
        .into());
    }

    let reminder_change = changes.reminder_enabled;
    habit.update(changes)?;
    storage.update_habit(&habit)?;

    let message = match reminder_change {
        Some(false) => format!("🔕 Updated habit '{}' and turned reminders off", habit.title),
        Some(true) => format!("🔔 Updated habit '{}' and turned reminders on", habit.title),
        None => format!("✅ Updated habit '{}'", habit.title),
    };

    Ok(UpdateHabitResponse {
        success: true,
        message,
    })
}

fn blank_to_none(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
