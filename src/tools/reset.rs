/// Tool for wiping all habit data
///
/// This module implements the habit_reset_all MCP tool. It removes every
/// habit and its completion history, and only runs with an explicit confirm.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::storage::{HabitStorage, StorageError};

/// Parameters for clearing all data
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResetAllParams {
    /// Must be true; deletes every habit and completion permanently
    pub confirm: bool,
}

/// Response from clearing all data
#[derive(Debug, Serialize)]
pub struct ResetAllResponse {
    pub success: bool,
    pub habits_deleted: u32,
    pub completions_deleted: u32,
    pub message: String,
}

/// Delete every habit using the provided storage
pub fn reset_all<S: HabitStorage>(
    storage: &S,
    params: ResetAllParams,
) -> Result<ResetAllResponse, StorageError> {
    if !params.confirm {
        return Err(DomainError::Validation {
            message: "Set confirm to true to delete all habits and data".to_string(),
        }
        .into());
    }

    let completions_deleted = storage
        .list_habits(None)?
        .iter()
        .map(|h| h.total_completions() as u32)
        .sum();
    let habits_deleted = storage.clear_all()?;
    tracing::warn!(
        "Cleared all data: {} habits, {} completions",
        habits_deleted,
        completions_deleted
    );

    Ok(ResetAllResponse {
        success: true,
        habits_deleted,
        completions_deleted,
        message: format!(
            "🧹 All data cleared: {} habit{} and {} completion{} deleted",
            habits_deleted,
            if habits_deleted == 1 { "" } else { "s" },
            completions_deleted,
            if completions_deleted == 1 { "" } else { "s" }
        ),
    })
}
