/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deletion is permanent:
/// the habit and its completion history are removed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::HabitId;
use crate::storage::{HabitStorage, StorageError};

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete
    pub habit_id: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Delete a habit using the provided storage
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, StorageError> {
    let habit_id = HabitId::from_string(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;

    storage.delete_habit(&habit_id)?;
    tracing::info!("Deleted habit '{}' ({})", habit.title, habit.id);

    Ok(DeleteHabitResponse {
        success: true,
        message: format!(
            "🗑️ Deleted habit '{}' and {} completion{}",
            habit.title,
            habit.total_completions(),
            if habit.total_completions() == 1 { "" } else { "s" }
        ),
    })
}
