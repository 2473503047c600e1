/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits together with their
/// completion dates and cached streak fields.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use crate::domain::{Category, DomainError, Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// A habit is always read and written as a whole, completions included, so
/// `completed_dates` and the cached streak fields can't drift apart.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Replace an existing habit, completions and streak fields included
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit and all of its completions
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List habits in creation order, optionally limited to one category
    fn list_habits(&self, category: Option<Category>) -> Result<Vec<Habit>, StorageError>;

    /// Delete every habit and completion, returning how many habits were removed
    fn clear_all(&self) -> Result<u32, StorageError>;
}
