/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, StreakResult) and the date
/// arithmetic they are built on. Everything in here is pure: no storage, no
/// clock reads. Callers always pass "today" in explicitly.

pub mod dates;
pub mod habit;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use dates::*;
pub use habit::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid date format: '{0}' (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),

    #[error("Invalid habit title: {0}")]
    InvalidTitle(String),

    #[error("Invalid category '{0}'. Valid options: health, productivity, mindfulness, fitness, learning, custom")]
    InvalidCategory(String),

    #[error("Invalid frequency '{0}'. Valid options: daily, weekly, custom")]
    InvalidFrequency(String),

    #[error("Invalid color '{0}' (expected #RRGGBB)")]
    InvalidColor(String),
}
