/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like Category, Frequency, and the
/// habit ID type that are used by Habit and the analytics code.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// Identifiers are opaque strings. New habits get a random UUID, but any
/// non-empty string loaded from storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Habit ID cannot be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Categories for organizing habits into different life areas
///
/// The set is fixed; `Custom` is a single bucket rather than a free-form name.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Productivity,
    Mindfulness,
    Fitness,
    Learning,
    #[default]
    Custom,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Health,
        Category::Productivity,
        Category::Mindfulness,
        Category::Fitness,
        Category::Learning,
        Category::Custom,
    ];

    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Productivity => "productivity",
            Category::Mindfulness => "mindfulness",
            Category::Fitness => "fitness",
            Category::Learning => "learning",
            Category::Custom => "custom",
        }
    }

    /// Get the display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Productivity => "Productivity",
            Category::Mindfulness => "Mindfulness",
            Category::Fitness => "Fitness",
            Category::Learning => "Learning",
            Category::Custom => "Custom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| DomainError::InvalidCategory(s.to_string()))
    }
}

/// How often a habit is meant to be performed
///
/// This is informational only. Streaks always count consecutive calendar days
/// regardless of frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            _ => Err(DomainError::InvalidFrequency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!(" Fitness ".parse::<Category>().unwrap(), Category::Fitness);
        assert!("social".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Mindfulness).unwrap();
        assert_eq!(json, "\"mindfulness\"");
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!("WEEKLY".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert!(matches!(
            "hourly".parse::<Frequency>(),
            Err(DomainError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn test_habit_id_rejects_blank() {
        assert!(HabitId::from_string("   ").is_err());
        assert_eq!(HabitId::from_string("abc123").unwrap().as_str(), "abc123");
        assert_ne!(HabitId::new(), HabitId::new());
    }
}
