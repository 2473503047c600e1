/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a user's habit,
/// along with validation, completion toggling and merging of streak results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    format_date, parse_date, Category, DomainError, Frequency, HabitId, StreakResult,
};

/// Default color for habits created without one
pub const DEFAULT_COLOR: &str = "#6366F1";

/// A habit represents something the user wants to do every day
///
/// Streak fields are a denormalized cache. They are only ever written through
/// [`Habit::apply_streak`], never set by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub title: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Category for organization (health, productivity, etc.)
    pub category: Category,
    /// Hex color used by clients when rendering the habit
    pub color: String,
    /// How often this habit is meant to be performed
    pub frequency: Frequency,
    /// Optional reminder time as `HH:MM`
    pub reminder_time: Option<String>,
    pub reminder_enabled: bool,
    /// Weekday indices (Sunday = 0) for custom schedules
    pub target_days: Option<Vec<u8>>,
    /// Day this habit was created
    pub created_at: NaiveDate,
    pub current_streak: u32,
    /// High-water mark, never decreases
    pub longest_streak: u32,
    /// ISO dates on which the habit was done, unordered
    pub completed_dates: Vec<String>,
    /// Always the maximum of `completed_dates`
    pub last_completed_date: Option<String>,
}

/// User supplied fields for a new habit
#[derive(Debug, Clone, Default)]
pub struct HabitDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub color: Option<String>,
    pub frequency: Frequency,
    pub reminder_time: Option<String>,
    pub reminder_enabled: bool,
    pub target_days: Option<Vec<u8>>,
}

/// Partial update of a habit's metadata
///
/// `None` leaves a field untouched; for optional fields `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct HabitChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Category>,
    pub color: Option<String>,
    pub frequency: Option<Frequency>,
    pub reminder_time: Option<Option<String>>,
    pub reminder_enabled: Option<bool>,
    pub target_days: Option<Option<Vec<u8>>>,
}

impl HabitChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.color.is_none()
            && self.frequency.is_none()
            && self.reminder_time.is_none()
            && self.reminder_enabled.is_none()
            && self.target_days.is_none()
    }
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The habit starts with no completions and zeroed streaks.
    pub fn new(draft: HabitDraft, today: NaiveDate) -> Result<Self, DomainError> {
        let title = draft.title.trim().to_string();
        let color = draft.color.unwrap_or_else(|| DEFAULT_COLOR.to_string());

        Self::validate_title(&title)?;
        Self::validate_description(&draft.description)?;
        Self::validate_color(&color)?;
        Self::validate_reminder_time(&draft.reminder_time)?;
        Self::validate_target_days(&draft.target_days)?;

        Ok(Self {
            id: HabitId::new(),
            title,
            description: draft.description,
            category: draft.category,
            color,
            frequency: draft.frequency,
            reminder_time: draft.reminder_time,
            reminder_enabled: draft.reminder_enabled,
            target_days: draft.target_days,
            created_at: today,
            current_streak: 0,
            longest_streak: 0,
            completed_dates: Vec::new(),
            last_completed_date: None,
        })
    }

    /// Apply a partial metadata update
    ///
    /// Every new value is validated before anything is applied, so a failed
    /// update leaves the habit untouched.
    pub fn update(&mut self, changes: HabitChanges) -> Result<(), DomainError> {
        let title = changes.title.map(|t| t.trim().to_string());

        if let Some(ref new_title) = title {
            Self::validate_title(new_title)?;
        }
        if let Some(ref new_desc) = changes.description {
            Self::validate_description(new_desc)?;
        }
        if let Some(ref new_color) = changes.color {
            Self::validate_color(new_color)?;
        }
        if let Some(ref new_time) = changes.reminder_time {
            Self::validate_reminder_time(new_time)?;
        }
        if let Some(ref new_days) = changes.target_days {
            Self::validate_target_days(new_days)?;
        }

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_description) = changes.description {
            self.description = new_description;
        }
        if let Some(new_category) = changes.category {
            self.category = new_category;
        }
        if let Some(new_color) = changes.color {
            self.color = new_color;
        }
        if let Some(new_frequency) = changes.frequency {
            self.frequency = new_frequency;
        }
        if let Some(new_time) = changes.reminder_time {
            self.reminder_time = new_time;
        }
        if let Some(enabled) = changes.reminder_enabled {
            self.reminder_enabled = enabled;
        }
        if let Some(new_days) = changes.target_days {
            self.target_days = new_days;
        }

        Ok(())
    }

    /// Mark or unmark the habit as done on `date`
    ///
    /// Returns `true` if the date is now completed, `false` if it was removed.
    /// The date is validated first; an invalid date leaves the habit untouched.
    /// Streak fields are not touched here, see [`crate::compute_streak`].
    pub fn toggle_completion(&mut self, date: &str) -> Result<bool, DomainError> {
        let day = format_date(parse_date(date)?);

        let completed = if let Some(pos) = self.completed_dates.iter().position(|d| *d == day) {
            self.completed_dates.remove(pos);
            false
        } else {
            self.completed_dates.push(day);
            true
        };

        self.last_completed_date = self
            .completed_dates
            .iter()
            .filter_map(|d| parse_date(d).ok())
            .max()
            .map(format_date);

        Ok(completed)
    }

    /// Merge a freshly computed streak into the cached fields
    pub fn apply_streak(&mut self, streak: &StreakResult) {
        self.current_streak = streak.current_streak;
        self.longest_streak = streak.longest_streak;
        self.last_completed_date = streak.last_completed_date.clone();
    }

    /// Whether the cached streak fields already match `streak`
    pub fn streak_matches(&self, streak: &StreakResult) -> bool {
        self.current_streak == streak.current_streak
            && self.longest_streak == streak.longest_streak
            && self.last_completed_date == streak.last_completed_date
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        let day = format_date(date);
        self.completed_dates.iter().any(|d| *d == day)
    }

    pub fn total_completions(&self) -> usize {
        self.completed_dates.len()
    }

    // Validation helper methods

    /// Validate habit title according to business rules
    fn validate_title(title: &str) -> Result<(), DomainError> {
        let length = title.chars().count();

        if length == 0 {
            return Err(DomainError::InvalidTitle("Title is required".to_string()));
        }
        if length < 3 {
            return Err(DomainError::InvalidTitle(
                "Title must be at least 3 characters".to_string(),
            ));
        }
        if length > 50 {
            return Err(DomainError::InvalidTitle(
                "Title must be less than 50 characters".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.chars().count() > 200 {
                return Err(DomainError::Validation {
                    message: "Description must be less than 200 characters".to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_color(color: &str) -> Result<(), DomainError> {
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(DomainError::InvalidColor(color.to_string()));
        }
        Ok(())
    }

    /// Reminder times are 24h `HH:MM`
    fn validate_reminder_time(time: &Option<String>) -> Result<(), DomainError> {
        if let Some(t) = time {
            if chrono::NaiveTime::parse_from_str(t, "%H:%M").is_err() || t.len() != 5 {
                return Err(DomainError::Validation {
                    message: format!("Reminder time '{}' must be HH:MM", t),
                });
            }
        }
        Ok(())
    }

    fn validate_target_days(days: &Option<Vec<u8>>) -> Result<(), DomainError> {
        if let Some(days) = days {
            if let Some(bad) = days.iter().find(|d| **d > 6) {
                return Err(DomainError::Validation {
                    message: format!("Target day {} is out of range 0-6", bad),
                });
            }
            let mut seen = [false; 7];
            for day in days {
                if std::mem::replace(&mut seen[*day as usize], true) {
                    return Err(DomainError::Validation {
                        message: format!("Target day {} listed twice", day),
                    });
                }
            }
        }
        Ok(())
    }
}
