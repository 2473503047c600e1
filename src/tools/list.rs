/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::success_rate;
use crate::domain::{Category, DomainError, Habit};
use crate::storage::{HabitStorage, StorageError};

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Only show habits in this category (optional)
    pub category: Option<String>,
    /// Sort by: 'created', 'title', 'streak', 'completions' (default: created)
    pub sort_by: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub title: String,
    pub category: Category,
    pub frequency: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    /// Percentage of days since creation with a completion
    pub success_rate: u32,
    pub completed_today: bool,
    pub last_completed_date: Option<String>,
}

/// Summary statistics for all listed habits
#[derive(Debug, Serialize)]
pub struct HabitListSummary {
    pub total_habits: u32,
    pub completed_today: u32,
    pub avg_success_rate: f64,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub summary: HabitListSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    Created,
    Title,
    Streak,
    Completions,
}

fn parse_sort_key(value: Option<&str>) -> Result<SortKey, DomainError> {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("created") => Ok(SortKey::Created),
        Some("title") | Some("name") => Ok(SortKey::Title),
        Some("streak") => Ok(SortKey::Streak),
        Some("completions") => Ok(SortKey::Completions),
        Some(other) => Err(DomainError::Validation {
            message: format!(
                "Invalid sort_by '{}'. Valid options: created, title, streak, completions",
                other
            ),
        }),
    }
}

fn summarize(habit: Habit, today: NaiveDate) -> HabitSummary {
    HabitSummary {
        success_rate: success_rate(&habit, today),
        completed_today: habit.is_completed_on(today),
        habit_id: habit.id.to_string(),
        category: habit.category,
        frequency: habit.frequency.to_string(),
        current_streak: habit.current_streak,
        longest_streak: habit.longest_streak,
        total_completions: habit.total_completions() as u32,
        last_completed_date: habit.last_completed_date,
        title: habit.title,
    }
}

/// List habits using the provided storage
///
/// Streak fields are reported as stored; `habit_status` refreshes them.
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
    today: NaiveDate,
) -> Result<ListHabitsResponse, StorageError> {
    let category_filter = params
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;
    let sort_key = parse_sort_key(params.sort_by.as_deref())?;

    let habits = storage.list_habits(category_filter)?;

    let mut habit_summaries: Vec<HabitSummary> =
        habits.into_iter().map(|h| summarize(h, today)).collect();

    // Stable sorts keep creation order among equals
    match sort_key {
        SortKey::Created => {}
        SortKey::Title => habit_summaries.sort_by_key(|h| h.title.to_lowercase()),
        SortKey::Streak => habit_summaries.sort_by(|a, b| b.current_streak.cmp(&a.current_streak)),
        SortKey::Completions => {
            habit_summaries.sort_by(|a, b| b.total_completions.cmp(&a.total_completions))
        }
    }

    let total_habits = habit_summaries.len() as u32;
    let completed_today = habit_summaries.iter().filter(|h| h.completed_today).count() as u32;
    let avg_success_rate = if habit_summaries.is_empty() {
        0.0
    } else {
        habit_summaries
            .iter()
            .map(|h| f64::from(h.success_rate))
            .sum::<f64>()
            / habit_summaries.len() as f64
    };

    Ok(ListHabitsResponse {
        habits: habit_summaries,
        summary: HabitListSummary {
            total_habits,
            completed_today,
            avg_success_rate,
        },
    })
}
