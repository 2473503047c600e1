/// Tool for weekly habit insights
///
/// This module implements the habit_insights MCP tool: weekly statistics
/// across every habit plus a seven-day "anything done" chart.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, DayCompletion, WeeklyAnalytics};
use crate::domain::Category;
use crate::storage::{HabitStorage, StorageError};

/// Parameters for weekly insights
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct InsightsParams {
    /// Only include habits in this category (optional)
    pub category: Option<String>,
}

/// Response from the insights tool
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub analytics: WeeklyAnalytics,
    pub chart: Vec<DayCompletion>,
    pub message: String,
}

/// Compute this week's analytics for the stored habits
pub fn get_weekly_insights<S: HabitStorage>(
    storage: &S,
    params: InsightsParams,
    today: NaiveDate,
) -> Result<InsightsResponse, StorageError> {
    let category_filter = params
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;

    let habits = storage.list_habits(category_filter)?;
    let engine = AnalyticsEngine::new();
    let analytics = engine.weekly_analytics(&habits, today);
    let chart = engine.weekly_chart(&habits, today);

    let message = if habits.is_empty() {
        "No habits to analyze yet. Create a habit and check back after a few days!".to_string()
    } else {
        let bars: String = chart
            .iter()
            .map(|d| format!("{} {}", d.day, if d.completed { "✅" } else { "⬜" }))
            .collect::<Vec<_>>()
            .join("  ");
        let breakdown = analytics
            .category_breakdown
            .iter()
            .map(|(category, count)| format!("{}: {}", category.display_name(), count))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "📈 Week of {}\n\
             Completed: {} ({}% of possible)\n\
             Missed so far: {}\n\
             Best habit: {}\n\
             By category: {}\n\n{}",
            analytics.week_start_date,
            analytics.total_completed,
            analytics.completion_rate,
            analytics.missed_days,
            analytics.best_habit.as_deref().unwrap_or("none yet"),
            breakdown,
            bars
        )
    };

    Ok(InsightsResponse {
        analytics,
        chart,
        message,
    })
}
