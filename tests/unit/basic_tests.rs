/// Basic unit tests to verify core functionality through the public API
use growmate_mcp::*;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

fn day(s: &str) -> NaiveDate {
    parse_date(s).expect("valid test date")
}

fn habit_with(dates: &[&str]) -> Habit {
    let mut habit = Habit::new(
        HabitDraft {
            title: "Test Habit".to_string(),
            category: Category::Health,
            ..Default::default()
        },
        day("2024-06-01"),
    )
    .expect("valid habit");
    habit.completed_dates = dates.iter().map(|d| d.to_string()).collect();
    habit
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            HabitDraft {
                title: "  Drink water  ".to_string(),
                description: Some("Eight glasses".to_string()),
                category: Category::Health,
                ..Default::default()
            },
            day("2024-06-01"),
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.title, "Drink water");
        assert_eq!(habit.frequency, Frequency::Daily);
        assert_eq!(habit.current_streak, 0);
        assert_eq!(habit.longest_streak, 0);
        assert!(habit.completed_dates.is_empty());
        assert_eq!(habit.last_completed_date, None);
    }

    #[test]
    fn test_habit_validation() {
        let too_short = Habit::new(
            HabitDraft {
                title: "ab".to_string(),
                ..Default::default()
            },
            day("2024-06-01"),
        );
        assert!(matches!(too_short, Err(DomainError::InvalidTitle(_))));

        let bad_color = Habit::new(
            HabitDraft {
                title: "Stretch".to_string(),
                color: Some("blue".to_string()),
                ..Default::default()
            },
            day("2024-06-01"),
        );
        assert!(matches!(bad_color, Err(DomainError::InvalidColor(_))));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Fitness".parse::<Category>().unwrap(), Category::Fitness);
        assert!("gardening".parse::<Category>().is_err());
    }

    #[test]
    fn test_scenario_three_day_run() {
        let habit = habit_with(&["2024-06-10", "2024-06-11", "2024-06-12"]);
        let result = compute_streak(&habit, day("2024-06-12")).unwrap();
        assert_eq!(result.current_streak, 3);
        assert_eq!(result.longest_streak, 3);
        assert_eq!(result.last_completed_date.as_deref(), Some("2024-06-12"));
    }

    #[test]
    fn test_scenario_lapsed_run() {
        let habit = habit_with(&["2024-06-10", "2024-06-11", "2024-06-12"]);
        let result = compute_streak(&habit, day("2024-06-14")).unwrap();
        assert_eq!(result.current_streak, 0);
        assert_eq!(result.last_completed_date.as_deref(), Some("2024-06-12"));
    }

    #[test]
    fn test_scenario_weekly_totals() {
        let mut run = habit_with(&["2024-06-10", "2024-06-11", "2024-06-12"]);
        run.title = "Run".to_string();
        let mut read = habit_with(&["2024-06-10"]);
        read.title = "Read".to_string();

        let analytics = AnalyticsEngine::new().weekly_analytics(&[run, read], day("2024-06-12"));
        assert_eq!(analytics.total_completed, 4);
        assert_eq!(analytics.best_habit.as_deref(), Some("Run"));
        assert_eq!(analytics.missed_days, 2);
    }

    #[test]
    fn test_scenario_sunday_week_start() {
        assert_eq!(start_of_week(day("2024-06-16")), day("2024-06-10"));
        assert_eq!(start_of_week(day("2024-06-10")), day("2024-06-10"));
    }

    #[test]
    fn test_malformed_date_is_reported() {
        let habit = habit_with(&["2024-06-12", "June 13"]);
        let result = compute_streak(&habit, day("2024-06-13"));
        assert_eq!(
            result,
            Err(DomainError::InvalidDateFormat("June 13".to_string()))
        );
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = GrowMateServer::new(temp_file.path().to_path_buf(), None).await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }
}
