/// Basic integration tests
use growmate_mcp::*;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

fn day(s: &str) -> NaiveDate {
    parse_date(s).expect("valid test date")
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_uses_pinned_today() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = GrowMateServer::new(temp_file.path().to_path_buf(), Some(day("2024-06-12")))
            .await
            .expect("Failed to create server");

        assert_eq!(server.today(), day("2024-06-12"));
        assert!(server.storage().list_habits(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let server = GrowMateServer::new(db_path.clone(), Some(day("2024-06-12")))
            .await
            .expect("Failed to create first server");

        let mut habit = Habit::new(
            HabitDraft {
                title: "Evening walk".to_string(),
                category: Category::Fitness,
                ..Default::default()
            },
            server.today(),
        )
        .unwrap();
        habit.toggle_completion("2024-06-11").unwrap();
        habit.toggle_completion("2024-06-12").unwrap();
        habit.apply_streak(&compute_streak(&habit, server.today()).unwrap());
        server.storage().create_habit(&habit).unwrap();
        drop(server);

        let reopened = GrowMateServer::new(db_path, Some(day("2024-06-12")))
            .await
            .expect("Failed to create second server");
        let loaded = reopened.storage().get_habit(&habit.id).unwrap();
        assert_eq!(loaded, habit);
    }

    #[tokio::test]
    async fn test_startup_refresh_zeroes_lapsed_streaks() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let server = GrowMateServer::new(db_path.clone(), Some(day("2024-06-12")))
            .await
            .unwrap();
        let mut habit = Habit::new(
            HabitDraft {
                title: "Evening walk".to_string(),
                ..Default::default()
            },
            server.today(),
        )
        .unwrap();
        habit.toggle_completion("2024-06-12").unwrap();
        habit.apply_streak(&compute_streak(&habit, server.today()).unwrap());
        server.storage().create_habit(&habit).unwrap();
        assert_eq!(
            server.refresh_streaks().unwrap(),
            StreakRefresh {
                habits: 1,
                refreshed: 0
            }
        );
        drop(server);

        let later = GrowMateServer::new(db_path, Some(day("2024-06-20")))
            .await
            .unwrap();
        assert_eq!(
            later.refresh_streaks().unwrap(),
            StreakRefresh {
                habits: 1,
                refreshed: 1
            }
        );
        let loaded = later.storage().get_habit(&habit.id).unwrap();
        assert_eq!(loaded.current_streak, 0);
        assert_eq!(loaded.longest_streak, 1);
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf())
            .expect("Failed to create storage");

        let _: &dyn HabitStorage = &storage;
        assert!(storage.list_habits(Some(Category::Health)).unwrap().is_empty());
    }
}
