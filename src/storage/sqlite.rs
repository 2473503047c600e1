/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::collections::HashMap;
use std::path::PathBuf;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{format_date, parse_date, Category, DomainError, Frequency, Habit, HabitId};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, title, description, category, color, frequency, reminder_time,
    reminder_enabled, target_days, created_at, current_streak, longest_streak, last_completed_date";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        // Completions are removed through ON DELETE CASCADE
        conn.execute("PRAGMA foreign_keys = ON", []).map_err(|e| {
            StorageError::Connection(format!("Failed to enable foreign keys: {}", e))
        })?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Map a `habits` row, leaving `completed_dates` empty
    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id: String = row.get(0)?;
        let category: String = row.get(3)?;
        let frequency: String = row.get(5)?;
        let target_days: Option<String> = row.get(8)?;
        let created_at: String = row.get(9)?;

        let target_days = target_days
            .map(|json| serde_json::from_str::<Vec<u8>>(&json))
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

        Ok(Habit {
            id: HabitId::from_string(&id).map_err(|e| conversion_error(0, e))?,
            title: row.get(1)?,
            description: row.get(2)?,
            category: category
                .parse::<Category>()
                .map_err(|e| conversion_error(3, e))?,
            color: row.get(4)?,
            frequency: frequency
                .parse::<Frequency>()
                .map_err(|e| conversion_error(5, e))?,
            reminder_time: row.get(6)?,
            reminder_enabled: row.get(7)?,
            target_days,
            created_at: parse_date(&created_at).map_err(|e| conversion_error(9, e))?,
            current_streak: row.get(10)?,
            longest_streak: row.get(11)?,
            completed_dates: Vec::new(),
            last_completed_date: row.get(12)?,
        })
    }

    fn completions_for(&self, habit_id: &HabitId) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_on FROM habit_completions WHERE habit_id = ?1 ORDER BY completed_on",
        )?;
        let dates = stmt
            .query_map(params![habit_id.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }

    fn all_completions(&self) -> Result<HashMap<String, Vec<String>>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_id, completed_on FROM habit_completions ORDER BY completed_on",
        )?;
        let mut rows = stmt.query([])?;

        let mut by_habit: HashMap<String, Vec<String>> = HashMap::new();
        while let Some(row) = rows.next()? {
            by_habit
                .entry(row.get(0)?)
                .or_default()
                .push(row.get(1)?);
        }
        Ok(by_habit)
    }

    fn insert_completions(&self, habit: &Habit) -> Result<(), StorageError> {
        // Duplicates collapse onto the (habit_id, completed_on) key
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO habit_completions (habit_id, completed_on) VALUES (?1, ?2)",
        )?;
        for date in &habit.completed_dates {
            stmt.execute(params![habit.id.as_str(), date])?;
        }
        Ok(())
    }

    fn target_days_json(habit: &Habit) -> Result<Option<String>, StorageError> {
        Ok(habit
            .target_days
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?)
    }
}

fn conversion_error(column: usize, err: DomainError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        self.conn.execute(
            "INSERT INTO habits (
                id, title, description, category, color, frequency, reminder_time,
                reminder_enabled, target_days, created_at, current_streak, longest_streak,
                last_completed_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                habit.id.as_str(),
                habit.title,
                habit.description,
                habit.category.as_str(),
                habit.color,
                habit.frequency.as_str(),
                habit.reminder_time,
                habit.reminder_enabled,
                Self::target_days_json(habit)?,
                format_date(habit.created_at),
                habit.current_streak,
                habit.longest_streak,
                habit.last_completed_date,
            ],
        )?;
        self.insert_completions(habit)?;

        tx.commit()?;
        tracing::debug!("Created habit: {} ({})", habit.title, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let habit = self
            .conn
            .query_row(
                &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
                params![habit_id.as_str()],
                Self::habit_from_row,
            )
            .optional()?;

        let mut habit = habit.ok_or_else(|| StorageError::HabitNotFound {
            habit_id: habit_id.to_string(),
        })?;
        habit.completed_dates = self.completions_for(habit_id)?;
        Ok(habit)
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                title = ?2,
                description = ?3,
                category = ?4,
                color = ?5,
                frequency = ?6,
                reminder_time = ?7,
                reminder_enabled = ?8,
                target_days = ?9,
                current_streak = ?10,
                longest_streak = ?11,
                last_completed_date = ?12
             WHERE id = ?1",
            params![
                habit.id.as_str(),
                habit.title,
                habit.description,
                habit.category.as_str(),
                habit.color,
                habit.frequency.as_str(),
                habit.reminder_time,
                habit.reminder_enabled,
                Self::target_days_json(habit)?,
                habit.current_streak,
                habit.longest_streak,
                habit.last_completed_date,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        self.conn.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1",
            params![habit.id.as_str()],
        )?;
        self.insert_completions(habit)?;

        tx.commit()?;
        tracing::debug!("Updated habit: {} ({})", habit.title, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![habit_id.as_str()])?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self, category: Option<Category>) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!("SELECT {} FROM habits", HABIT_COLUMNS);
        if category.is_some() {
            sql.push_str(" WHERE category = ?1");
        }
        // rowid breaks ties between habits created on the same day
        sql.push_str(" ORDER BY created_at, rowid");

        let mut stmt = self.conn.prepare(&sql)?;
        let habits = match category {
            Some(c) => stmt
                .query_map(params![c.as_str()], Self::habit_from_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], Self::habit_from_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mut completions = self.all_completions()?;
        Ok(habits
            .into_iter()
            .map(|mut habit| {
                habit.completed_dates = completions.remove(habit.id.as_str()).unwrap_or_default();
                habit
            })
            .collect())
    }

    fn clear_all(&self) -> Result<u32, StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        self.conn.execute("DELETE FROM habit_completions", [])?;
        let removed = self.conn.execute("DELETE FROM habits", [])?;

        tx.commit()?;
        tracing::debug!("Cleared all habits ({} removed)", removed);
        Ok(removed as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::HabitDraft;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn new_habit(title: &str, category: Category) -> Habit {
        Habit::new(
            HabitDraft {
                title: title.to_string(),
                category,
                target_days: Some(vec![1, 2]),
                reminder_time: Some("08:00".to_string()),
                ..Default::default()
            },
            today(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_get_round_trip() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut habit = new_habit("Drink water", Category::Health);
        habit.toggle_completion("2024-06-11").unwrap();
        habit.current_streak = 1;
        habit.longest_streak = 4;

        storage.create_habit(&habit).unwrap();
        let loaded = storage.get_habit(&habit.id).unwrap();
        assert_eq!(loaded, habit);
    }

    #[test]
    fn test_get_missing_habit() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let result = storage.get_habit(&HabitId::from_string("nope").unwrap());
        assert!(matches!(result, Err(StorageError::HabitNotFound { .. })));
    }

    #[test]
    fn test_update_replaces_completions() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut habit = new_habit("Journal", Category::Mindfulness);
        habit.toggle_completion("2024-06-10").unwrap();
        storage.create_habit(&habit).unwrap();

        habit.toggle_completion("2024-06-10").unwrap();
        habit.toggle_completion("2024-06-12").unwrap();
        habit.title = "Evening journal".to_string();
        storage.update_habit(&habit).unwrap();

        let loaded = storage.get_habit(&habit.id).unwrap();
        assert_eq!(loaded.title, "Evening journal");
        assert_eq!(loaded.completed_dates, vec!["2024-06-12".to_string()]);
        assert_eq!(loaded.last_completed_date.as_deref(), Some("2024-06-12"));
    }

    #[test]
    fn test_update_missing_habit() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let habit = new_habit("Journal", Category::Mindfulness);
        assert!(matches!(
            storage.update_habit(&habit),
            Err(StorageError::HabitNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_removes_completions() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut habit = new_habit("Stretch", Category::Fitness);
        habit.toggle_completion("2024-06-12").unwrap();
        storage.create_habit(&habit).unwrap();

        storage.delete_habit(&habit.id).unwrap();
        assert!(storage.get_habit(&habit.id).is_err());
        assert!(storage.delete_habit(&habit.id).is_err());

        let leftover: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM habit_completions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(leftover, 0);
    }

    #[test]
    fn test_list_keeps_creation_order_and_filters() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let first = new_habit("Walk the dog", Category::Health);
        let second = new_habit("Learn Spanish", Category::Learning);
        let third = new_habit("Eat fruit", Category::Health);
        for habit in [&first, &second, &third] {
            storage.create_habit(habit).unwrap();
        }

        let titles: Vec<String> = storage
            .list_habits(None)
            .unwrap()
            .into_iter()
            .map(|h| h.title)
            .collect();
        assert_eq!(titles, vec!["Walk the dog", "Learn Spanish", "Eat fruit"]);

        let health = storage.list_habits(Some(Category::Health)).unwrap();
        assert_eq!(health.len(), 2);
        assert!(health.iter().all(|h| h.category == Category::Health));
    }

    #[test]
    fn test_clear_all() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let mut walk = new_habit("Walk the dog", Category::Health);
        walk.toggle_completion("2024-06-11").unwrap();
        walk.toggle_completion("2024-06-12").unwrap();
        storage.create_habit(&walk).unwrap();
        storage
            .create_habit(&new_habit("Learn Spanish", Category::Learning))
            .unwrap();

        assert_eq!(storage.clear_all().unwrap(), 2);
        assert!(storage.list_habits(None).unwrap().is_empty());

        let leftover: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM habit_completions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(leftover, 0);
        assert_eq!(storage.clear_all().unwrap(), 0);
    }
}
