/// Public library interface for the GrowMate MCP server
///
/// This module exports the server, the habit domain model, the storage layer
/// and the analytics engine so they can be used by other applications or
/// tests.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
pub mod analytics;
pub mod mcp;
pub mod tools;

// Re-export public modules and types
pub use analytics::{AnalyticsEngine, DayCompletion, WeeklyAnalytics};
pub use domain::*;
pub use storage::{HabitStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a startup streak refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakRefresh {
    /// Habits examined
    pub habits: u32,
    /// Habits whose stored streak changed
    pub refreshed: u32,
}

/// Main GrowMate server
///
/// Owns the SQLite store and decides which calendar day counts as "today"
/// for every request. That decision is the only place the system clock is
/// read.
pub struct GrowMateServer {
    storage: SqliteStorage,
    today_override: Option<NaiveDate>,
}

impl GrowMateServer {
    /// Create a new server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(
        db_path: PathBuf,
        today_override: Option<NaiveDate>,
    ) -> Result<Self, ServerError> {
        tracing::info!("Initializing GrowMate server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(storage, today_override))
    }

    /// Wrap an already opened store
    pub fn with_storage(storage: SqliteStorage, today_override: Option<NaiveDate>) -> Self {
        if let Some(day) = today_override {
            tracing::info!("Pinning today to {}", day);
        }
        Self {
            storage,
            today_override,
        }
    }

    /// The calendar day requests are evaluated against
    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Recompute every stored streak as of today, persisting the ones that
    /// changed
    pub fn refresh_streaks(&self) -> Result<StreakRefresh, ServerError> {
        let today = self.today();
        let habits = self.storage.list_habits(None)?;
        let mut summary = StreakRefresh {
            habits: habits.len() as u32,
            refreshed: 0,
        };
        for mut habit in habits {
            if tools::refresh_streak(&self.storage, &mut habit, today)? {
                summary.refreshed += 1;
            }
        }
        Ok(summary)
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        let summary = self.refresh_streaks()?;
        tracing::info!(
            "Server started successfully, found {} existing habits ({} streaks refreshed)",
            summary.habits,
            summary.refreshed
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }
}
