/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients (like Claude)
/// can call to interact with the habit tracker. Each tool takes the storage
/// layer, its parameters and, where dates matter, the calendar day the caller
/// considers "today".

pub mod create;
pub mod delete;
pub mod history;
pub mod insights;
pub mod list;
pub mod reset;
pub mod status;
pub mod toggle;
pub mod update;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use history::*;
pub use insights::*;
pub use list::*;
pub use reset::*;
pub use status::*;
pub use toggle::*;
pub use update::*;
