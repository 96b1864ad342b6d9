//! Tool error types

use serde::Serialize;
use thiserror::Error;

use crate::conversion::ConversionError;
use crate::db::DbError;

/// Errors surfaced by tool calls
#[derive(Debug, Error)]
pub enum ToolError {
    /// Request failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// Unit or amount the engine cannot work with
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("{0}")]
    NotFound(String),

    /// Request conflicts with existing data (duplicates, ingredients in use)
    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

/// Result type for tool operations
pub type ToolResult<T> = Result<T, ToolError>;

impl ToolError {
    /// Whether the caller sent something wrong, as opposed to a server fault
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ToolError::Database(_))
    }

    /// Error for a failed insert: a UNIQUE violation becomes `conflict()`
    pub fn from_insert(e: DbError, conflict: impl FnOnce() -> ToolError) -> Self {
        if e.is_unique_violation() {
            conflict()
        } else {
            ToolError::Database(e)
        }
    }
}

impl From<rusqlite::Error> for ToolError {
    fn from(e: rusqlite::Error) -> Self {
        ToolError::Database(DbError::Sqlite(e))
    }
}

/// JSON body returned for not-found and conflict outcomes
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ToolError> for ErrorResponse {
    fn from(e: &ToolError) -> Self {
        Self { error: e.to_string() }
    }
}
