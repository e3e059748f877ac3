//! Error types for prompt generation

use thiserror::Error;

/// Result type for prompt generation operations
pub type PromptResult<T> = Result<T, PromptError>;

/// Errors that can occur while building a prompt document
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Schema introspection error: {0}")]
    SchemaError(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl PromptError {
    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PromptError::ConnectionError(msg) => {
                format!(
                    "Could not open the database: {}. Check the file path and that it is a SQLite database.",
                    msg
                )
            }
            PromptError::InvalidPath(msg) => format!("Invalid path: {}", msg),
            PromptError::SchemaError(msg) => format!("Schema introspection failed: {}", msg),
            PromptError::UserCancelled => "Operation cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }
}
