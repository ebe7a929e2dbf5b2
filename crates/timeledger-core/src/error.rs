//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::event::Category;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A data file could not be parsed; the target collection is unchanged.
    #[error("Invalid {category} file: {reason}")]
    InvalidFile {
        /// Collection the file was meant to replace.
        category: Category,
        /// What was wrong with it.
        reason: String,
    },

    /// A timestamp string is not an absolute date-time.
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A file or directory could not be read.
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Mail parsing error.
    #[error("MIME error: {0}")]
    Mime(#[from] timeledger_mime::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
