use thiserror::Error;

use crate::types::QueryKind;

#[derive(Debug, Error)]
pub enum QueryBuilderError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    /// The statement text was rejected by the backend. Treat as a programming error.
    #[error("Query could not be prepared. Query: {sql}: {message}")]
    PrepareFailed { sql: String, message: String },

    #[error("Could not perform {operation}: {message}")]
    MutationFailed {
        operation: QueryKind,
        message: String,
    },

    #[error("Cannot {operation} `{table}` without any data")]
    EmptyPayload {
        operation: QueryKind,
        table: String,
    },

    #[error("Parameter binding error: {0}")]
    ParameterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl QueryBuilderError {
    /// Errors that indicate broken SQL or broken binding rather than a runtime condition.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QueryBuilderError::PrepareFailed { .. } | QueryBuilderError::ParameterError(_)
        )
    }
}

/// Errors raised by [`crate::fixtures::FixtureLoader`].
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Fixture directory must be a string and a valid directory")]
    InvalidDirectory,

    #[error("Fixture data for table \"{0}\" not found")]
    NotFound(String),

    #[error("Failed to load fixture data for \"{0}\"")]
    FailedToLoad(String),

    #[error("Please specify a parser for the fixture data")]
    NoParser,

    #[error("Fixture data contains invalid JSON")]
    InvalidJson,

    #[error("Fixture data contains invalid XML")]
    InvalidXml,

    #[error("Please specify an index that exists")]
    IndexNotFound,

    #[error("Please specify an offset that exists")]
    OffsetNotFound,

    #[error("Length must be a positive integer greater than zero")]
    InvalidLength,

    #[error("Please specify a valid range")]
    InvalidRange,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
