use thiserror::Error;

/// Every failure the driver surface can report.
///
/// Engine failures (bad SQL, bind-type mismatches, constraint violations) are forwarded as
/// [`SqliteCompatError::SqliteError`] without reclassification; the message is whatever the
/// engine produced.
#[derive(Debug, Error)]
pub enum SqliteCompatError {
    #[error("Failed to open database at {path}: {source}")]
    OpenError {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
