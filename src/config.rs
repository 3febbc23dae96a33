//! Query-builder style client configuration.
//!
//! ```rust
//! use sqlite_compat::config::ClientConfig;
//!
//! let cfg = ClientConfig::from_json_str(
//!     r#"{ "client": "sqlite3", "connection": { "filename": ":memory:" } }"#,
//! ).unwrap();
//! assert_eq!(cfg.connection.filename, ":memory:");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SqliteCompatError;
use crate::sqlite::SqliteOptions;
use crate::types::OpenMode;

/// Client names accepted in the `client` field.
pub const CLIENT_NAMES: &[&str] = &["sqlite3", "sqlite", "rusqlite"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_client")]
    pub client: String,
    pub connection: ConnectionConfig,
    /// Open-mode bitmask (`1` read-only, `2` read-write, `4` create).
    #[serde(default)]
    pub mode: Option<u32>,
    #[serde(default)]
    pub pragmas: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub filename: String,
}

fn default_client() -> String {
    "sqlite3".to_string()
}

impl ClientConfig {
    /// # Errors
    /// Returns `SqliteCompatError::JsonError` on malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, SqliteCompatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    /// Returns `SqliteCompatError` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SqliteCompatError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Validate and convert into open options.
    ///
    /// # Errors
    /// Returns `SqliteCompatError::ConfigError` for an unknown client or an empty filename.
    pub fn to_options(&self) -> Result<SqliteOptions, SqliteCompatError> {
        if !CLIENT_NAMES.contains(&self.client.as_str()) {
            return Err(SqliteCompatError::ConfigError(format!(
                "unsupported client '{}'; expected one of {CLIENT_NAMES:?}",
                self.client
            )));
        }
        if self.connection.filename.is_empty() {
            return Err(SqliteCompatError::ConfigError(
                "connection.filename must not be empty".into(),
            ));
        }
        let mut opts = SqliteOptions::new(self.connection.filename.clone());
        if let Some(bits) = self.mode {
            opts = opts.with_mode(OpenMode::from_bits(bits));
        }
        opts.pragmas.clone_from(&self.pragmas);
        Ok(opts)
    }
}
