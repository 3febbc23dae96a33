//! The outward face handed to a query builder.
//!
//! [`Driver`] is the constructor shape a builder's sqlite3 dialect expects: open-mode
//! constants plus a throwing and a completion-style constructor. Whether the richer
//! [`client::Client`] hooks are available is decided once, by [`detect_adapter`], and cached in
//! [`ADAPTER`].

#[cfg(feature = "dialect")]
pub mod client;

use std::sync::LazyLock;

use crate::error::SqliteCompatError;
use crate::sqlite::Database;
use crate::types::OpenMode;

#[cfg(feature = "dialect")]
use crate::sqlite::SqliteOptions;

#[cfg(feature = "dialect")]
pub use client::{Client, QueryMethod, QueryObject, RawResponse, Response, SqliteCompatClient};

/// Name reported to the query builder for this driver.
pub const DRIVER_NAME: &str = "rusqlite";
/// Dialect tag whose SQL generation and result shaping the builder should reuse.
pub const DIALECT: &str = "sqlite3";

/// Exported driver constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Driver;

impl Driver {
    pub const OPEN_READONLY: u32 = Database::OPEN_READONLY;
    pub const OPEN_READWRITE: u32 = Database::OPEN_READWRITE;
    pub const OPEN_CREATE: u32 = Database::OPEN_CREATE;

    /// Open a connection, returning the error on failure.
    ///
    /// # Errors
    /// Returns `SqliteCompatError::OpenError` if the engine cannot open `path`.
    pub fn new(path: &str, mode: Option<u32>) -> Result<Database, SqliteCompatError> {
        Database::open_with_mode(path, mode.map(OpenMode::from_bits).unwrap_or_default())
    }

    /// Open a connection and report the outcome to `on_open` on a later turn.
    pub fn new_with<F>(path: &str, mode: Option<u32>, on_open: F) -> Option<Database>
    where
        F: FnOnce(Result<(), SqliteCompatError>) + Send + 'static,
    {
        Database::open_with(path, mode.map(OpenMode::from_bits), on_open)
    }
}

/// Which shape this build exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    /// Builder client hooks available on top of the driver.
    Rich,
    /// Only the bare [`Driver`] constructor; the caller wires it in by hand.
    Bare,
}

/// Decided once at initialization; see [`detect_adapter`].
pub static ADAPTER: LazyLock<Adapter> = LazyLock::new(detect_adapter);

/// Report whether the builder dialect hooks were compiled in.
#[must_use]
pub fn detect_adapter() -> Adapter {
    if cfg!(feature = "dialect") {
        Adapter::Rich
    } else {
        Adapter::Bare
    }
}

impl Adapter {
    #[must_use]
    pub fn current() -> Adapter {
        *ADAPTER
    }

    #[must_use]
    pub fn driver_name(self) -> &'static str {
        DRIVER_NAME
    }

    /// The dialect tag, only when the builder hooks are present.
    #[must_use]
    pub fn dialect(self) -> Option<&'static str> {
        match self {
            Adapter::Rich => Some(DIALECT),
            Adapter::Bare => None,
        }
    }

    /// A builder client using [`Database`] as its driver factory; `None` for the bare shape.
    #[cfg(feature = "dialect")]
    #[must_use]
    pub fn client(self, options: SqliteOptions) -> Option<SqliteCompatClient> {
        match self {
            Adapter::Rich => Some(SqliteCompatClient::new(options)),
            Adapter::Bare => None,
        }
    }
}
