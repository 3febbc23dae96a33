use rusqlite::OpenFlags;

use crate::error::SqliteCompatError;
use crate::types::OpenMode;

use super::connection::Database;

/// Path sentinel for a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub mode: OpenMode,
    /// Statements run once right after open (e.g. `PRAGMA journal_mode = WAL;`).
    pub pragmas: Option<String>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            mode: OpenMode::default(),
            pragmas: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.opts.mode = mode;
        self
    }

    #[must_use]
    pub fn pragmas(mut self, pragmas: impl Into<String>) -> Self {
        self.opts.pragmas = Some(pragmas.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open a [`Database`] with these options.
    ///
    /// # Errors
    ///
    /// Returns `SqliteCompatError` if opening or the pragma batch fails.
    pub fn build(self) -> Result<Database, SqliteCompatError> {
        Database::from_options(&self.finish())
    }
}

impl Database {
    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path.into())
    }
}

/// Map the driver's mode bitmask onto engine open flags.
///
/// Read-only wins over read-write. An empty mask means the default read-write-create.
#[must_use]
pub fn open_flags(mode: OpenMode) -> OpenFlags {
    let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if mode.contains(OpenMode::READONLY) {
        flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
    } else if mode.bits() == 0 {
        flags |= OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
    } else {
        flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
        if mode.contains(OpenMode::CREATE) {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }
    }
    flags
}
