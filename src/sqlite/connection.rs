use std::fmt;

use tracing::{debug, trace, warn};

use crate::callback::{AllArgs, Args, Completion, EachArgs, GetArgs, RunArgs, deliver};
use crate::error::SqliteCompatError;
use crate::results::{Row, RunResult};
use crate::types::OpenMode;

use super::config::{MEMORY_PATH, SqliteOptions, open_flags};
use super::prepared::{Statement, dispatch_each};

/// Trailing arguments of [`Database::prepare`]: parameters to pre-bind and/or a completion
/// told whether preparation succeeded.
pub type PrepareArgs<'a> = Args<Completion<'a, ()>>;

/// One engine session, exposed through the conventional sqlite3 driver surface.
///
/// The one-shot query methods (`run`, `get`, `all`, `each`) prepare a statement, execute it and
/// release it before returning, whatever the outcome. Every method that takes a completion
/// routine hands errors to it instead of returning them.
pub struct Database {
    pub(crate) conn: rusqlite::Connection,
    path: String,
    mode: OpenMode,
}

impl Database {
    pub const OPEN_READONLY: u32 = OpenMode::READONLY.bits();
    pub const OPEN_READWRITE: u32 = OpenMode::READWRITE.bits();
    pub const OPEN_CREATE: u32 = OpenMode::CREATE.bits();

    /// Open `path` (or `":memory:"`) read-write, creating it if missing.
    ///
    /// # Errors
    /// Returns `SqliteCompatError::OpenError` if the engine cannot open the file.
    pub fn open(path: &str) -> Result<Self, SqliteCompatError> {
        Self::open_with_mode(path, OpenMode::default())
    }

    /// Open `path` with an explicit mode bitmask.
    ///
    /// # Errors
    /// Returns `SqliteCompatError::OpenError` if the engine cannot open the file.
    pub fn open_with_mode(path: &str, mode: OpenMode) -> Result<Self, SqliteCompatError> {
        let flags = open_flags(mode);
        let opened = if path == MEMORY_PATH {
            rusqlite::Connection::open_in_memory_with_flags(flags)
        } else {
            rusqlite::Connection::open_with_flags(path, flags)
        };
        let conn = opened.map_err(|source| SqliteCompatError::OpenError {
            path: path.to_owned(),
            source,
        })?;
        debug!(path, mode = mode.bits(), "opened database");
        Ok(Self {
            conn,
            path: path.to_owned(),
            mode,
        })
    }

    /// Open and report the outcome through `on_open` instead of returning an error.
    ///
    /// The open itself happens now; `on_open` is handed off to a tokio task when called inside
    /// a runtime and to a spawned thread otherwise, so it is never invoked from inside this call.
    /// It may still run before this function returns on a multi-thread runtime or on the
    /// thread path; only a current-thread runtime orders it after the caller's next await.
    /// Returns `None` when the open failed.
    pub fn open_with<F>(path: &str, mode: Option<OpenMode>, on_open: F) -> Option<Self>
    where
        F: FnOnce(Result<(), SqliteCompatError>) + Send + 'static,
    {
        match Self::open_with_mode(path, mode.unwrap_or_default()) {
            Ok(db) => {
                defer(move || on_open(Ok(())));
                Some(db)
            }
            Err(err) => {
                warn!(error = %err, "open failed; notifying completion");
                defer(move || on_open(Err(err)));
                None
            }
        }
    }

    /// Open from [`SqliteOptions`], applying any configured pragmas.
    ///
    /// # Errors
    /// Returns `SqliteCompatError` if opening or the pragma batch fails.
    pub fn from_options(opts: &SqliteOptions) -> Result<Self, SqliteCompatError> {
        let db = Self::open_with_mode(&opts.db_path, opts.mode)?;
        if let Some(pragmas) = &opts.pragmas {
            db.conn.execute_batch(pragmas)?;
        }
        Ok(db)
    }

    /// The path or identifier this connection was opened with.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// One-shot `run`: prepare, execute, release.
    ///
    /// # Errors
    /// Without a completion, returns the prepare or engine error. With one, the error is handed
    /// to the completion and `Ok(None)` is returned.
    pub fn run<'a>(
        &self,
        sql: &str,
        args: impl Into<RunArgs<'a>>,
    ) -> Result<Option<RunResult>, SqliteCompatError> {
        let (params, done) = args.into().resolve();
        let result = self.one_shot(sql, |stmt| stmt.run_values(params.as_ref()));
        deliver(result, done)
    }

    /// One-shot `get`: the first row, if any.
    ///
    /// # Errors
    /// Same contract as [`Database::run`].
    pub fn get<'a>(
        &self,
        sql: &str,
        args: impl Into<GetArgs<'a>>,
    ) -> Result<Option<Row>, SqliteCompatError> {
        let (params, done) = args.into().resolve();
        let result = self.one_shot(sql, |stmt| stmt.get_values(params.as_ref()));
        deliver(result, done).map(Option::flatten)
    }

    /// One-shot `all`: every row in engine order.
    ///
    /// # Errors
    /// Same contract as [`Database::run`].
    pub fn all<'a>(
        &self,
        sql: &str,
        args: impl Into<AllArgs<'a>>,
    ) -> Result<Vec<Row>, SqliteCompatError> {
        let (params, done) = args.into().resolve();
        let result = self.one_shot(sql, |stmt| stmt.all_values(params.as_ref()));
        deliver(result, done).map(Option::unwrap_or_default)
    }

    /// One-shot `each`.
    ///
    /// # Errors
    /// Without callbacks, returns the prepare or engine error. With callbacks, both routines
    /// see the error and `Ok(0)` is returned.
    pub fn each<'a>(
        &self,
        sql: &str,
        args: impl Into<EachArgs<'a>>,
    ) -> Result<usize, SqliteCompatError> {
        let (params, callbacks) = args.into().resolve();
        let rows = self.one_shot(sql, |stmt| stmt.all_values(params.as_ref()));
        dispatch_each(rows, callbacks)
    }

    /// Run one or more statements with no binding and no result rows.
    ///
    /// # Errors
    /// Same contract as [`Database::run`].
    pub fn exec(
        &self,
        sql: &str,
        done: Option<Completion<'_, ()>>,
    ) -> Result<(), SqliteCompatError> {
        trace!(sql, "exec");
        let result = self.conn.execute_batch(sql).map_err(SqliteCompatError::from);
        deliver(result, done).map(|_| ())
    }

    /// Prepare a reusable statement, pre-binding parameters if given.
    ///
    /// # Errors
    /// Without a completion, returns the prepare error. With one, the outcome goes to the
    /// completion and a failed prepare yields `Ok(None)`.
    pub fn prepare<'a>(
        &self,
        sql: &str,
        args: impl Into<PrepareArgs<'a>>,
    ) -> Result<Option<Statement<'_>>, SqliteCompatError> {
        let (params, done) = args.into().resolve();
        let prepared = self.prepare_statement(sql).map(|mut stmt| {
            if let Some(params) = params {
                stmt.bind(params);
            }
            stmt
        });
        match (prepared, done) {
            (Ok(stmt), Some(done)) => {
                done(Ok(()));
                Ok(Some(stmt))
            }
            (Ok(stmt), None) => Ok(Some(stmt)),
            (Err(err), Some(done)) => {
                warn!(error = %err, "routing error to completion");
                done(Err(err));
                Ok(None)
            }
            (Err(err), None) => Err(err),
        }
    }

    /// Release the engine session.
    ///
    /// # Errors
    /// Same contract as [`Database::run`].
    pub fn close(self, done: Option<Completion<'_, ()>>) -> Result<(), SqliteCompatError> {
        debug!(path = %self.path, "closing database");
        let result = self
            .conn
            .close()
            .map_err(|(_conn, err)| {
                SqliteCompatError::ConnectionError(format!("close failed: {err}"))
            });
        deliver(result, done).map(|_| ())
    }

    /// Run `f` immediately. The engine executes calls in order already, so there is no queue
    /// mode to switch.
    pub fn serialize<F: FnOnce()>(&self, f: F) {
        f();
    }

    /// Run `f` immediately; see [`Database::serialize`].
    pub fn parallelize<F: FnOnce()>(&self, f: F) {
        f();
    }

    pub(crate) fn prepare_statement(&self, sql: &str) -> Result<Statement<'_>, SqliteCompatError> {
        debug!(sql, "prepare statement");
        let stmt = self.conn.prepare(sql)?;
        Ok(Statement::new(self, stmt, sql))
    }

    /// Prepare, hand the statement to `f`, then finalize it whatever `f` returned.
    ///
    /// An execution error wins over a finalize error.
    fn one_shot<T, F>(&self, sql: &str, f: F) -> Result<T, SqliteCompatError>
    where
        F: FnOnce(&mut Statement<'_>) -> Result<T, SqliteCompatError>,
    {
        let mut stmt = self.prepare_statement(sql)?;
        let outcome = f(&mut stmt);
        let released = stmt.finalize(None);
        let value = outcome?;
        released?;
        Ok(value)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Run `f` on a later scheduling turn: a tokio task if a runtime is current, else a thread.
fn defer<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move { f() });
        }
        Err(_) => {
            std::thread::spawn(f);
        }
    }
}
