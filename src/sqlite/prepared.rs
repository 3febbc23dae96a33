use std::fmt;

use tracing::{debug, trace, warn};

use crate::callback::{AllArgs, Completion, EachArgs, EachCallbacks, GetArgs, RunArgs, deliver};
use crate::error::SqliteCompatError;
use crate::results::{Row, RunResult};
use crate::types::Params;

use super::connection::Database;
use super::params::normalize;
use super::query::{build_first_row, build_rows, drain, inserts_rows};

/// Handle to one prepared `SQLite` statement, borrowed from its [`Database`].
///
/// The borrow ties the statement's lifetime to the connection: the connection cannot be closed
/// while a statement is alive. Parameters stored with [`Statement::bind`] are reused by every
/// later call that supplies none of its own.
pub struct Statement<'db> {
    db: &'db Database,
    stmt: rusqlite::Statement<'db>,
    sql: String,
    bound: Option<Params>,
    inserts: bool,
}

impl<'db> Statement<'db> {
    pub(crate) fn new(db: &'db Database, stmt: rusqlite::Statement<'db>, sql: &str) -> Self {
        Self {
            db,
            stmt,
            sql: sql.to_owned(),
            bound: None,
            inserts: inserts_rows(sql),
        }
    }

    /// Store parameters for later parameterless calls. Does not touch the engine.
    pub fn bind(&mut self, params: impl Into<Params>) -> &mut Self {
        self.bound = Some(params.into());
        self
    }

    /// Execute for side effects and report the inserted row id and change count.
    ///
    /// # Errors
    /// Without a completion, returns the engine error. With one, the error is handed to the
    /// completion and `Ok(None)` is returned.
    pub fn run<'a>(
        &mut self,
        args: impl Into<RunArgs<'a>>,
    ) -> Result<Option<RunResult>, SqliteCompatError> {
        let (params, done) = args.into().resolve();
        let result = self.run_values(params.as_ref());
        deliver(result, done)
    }

    /// Execute and return the first row, if any.
    ///
    /// # Errors
    /// Same contract as [`Statement::run`].
    pub fn get<'a>(
        &mut self,
        args: impl Into<GetArgs<'a>>,
    ) -> Result<Option<Row>, SqliteCompatError> {
        let (params, done) = args.into().resolve();
        let result = self.get_values(params.as_ref());
        deliver(result, done).map(Option::flatten)
    }

    /// Execute and return every row in engine order.
    ///
    /// # Errors
    /// Same contract as [`Statement::run`].
    pub fn all<'a>(&mut self, args: impl Into<AllArgs<'a>>) -> Result<Vec<Row>, SqliteCompatError> {
        let (params, done) = args.into().resolve();
        let result = self.all_values(params.as_ref());
        deliver(result, done).map(Option::unwrap_or_default)
    }

    /// Execute, then feed each row to the row routine and finish with the row count.
    ///
    /// The result set is collected before the first row routine runs.
    ///
    /// # Errors
    /// Without callbacks, returns the engine error. With callbacks, both routines see the
    /// error and `Ok(0)` is returned.
    pub fn each<'a>(&mut self, args: impl Into<EachArgs<'a>>) -> Result<usize, SqliteCompatError> {
        let (params, callbacks) = args.into().resolve();
        let rows = self.all_values(params.as_ref());
        dispatch_each(rows, callbacks)
    }

    /// No-op; the engine keeps no cursor between calls. Bound parameters are kept.
    pub fn reset(&mut self) -> &mut Self {
        self
    }

    /// Release the engine-level handle.
    ///
    /// # Errors
    /// Same contract as [`Statement::run`].
    pub fn finalize(self, done: Option<Completion<'_, ()>>) -> Result<(), SqliteCompatError> {
        debug!(sql = %self.sql, "finalize statement");
        let result = self.stmt.finalize().map_err(SqliteCompatError::from);
        deliver(result, done).map(|_| ())
    }

    /// True when executing the statement cannot write to the database.
    #[must_use]
    pub fn readonly(&self) -> bool {
        self.stmt.readonly()
    }

    /// The SQL text this statement was prepared from.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    fn effective<'p>(&'p self, explicit: Option<&'p Params>) -> Option<&'p Params> {
        explicit.or(self.bound.as_ref())
    }

    pub(crate) fn run_values(
        &mut self,
        explicit: Option<&Params>,
    ) -> Result<RunResult, SqliteCompatError> {
        let values = normalize(self.effective(explicit));
        trace!(sql = %self.sql, params = values.len(), "run");
        drain(&mut self.stmt, &values)?;
        let conn = &self.db.conn;
        let changes = if self.stmt.readonly() {
            0
        } else {
            conn.changes() as u64
        };
        Ok(RunResult {
            last_id: (self.inserts && changes > 0).then(|| conn.last_insert_rowid()),
            changes,
        })
    }

    pub(crate) fn get_values(
        &mut self,
        explicit: Option<&Params>,
    ) -> Result<Option<Row>, SqliteCompatError> {
        let values = normalize(self.effective(explicit));
        trace!(sql = %self.sql, params = values.len(), "get");
        build_first_row(&mut self.stmt, &values)
    }

    pub(crate) fn all_values(
        &mut self,
        explicit: Option<&Params>,
    ) -> Result<Vec<Row>, SqliteCompatError> {
        let values = normalize(self.effective(explicit));
        trace!(sql = %self.sql, params = values.len(), "all");
        build_rows(&mut self.stmt, &values)
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

/// Fan a collected result out to `each` callbacks.
pub(crate) fn dispatch_each(
    rows: Result<Vec<Row>, SqliteCompatError>,
    callbacks: Option<EachCallbacks<'_>>,
) -> Result<usize, SqliteCompatError> {
    let Some(EachCallbacks {
        mut on_row,
        on_done,
    }) = callbacks
    else {
        return rows.map(|rows| rows.len());
    };
    match rows {
        Ok(rows) => {
            for row in &rows {
                on_row(Ok(row));
            }
            if let Some(done) = on_done {
                done(Ok(rows.len()));
            }
            Ok(rows.len())
        }
        Err(err) => {
            warn!(error = %err, "routing error to each callbacks");
            on_row(Err(&err));
            if let Some(done) = on_done {
                done(Err(err));
            }
            Ok(0)
        }
    }
}
