use tracing::debug;

use crate::error::SqliteCompatError;
use crate::results::{Row, RunResult};
use crate::sqlite::{Database, SqliteOptions};
use crate::types::{Params, Value};

use super::{DIALECT, DRIVER_NAME};

/// The builder operation a compiled query came from; decides how it executes and how the
/// engine's answer is shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMethod {
    Select,
    First,
    Pluck(String),
    Insert,
    Update,
    Del,
    Counter,
    Raw,
}

impl QueryMethod {
    /// Write methods execute through `run`. `Raw` is decided per statement; everything else
    /// goes through `all`.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            QueryMethod::Insert | QueryMethod::Update | QueryMethod::Del | QueryMethod::Counter
        )
    }
}

/// SQL already rendered for the sqlite3 dialect, with positional bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryObject {
    pub sql: String,
    pub bindings: Vec<Value>,
    pub method: QueryMethod,
}

impl QueryObject {
    #[must_use]
    pub fn new(sql: impl Into<String>, bindings: Vec<Value>, method: QueryMethod) -> Self {
        Self {
            sql: sql.into(),
            bindings,
            method,
        }
    }
}

/// What the driver handed back, before shaping.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Rows(Vec<Row>),
    Run(RunResult),
}

/// Shaped builder result.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Rows(Vec<Row>),
    Row(Option<Row>),
    Values(Vec<Value>),
    Ids(Vec<i64>),
    Changes(u64),
    /// A raw statement that writes
    Run(RunResult),
}

/// Hooks a query builder's sqlite3 dialect calls into.
pub trait Client {
    fn driver_name(&self) -> &'static str;

    fn dialect(&self) -> &'static str;

    /// Driver factory: open a fresh connection.
    ///
    /// # Errors
    /// Returns the open error.
    fn acquire_raw_connection(&self) -> Result<Database, SqliteCompatError>;

    /// # Errors
    /// Returns the close error.
    fn destroy_raw_connection(&self, db: Database) -> Result<(), SqliteCompatError> {
        db.close(None)
    }

    /// Execute `obj` on `db` and shape the answer for its method.
    ///
    /// # Errors
    /// Returns whatever the driver call failed with.
    fn query(&self, db: &Database, obj: &QueryObject) -> Result<Response, SqliteCompatError> {
        let params = Params(obj.bindings.clone());
        let raw = match &obj.method {
            QueryMethod::Raw => raw_query(db, &obj.sql, params)?,
            method if method.is_write() => {
                RawResponse::Run(db.run(&obj.sql, params)?.unwrap_or_default())
            }
            _ => RawResponse::Rows(db.all(&obj.sql, params)?),
        };
        Ok(self.process_response(raw, &obj.method))
    }

    fn process_response(&self, raw: RawResponse, method: &QueryMethod) -> Response {
        match (raw, method) {
            (RawResponse::Rows(rows), QueryMethod::First) => Response::Row(rows.into_iter().next()),
            (RawResponse::Rows(rows), QueryMethod::Pluck(column)) => Response::Values(
                rows.iter()
                    .filter_map(|row| row.get(column).cloned())
                    .collect(),
            ),
            (RawResponse::Rows(rows), _) => Response::Rows(rows),
            (RawResponse::Run(ctx), QueryMethod::Insert) => {
                Response::Ids(ctx.last_id.into_iter().collect())
            }
            (RawResponse::Run(ctx), QueryMethod::Raw) => Response::Run(ctx),
            (RawResponse::Run(ctx), _) => Response::Changes(ctx.changes),
        }
    }
}

/// Raw SQL returns rows when the statement only reads, and a run result when it can write.
fn raw_query(db: &Database, sql: &str, params: Params) -> Result<RawResponse, SqliteCompatError> {
    let mut stmt = db.prepare_statement(sql)?;
    stmt.bind(params);
    let outcome = if stmt.readonly() {
        stmt.all(()).map(RawResponse::Rows)
    } else {
        stmt.run(()).map(|ctx| RawResponse::Run(ctx.unwrap_or_default()))
    };
    let released = stmt.finalize(None);
    let raw = outcome?;
    released?;
    Ok(raw)
}

/// The sqlite3-dialect client backed by [`Database`].
#[derive(Debug, Clone)]
pub struct SqliteCompatClient {
    options: SqliteOptions,
}

impl SqliteCompatClient {
    #[must_use]
    pub fn new(options: SqliteOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &SqliteOptions {
        &self.options
    }
}

impl Client for SqliteCompatClient {
    fn driver_name(&self) -> &'static str {
        DRIVER_NAME
    }

    fn dialect(&self) -> &'static str {
        DIALECT
    }

    fn acquire_raw_connection(&self) -> Result<Database, SqliteCompatError> {
        debug!(path = %self.options.db_path, "acquire raw connection");
        Database::from_options(&self.options)
    }
}
