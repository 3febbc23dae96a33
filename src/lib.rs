//! A sqlite3-style, callback-shaped driver surface over a synchronous `rusqlite` connection.
//!
//! Query builders written against the conventional sqlite3 driver contract (`run`, `get`,
//! `all`, `each`, `exec`, `prepare`, completion routines receiving `(error, result)`) can drive
//! a [`Database`] unchanged. Every call runs to completion on the calling thread; completion
//! routines are invoked before the call returns, except the open notification, which is handed
//! off to a tokio task or a separate thread and never invoked from inside the opening call.
//!
//! ```rust
//! use sqlite_compat::prelude::*;
//!
//! let db = Database::open(":memory:")?;
//! db.exec("CREATE TABLE t (id INTEGER PRIMARY KEY, x INTEGER)", None)?;
//!
//! let mut insert = db.prepare("INSERT INTO t (x) VALUES (?)", ())?.expect("no completion");
//! insert.bind(Value::Int(1)).run(())?;
//! insert.bind(Value::Int(2)).run(())?;
//! insert.finalize(None)?;
//!
//! let mut seen = Vec::new();
//! db.all("SELECT x FROM t ORDER BY id", AllArgs::then(|res| {
//!     seen = res
//!         .expect("query")
//!         .iter()
//!         .filter_map(|r| r.get("x").and_then(Value::as_int))
//!         .collect();
//! }))?;
//! assert_eq!(seen, vec![1, 2]);
//! db.close(None)?;
//! # Ok::<(), SqliteCompatError>(())
//! ```

pub mod adapter;
pub mod callback;
pub mod config;
pub mod error;
pub mod prelude;
pub mod results;
pub mod sqlite;
pub mod types;

pub use adapter::{ADAPTER, Adapter, Driver, detect_adapter};
pub use callback::{
    AllArgs, Args, Completion, EachArgs, EachCallbacks, GetArgs, RowCallback, RunArgs, completion,
};
pub use config::ClientConfig;
pub use error::SqliteCompatError;
pub use results::{Row, RunResult};
pub use sqlite::{
    Database, MEMORY_PATH, PrepareArgs, SqliteOptions, SqliteOptionsBuilder, Statement, normalize,
    normalize_value,
};
pub use types::{BindValue, OpenMode, Params, Value};
