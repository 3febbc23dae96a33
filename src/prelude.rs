//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::adapter::{Adapter, Driver};
pub use crate::callback::{
    AllArgs, Args, Completion, EachArgs, EachCallbacks, GetArgs, RunArgs, completion,
};
pub use crate::error::SqliteCompatError;
pub use crate::results::{Row, RunResult};
pub use crate::sqlite::{Database, PrepareArgs, Statement, normalize};
pub use crate::types::{BindValue, OpenMode, Params, Value};

#[cfg(feature = "dialect")]
pub use crate::adapter::{Client, QueryMethod, QueryObject, Response, SqliteCompatClient};
