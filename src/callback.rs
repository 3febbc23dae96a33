//! Calling-convention plumbing shared by statement- and connection-level operations.
//!
//! Every query operation accepts its trailing arguments as one [`Args`] value. [`Args::resolve`]
//! is the single place that splits them into "parameters, if any" and "completion, if any".
//! Plain parameters convert with `.into()`, so `stmt.run(())`, `stmt.run(Value::Int(1))` and
//! `stmt.run(vec![..])` all work; completion-bearing forms are built through the type aliases
//! ([`RunArgs::then`], [`AllArgs::with`], ...), which pin the completion's result type.

use crate::error::SqliteCompatError;
use crate::results::{Row, RunResult};
use crate::types::{Params, Value};

/// A completion routine: called once with the error or the result.
pub type Completion<'a, T> = Box<dyn FnOnce(Result<T, SqliteCompatError>) + 'a>;

/// Per-row routine for `each`.
pub type RowCallback<'a> = Box<dyn FnMut(Result<&Row, &SqliteCompatError>) + 'a>;

pub type RunArgs<'a> = Args<Completion<'a, RunResult>>;
pub type GetArgs<'a> = Args<Completion<'a, Option<Row>>>;
pub type AllArgs<'a> = Args<Completion<'a, Vec<Row>>>;
pub type EachArgs<'a> = Args<EachCallbacks<'a>>;

/// Box a closure as a [`Completion`].
pub fn completion<'a, T, F>(f: F) -> Completion<'a, T>
where
    F: FnOnce(Result<T, SqliteCompatError>) + 'a,
{
    Box::new(f)
}

/// Trailing arguments of a query call, classified once.
pub enum Args<C> {
    ParamsAndCompletion(Params, C),
    ParamsOnly(Params),
    CompletionOnly(C),
    Neither,
}

impl<C> Args<C> {
    /// Split into `(params, completion)`.
    pub fn resolve(self) -> (Option<Params>, Option<C>) {
        match self {
            Args::ParamsAndCompletion(params, done) => (Some(params), Some(done)),
            Args::ParamsOnly(params) => (Some(params), None),
            Args::CompletionOnly(done) => (None, Some(done)),
            Args::Neither => (None, None),
        }
    }
}

impl<'a, T> Args<Completion<'a, T>> {
    /// Completion only; parameters come from a prior `bind`, or none.
    pub fn then<F>(f: F) -> Self
    where
        F: FnOnce(Result<T, SqliteCompatError>) + 'a,
    {
        Args::CompletionOnly(Box::new(f))
    }

    /// Explicit parameters plus a completion.
    pub fn with<P, F>(params: P, f: F) -> Self
    where
        P: Into<Params>,
        F: FnOnce(Result<T, SqliteCompatError>) + 'a,
    {
        Args::ParamsAndCompletion(params.into(), Box::new(f))
    }
}

impl<'a> Args<EachCallbacks<'a>> {
    pub fn then(callbacks: EachCallbacks<'a>) -> Self {
        Args::CompletionOnly(callbacks)
    }

    pub fn with<P: Into<Params>>(params: P, callbacks: EachCallbacks<'a>) -> Self {
        Args::ParamsAndCompletion(params.into(), callbacks)
    }
}

impl<C> From<()> for Args<C> {
    fn from((): ()) -> Self {
        Args::Neither
    }
}

impl<C> From<Params> for Args<C> {
    fn from(params: Params) -> Self {
        Args::ParamsOnly(params)
    }
}

impl<C> From<Value> for Args<C> {
    fn from(value: Value) -> Self {
        Args::ParamsOnly(Params::from(value))
    }
}

impl<C> From<Vec<Value>> for Args<C> {
    fn from(values: Vec<Value>) -> Self {
        Args::ParamsOnly(Params(values))
    }
}

/// The row routine and optional done routine of an `each` call.
pub struct EachCallbacks<'a> {
    pub(crate) on_row: RowCallback<'a>,
    pub(crate) on_done: Option<Completion<'a, usize>>,
}

impl<'a> EachCallbacks<'a> {
    pub fn new<F>(on_row: F) -> Self
    where
        F: FnMut(Result<&Row, &SqliteCompatError>) + 'a,
    {
        Self {
            on_row: Box::new(on_row),
            on_done: None,
        }
    }

    /// Called last with the number of rows delivered.
    #[must_use]
    pub fn on_done<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Result<usize, SqliteCompatError>) + 'a,
    {
        self.on_done = Some(Box::new(f));
        self
    }
}

/// Route `result` through `done` if present, otherwise hand it back to the caller.
///
/// With a completion the caller gets `Ok(None)`; errors never escape past the routine.
pub(crate) fn deliver<T: Clone>(
    result: Result<T, SqliteCompatError>,
    done: Option<Completion<'_, T>>,
) -> Result<Option<T>, SqliteCompatError> {
    match done {
        None => result.map(Some),
        Some(done) => match result {
            Ok(value) => {
                done(Ok(value.clone()));
                Ok(Some(value))
            }
            Err(err) => {
                tracing::warn!(error = %err, "routing error to completion");
                done(Err(err));
                Ok(None)
            }
        },
    }
}
