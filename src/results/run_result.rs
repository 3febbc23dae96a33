use serde::Serialize;

/// Outcome of a `run`-style call.
///
/// Delivered to the completion routine as the explicit result value; nothing is smuggled in
/// through a receiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Row id of the row the statement inserted, if it inserted one
    #[serde(rename = "lastID")]
    pub last_id: Option<i64>,
    /// Rows changed by the statement; zero when it changed nothing
    pub changes: u64,
}
