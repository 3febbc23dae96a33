pub mod row;
pub mod run_result;

pub use row::Row;
pub use run_result::RunResult;
