// SQLite module - the callback-shaped driver surface over rusqlite
//
// - config: open options, builder and open-mode flag mapping
// - params: value normalization before anything reaches the engine
// - query: row extraction and execution helpers
// - prepared: the statement wrapper
// - connection: the connection façade

pub mod config;
pub mod connection;
pub mod params;
pub mod prepared;
pub mod query;

pub use config::{MEMORY_PATH, SqliteOptions, SqliteOptionsBuilder, open_flags};
pub use connection::{Database, PrepareArgs};
pub use params::{normalize, normalize_value};
pub use prepared::Statement;
