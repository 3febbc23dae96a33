use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;

use sqlite_compat::{
    ClientConfig, Database, OpenMode, Params, SqliteCompatError, SqliteOptions, Value,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// read-only
    Ro,
    /// read-write, file must exist
    Rw,
    /// read-write, create if missing
    Rwc,
}

impl From<ModeArg> for OpenMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Ro => OpenMode::READONLY,
            ModeArg::Rw => OpenMode::READWRITE,
            ModeArg::Rwc => OpenMode::READWRITE | OpenMode::CREATE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Run SQL through the sqlite3-compatible driver surface")]
struct Cli {
    /// Database path, or `:memory:`
    #[arg(long, conflicts_with = "config", required_unless_present = "config")]
    db: Option<String>,
    /// JSON client config (`{"client":"sqlite3","connection":{"filename":...}}`)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a script; reports only success or failure
    Exec { sql: String },
    /// Execute one statement and print `{"lastID":..,"changes":..}`
    Run { sql: String, params: Vec<String> },
    /// Print the first row as JSON
    Get { sql: String, params: Vec<String> },
    /// Print every row as a JSON array
    All { sql: String, params: Vec<String> },
}

/// Parse a CLI parameter as a JSON scalar; anything else is taken as text.
fn parse_param(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Null) => Value::Null,
        Ok(serde_json::Value::Bool(b)) => Value::Bool(b),
        Ok(serde_json::Value::Number(n)) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Float))
            .unwrap_or_else(|| Value::Text(raw.to_string())),
        Ok(serde_json::Value::String(s)) => Value::Text(s),
        _ => Value::Text(raw.to_string()),
    }
}

fn params_of(raw: &[String]) -> Params {
    Params(raw.iter().map(|p| parse_param(p)).collect())
}

fn options(cli: &Cli) -> Result<SqliteOptions, SqliteCompatError> {
    let mut opts = match (&cli.config, &cli.db) {
        (Some(path), _) => ClientConfig::from_file(path)?.to_options()?,
        (None, Some(db)) => SqliteOptions::new(db.clone()),
        (None, None) => {
            return Err(SqliteCompatError::ConfigError(
                "either --db or --config is required".into(),
            ));
        }
    };
    if let Some(mode) = cli.mode {
        opts = opts.with_mode(mode.into());
    }
    Ok(opts)
}

fn execute(cli: &Cli) -> Result<(), SqliteCompatError> {
    let db = Database::from_options(&options(cli)?)?;
    match &cli.command {
        Command::Exec { sql } => db.exec(sql, None)?,
        Command::Run { sql, params } => {
            let ctx = db.run(sql, params_of(params))?.unwrap_or_default();
            println!("{}", serde_json::to_string(&ctx)?);
        }
        Command::Get { sql, params } => {
            let row = db.get(sql, params_of(params))?;
            println!("{}", serde_json::to_string(&row)?);
        }
        Command::All { sql, params } => {
            let rows = db.all(sql, params_of(params))?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    db.close(None)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
