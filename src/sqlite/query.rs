use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::ValueRef;

use crate::error::SqliteCompatError;
use crate::results::Row;
use crate::types::{BindValue, Value};

/// Extract a [`Value`] from a `SQLite` row, as stored.
///
/// # Errors
///
/// Returns `SqliteCompatError` if the column index is out of range.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<Value, SqliteCompatError> {
    let value = match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    };
    Ok(value)
}

fn column_names(stmt: &Statement<'_>) -> Arc<Vec<String>> {
    Arc::new(
        stmt.column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect(),
    )
}

fn read_row(
    row: &rusqlite::Row<'_>,
    names: &Arc<Vec<String>>,
) -> Result<Row, SqliteCompatError> {
    let mut values = Vec::with_capacity(names.len());
    for i in 0..names.len() {
        values.push(sqlite_extract_value_sync(row, i)?);
    }
    Ok(Row::new(Arc::clone(names), values))
}

/// Execute and materialise every row, in the order the engine yields them.
///
/// # Errors
/// Returns `SqliteCompatError` if binding, stepping or value extraction fails.
pub fn build_rows(
    stmt: &mut Statement<'_>,
    params: &[BindValue],
) -> Result<Vec<Row>, SqliteCompatError> {
    let names = column_names(stmt);
    let mut rows_iter = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    let mut rows = Vec::new();
    while let Some(row) = rows_iter.next()? {
        rows.push(read_row(row, &names)?);
    }
    Ok(rows)
}

/// Execute and return at most the first row.
///
/// # Errors
/// Returns `SqliteCompatError` if binding, stepping or value extraction fails.
pub fn build_first_row(
    stmt: &mut Statement<'_>,
    params: &[BindValue],
) -> Result<Option<Row>, SqliteCompatError> {
    let names = column_names(stmt);
    let mut rows_iter = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    match rows_iter.next()? {
        Some(row) => Ok(Some(read_row(row, &names)?)),
        None => Ok(None),
    }
}

/// Execute to completion, discarding any rows the statement yields.
///
/// # Errors
/// Returns `SqliteCompatError` if binding or stepping fails.
pub fn drain(stmt: &mut Statement<'_>, params: &[BindValue]) -> Result<(), SqliteCompatError> {
    let mut rows_iter = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    while rows_iter.next()?.is_some() {}
    Ok(())
}

/// Whether `sql` is an INSERT or REPLACE, possibly behind a `WITH` clause.
///
/// Only the top-level verb counts: words inside parentheses, quotes and comments are skipped.
#[must_use]
pub fn inserts_rows(sql: &str) -> bool {
    let words = top_level_words(sql);
    let mut verbs = words.iter().map(String::as_str);
    match verbs.next() {
        Some("insert" | "replace") => true,
        Some("with") => verbs
            .find(|w| matches!(*w, "insert" | "replace" | "update" | "delete" | "select"))
            .is_some_and(|w| w == "insert" || w == "replace"),
        _ => false,
    }
}

fn skip_until(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, end: char) {
    for c in chars.by_ref() {
        if c == end {
            break;
        }
    }
}

/// Lowercased identifier words at parenthesis depth zero, in order.
fn top_level_words(sql: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '\'' | '"' | '`' => skip_until(&mut chars, c),
            '[' => skip_until(&mut chars, ']'),
            '-' if chars.peek() == Some(&'-') => skip_until(&mut chars, '\n'),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut word = String::from(c.to_ascii_lowercase());
                while let Some(&next) = chars.peek() {
                    if !(next.is_alphanumeric() || next == '_') {
                        break;
                    }
                    word.push(next.to_ascii_lowercase());
                    chars.next();
                }
                if depth == 0 {
                    words.push(word);
                }
            }
            _ => {}
        }
    }
    words
}
