use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, ValueRef};
use serde::ser::{Serialize, Serializer};

/// Values callers hand to the driver, and values read back out of rows.
///
/// Inbound, any variant is accepted and run through [`crate::normalize`]. Outbound, rows only
/// ever carry `Null`, `Int`, `Float`, `Text` or `Blob`: a date written as epoch milliseconds
/// comes back as `Int`.
/// ```rust
/// use sqlite_compat::prelude::*;
///
/// let params = vec![
///     Value::Int(1),
///     Value::Text("alice".into()),
///     Value::Undefined,
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// A missing value; bound as NULL
    Undefined,
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Large integer value
    BigInt(i64),
    /// Point in time; bound as integer epoch milliseconds
    Date(DateTime<Utc>),
    /// Raw shared byte buffer; copied into an owned byte array when bound
    Buffer(Arc<[u8]>),
    /// Owned byte array
    Blob(Vec<u8>),
}

impl Value {
    /// Check if this value is NULL (or undefined)
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) | Value::BigInt(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Value::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            Value::Int(1) => Some(true),
            Value::Int(0) => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(bytes) => Some(bytes),
            Value::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Rebuild a date from a stored epoch-millisecond integer.
    ///
    /// Reads never do this on their own; callers that stored a date opt in here.
    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(value) => Some(*value),
            Value::Int(ms) | Value::BigInt(ms) => DateTime::from_timestamp_millis(*ms),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Undefined => serializer.serialize_unit(),
            Value::Int(i) | Value::BigInt(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Date(dt) => serializer.serialize_i64(dt.timestamp_millis()),
            Value::Buffer(bytes) => bytes.as_ref().serialize(serializer),
            Value::Blob(bytes) => bytes.serialize(serializer),
        }
    }
}

/// A value the engine's binding layer accepts as-is.
///
/// Produced only by [`crate::normalize`]; there is no date or undefined variant, so nothing
/// outside this set can reach a bind call.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    BigInt(i64),
    Blob(Vec<u8>),
}

impl ToSql for BindValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            BindValue::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            BindValue::Int(i) | BindValue::BigInt(i) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i))
            }
            BindValue::Float(f) => ToSqlOutput::Owned(rusqlite::types::Value::Real(*f)),
            BindValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            BindValue::Bool(b) => {
                ToSqlOutput::Owned(rusqlite::types::Value::Integer(i64::from(*b)))
            }
            BindValue::Blob(bytes) => ToSqlOutput::Borrowed(ValueRef::Blob(bytes)),
        })
    }
}

/// Ordered positional parameters for one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        Params(vec![value])
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params(values)
    }
}

impl<const N: usize> From<[Value; N]> for Params {
    fn from(values: [Value; N]) -> Self {
        Params(values.into())
    }
}

/// Bitmask of open-mode flags, matching the conventional sqlite3 driver constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenMode(u32);

impl OpenMode {
    pub const READONLY: OpenMode = OpenMode(0x1);
    pub const READWRITE: OpenMode = OpenMode(0x2);
    pub const CREATE: OpenMode = OpenMode(0x4);

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        OpenMode(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: OpenMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for OpenMode {
    fn default() -> Self {
        OpenMode::READWRITE | OpenMode::CREATE
    }
}

impl BitOr for OpenMode {
    type Output = OpenMode;

    fn bitor(self, rhs: OpenMode) -> OpenMode {
        OpenMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for OpenMode {
    fn bitor_assign(&mut self, rhs: OpenMode) {
        self.0 |= rhs.0;
    }
}

impl From<u32> for OpenMode {
    fn from(bits: u32) -> Self {
        OpenMode(bits)
    }
}
