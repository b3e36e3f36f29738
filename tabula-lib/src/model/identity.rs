//! Row identity

use std::fmt;

use super::Row;
use super::Value;

/// The identity of a row, used to match it across mutations.
///
/// A row whose index field (default `"id"`) holds a non-null value is
/// identified by that value. Otherwise it is identified by its position in
/// the table's collection.
///
/// Keys are a canonical encoding of the value: `1` and `1.0` are the same
/// key, `1` and `"1"` are not.
///
/// # Example
///
/// ```
/// use tabula_lib::model::{Row, RowId};
///
/// let row = Row::new().set("id", 7).set("name", "Ada");
/// assert_eq!(RowId::of(&row, "id"), Some(RowId::from(7)));
/// assert_eq!(RowId::of(&row, "uuid"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    /// Identified by the value of the index field.
    Key(String),
    /// Identified by position in the collection.
    Position(usize),
}

impl RowId {
    /// Builds a key identity from a value. Returns `None` for null.
    pub fn key(value: &Value) -> Option<Self> {
        let key = match value {
            Value::Null => return None,
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                (*f as i64).to_string()
            }
            Value::Float(f) => f.to_string(),
            Value::String(s) => format!("{:?}", s),
            Value::DateTime(dt) => format!("@{}", dt.to_rfc3339()),
            Value::Json(json) => json.to_string(),
        };
        Some(RowId::Key(key))
    }

    /// Returns the key identity of a row, if it carries a non-null index field.
    pub fn of(row: &Row, index_field: &str) -> Option<Self> {
        row.get(index_field).and_then(RowId::key)
    }

    /// Returns the identity of the row at `position`.
    pub fn resolve(row: &Row, position: usize, index_field: &str) -> Self {
        RowId::of(row, index_field).unwrap_or(RowId::Position(position))
    }

    /// Returns `true` for positional identities.
    pub fn is_positional(&self) -> bool {
        matches!(self, RowId::Position(_))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Key(key) => f.write_str(key),
            RowId::Position(position) => write!(f, "#{}", position),
        }
    }
}

impl From<i64> for RowId {
    fn from(v: i64) -> Self {
        RowId::Key(v.to_string())
    }
}

impl From<i32> for RowId {
    fn from(v: i32) -> Self {
        RowId::Key(v.to_string())
    }
}

impl From<&str> for RowId {
    fn from(v: &str) -> Self {
        RowId::Key(format!("{:?}", v))
    }
}

impl From<String> for RowId {
    fn from(v: String) -> Self {
        RowId::Key(format!("{:?}", v))
    }
}
