//! Value enum for dynamic cell values

use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;

/// Shared null used where a missing field has to be handed out by reference.
pub(crate) static NULL: Value = Value::Null;

/// A dynamic value held by a row field.
///
/// Rows are schemaless, so every cell is one of these variants. The engine
/// only interprets values through three coercions: numeric
/// ([`Value::as_f64`]), textual (the [`Display`](fmt::Display) impl) and
/// temporal ([`Value::timestamp_millis`]).
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | true/false | `Bool` |
/// | integer fitting i64 | `Int` |
/// | other number | `Float` |
/// | string | `String` |
/// | array, object | `Json` |
///
/// `DateTime` is never produced from JSON; hosts construct it directly.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Value;
///
/// let name = Value::from("Contoso");
/// let age = Value::from(30);
/// let active = Value::from(true);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
    /// Nested array or object, kept verbatim.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for `Int` and `Float`.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Json(_) => "json",
        }
    }

    /// Coerces the value to a number.
    ///
    /// Anything that is not numeric yields `NaN`: null, JSON containers,
    /// and strings that do not parse after trimming (including the empty
    /// string). Booleans map to `1`/`0` and date-times to epoch
    /// milliseconds.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Null => f64::NAN,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            Value::DateTime(dt) => dt.timestamp_millis() as f64,
            Value::Json(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Value::Json(_) => f64::NAN,
        }
    }

    /// Interprets the value as a point in time, in epoch milliseconds.
    ///
    /// Numbers are taken as milliseconds already. Strings are tried as
    /// RFC 3339, then `YYYY-MM-DD HH:MM:SS` (or with a `T`), then
    /// `YYYY-MM-DD`, all as UTC.
    pub fn timestamp_millis(&self) -> Option<i64> {
        match self {
            Value::DateTime(dt) => Some(dt.timestamp_millis()),
            Value::Int(n) => Some(*n),
            Value::Float(f) if f.is_finite() => Some(*f as i64),
            Value::String(s) => parse_timestamp(s),
            _ => None,
        }
    }

    /// Strict equality as used by the `=`/`!=` filter operators.
    ///
    /// `Int` and `Float` compare by numeric value; every other pairing must
    /// be the same variant with the same content. `NaN` equals nothing.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => a.as_f64() == b.as_f64(),
            _ => false,
        }
    }

    /// Converts a JSON value into a cell value.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            other => Value::Json(other),
        }
    }

    /// Converts the value back into JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::Json(json) => json.clone(),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Textual form used by the `like` filter, the string sorter and as the
/// fallback for formatters. Null renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
            Value::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Value::Json(json) => write!(f, "{}", json),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from_json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::from(30).as_f64(), 30.0);
        assert_eq!(Value::from(" 2.5 ").as_f64(), 2.5);
        assert_eq!(Value::from(true).as_f64(), 1.0);
        assert!(Value::from("abc").as_f64().is_nan());
        assert!(Value::from("").as_f64().is_nan());
        assert!(Value::Null.as_f64().is_nan());
    }

    #[test]
    fn test_strict_eq_crosses_number_kinds() {
        assert!(Value::Int(1).strict_eq(&Value::Float(1.0)));
        assert!(!Value::Int(1).strict_eq(&Value::from("1")));
        assert!(!Value::Float(f64::NAN).strict_eq(&Value::Float(f64::NAN)));
        assert!(Value::Null.strict_eq(&Value::Null));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(30.0).to_string(), "30");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from("Ada").to_string(), "Ada");
    }

    #[test]
    fn test_timestamp_parsing() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap().timestamp_millis();
        assert_eq!(Value::from("2024-03-01").timestamp_millis(), Some(expected));
        assert_eq!(
            Value::from("2024-03-01T00:00:00Z").timestamp_millis(),
            Some(expected)
        );
        assert_eq!(
            Value::from("2024-03-01 00:00:00").timestamp_millis(),
            Some(expected)
        );
        assert_eq!(Value::from("not a date").timestamp_millis(), None);
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from_json(serde_json::json!(7)), Value::Int(7));
        assert_eq!(Value::from_json(serde_json::json!(7.5)), Value::Float(7.5));
        assert!(matches!(
            Value::from_json(serde_json::json!([1, 2])),
            Value::Json(_)
        ));
    }
}
