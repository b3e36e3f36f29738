//! Dynamic row record

use chrono::DateTime;
use chrono::Utc;

use super::Value;
use crate::error::FieldError;

/// A schemaless table row.
///
/// Rows hold field values in insertion order, so column auto-generation and
/// JSON round trips keep the order the host supplied. Typed getter methods
/// provide checked access.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Row;
///
/// let row = Row::new()
///     .set("id", 1)
///     .set("name", "Ada")
///     .set("age", 36);
///
/// assert_eq!(row.get_string("name").unwrap(), Some("Ada"));
/// assert_eq!(row.keys().collect::<Vec<_>>(), ["id", "name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub(crate) fields: Vec<(String, Value)>,
}

impl Row {
    /// Creates a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == field)
            .map(|(_, value)| value)
    }

    /// Returns `true` if the row contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Iterates over `(field, value)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterates over field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts a field value, returning the previous one.
    ///
    /// An existing field keeps its position; a new field is appended.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == field) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((field, value));
                None
            }
        }
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(key, _)| key == field)?;
        Some(self.fields.remove(index).1)
    }

    /// Copies every field of `other` into this row.
    pub fn merge(&mut self, other: &Row) {
        for (key, value) in &other.fields {
            self.insert(key.clone(), value.clone());
        }
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "string",
                other.type_name(),
            )),
        }
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }

    /// Gets an integer field value.
    pub fn get_int(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "int", other.type_name())),
        }
    }

    /// Gets a float field value.
    pub fn get_float(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Float(n)) => Ok(Some(*n)),
            Some(Value::Int(n)) => Ok(Some(*n as f64)), // Allow widening
            Some(other) => Err(FieldError::type_mismatch(field, "float", other.type_name())),
        }
    }

    /// Gets a DateTime field value.
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        match self.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::DateTime(dt)) => Ok(Some(*dt)),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "datetime",
                other.type_name(),
            )),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut row = Row::new().set("a", 1).set("b", 2);
        let old = row.insert("a", 10);

        assert_eq!(old, Some(Value::Int(1)));
        assert_eq!(row.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(row.get("a"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_merge_overwrites_and_appends() {
        let mut row = Row::new().set("id", 1).set("name", "Ada");
        row.merge(&Row::new().set("name", "Grace").set("age", 40));

        assert_eq!(row.get_string("name").unwrap(), Some("Grace"));
        assert_eq!(row.get_int("age").unwrap(), Some(40));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_typed_getter_errors() {
        let row = Row::new().set("name", "Ada").set("note", Value::Null);

        assert_eq!(row.get_string("note").unwrap(), None);
        assert!(matches!(
            row.get_int("name"),
            Err(FieldError::TypeMismatch { .. })
        ));
        assert!(matches!(row.get_bool("x"), Err(FieldError::Missing { .. })));
    }

    #[test]
    fn test_remove() {
        let mut row = Row::new().set("a", 1).set("b", 2);
        assert_eq!(row.remove("a"), Some(Value::Int(1)));
        assert_eq!(row.remove("a"), None);
        assert_eq!(row.len(), 1);
    }
}
