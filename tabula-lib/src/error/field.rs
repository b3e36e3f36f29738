//! Typed cell access errors

/// Error from the typed getters on [`Row`](crate::model::Row).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The row has no such field.
    #[error("Row has no field '{field}'")]
    Missing { field: String },

    /// The cell holds another kind of value.
    #[error("Field '{field}' holds {actual}, not {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::Missing {
            field: field.to_string(),
        }
    }

    pub(crate) fn type_mismatch(field: &str, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
            actual,
        }
    }

    /// The field the failed lookup asked for.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field } | Self::TypeMismatch { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = FieldError::type_mismatch("age", "int", "string");
        assert_eq!(err.to_string(), "Field 'age' holds string, not int");
        assert_eq!(err.field(), "age");
        assert_eq!(FieldError::missing("x").field(), "x");
    }
}
