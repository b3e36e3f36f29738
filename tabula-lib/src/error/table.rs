//! Table store error types

use crate::model::RowId;

/// Errors returned by the few fallible table operations.
///
/// Navigation and selection intents never fail; they are ignored when they
/// do not apply.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// No row in the collection has the given identity.
    #[error("Row {0} not found")]
    RowNotFound(RowId),

    /// The column exists but is not editable.
    #[error("Column '{0}' is not editable")]
    NotEditable(String),

    /// The field holds row identity and cannot be written in place.
    #[error("Field '{0}' is the index field")]
    IndexField(String),

    /// The row payload could not be parsed.
    #[error("Invalid row data: {0}")]
    Json(#[from] serde_json::Error),
}

impl TableError {
    /// Returns `true` if the error refers to a missing row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RowNotFound(_))
    }
}
