//! Errors raised by host-supplied callbacks (custom sorters, formatters).

/// A failure reported by a host callback.
///
/// The engine never propagates these: a failing comparator counts as a tie
/// and a failing formatter falls back to the raw value. The error is only
/// logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CallbackError {
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl CallbackError {
    /// Creates a new callback error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for CallbackError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for CallbackError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
