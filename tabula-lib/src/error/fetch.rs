//! Page fetch error types

/// Errors a page fetcher can report for a progressive load.
///
/// Any of these moves the loader to the exhausted state once retries (if
/// configured) are used up.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The data source rejected or failed the request.
    #[error("Source error on page {page}: {message}")]
    Source {
        /// The page that was requested.
        page: usize,
        /// Error message from the source.
        message: String,
    },
}

impl FetchError {
    /// Creates a new source error.
    pub fn failed(page: usize, message: impl Into<String>) -> Self {
        Self::Source {
            page,
            message: message.into(),
        }
    }
}
