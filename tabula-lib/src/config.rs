//! Table configuration

use serde::Deserialize;
use serde::Serialize;

use crate::load::RetryConfig;

/// How the table windows its filtered rows.
///
/// Pagination and progressive loading are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Every filtered row is visible.
    #[default]
    All,
    /// Only the current page is visible.
    Paginated,
    /// Rows arrive page by page from a fetcher; every loaded row is visible.
    Progressive,
}

impl ViewMode {
    pub fn is_paginated(self) -> bool {
        self == ViewMode::Paginated
    }

    pub fn is_progressive(self) -> bool {
        self == ViewMode::Progressive
    }
}

/// Configuration for a [`Table`](crate::Table).
///
/// Can be built in code or deserialized from JSON; missing keys take their
/// defaults. Retry settings are code-only.
///
/// # Example
///
/// ```
/// use tabula_lib::{TableOptions, ViewMode};
///
/// let options = TableOptions::default()
///     .with_view_mode(ViewMode::Paginated)
///     .with_page_size(25);
///
/// let from_json: TableOptions =
///     serde_json::from_str(r#"{"view_mode": "paginated", "page_size": 25}"#).unwrap();
/// assert_eq!(from_json.page_size, options.page_size);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Field holding row identity.
    ///
    /// Default: `"id"`
    pub index_field: String,

    /// Windowing mode.
    ///
    /// Default: [`ViewMode::All`]
    pub view_mode: ViewMode,

    /// Rows per page when paginated.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Page shown first when paginated.
    ///
    /// Default: 1
    pub initial_page: usize,

    /// Generate columns from the first row when none are defined.
    ///
    /// Default: false
    pub auto_columns: bool,

    /// Retry policy for progressive fetches.
    ///
    /// Default: no retry (a failed fetch ends progressive loading)
    #[serde(skip)]
    pub retry: RetryConfig,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            index_field: "id".to_string(),
            view_mode: ViewMode::All,
            page_size: 10,
            initial_page: 1,
            auto_columns: false,
            retry: RetryConfig::no_retry(),
        }
    }
}

impl TableOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for paginated options with the given page size.
    pub fn paginated(page_size: usize) -> Self {
        Self::default()
            .with_view_mode(ViewMode::Paginated)
            .with_page_size(page_size)
    }

    /// Shorthand for progressive-load options.
    pub fn progressive() -> Self {
        Self::default().with_view_mode(ViewMode::Progressive)
    }

    /// Sets the identity field.
    pub fn with_index_field(mut self, field: impl Into<String>) -> Self {
        self.index_field = field.into();
        self
    }

    /// Sets the windowing mode.
    pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the initial page.
    pub fn with_initial_page(mut self, page: usize) -> Self {
        self.initial_page = page;
        self
    }

    /// Enables or disables column auto-generation.
    pub fn with_auto_columns(mut self, enabled: bool) -> Self {
        self.auto_columns = enabled;
        self
    }

    /// Sets the progressive fetch retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}
