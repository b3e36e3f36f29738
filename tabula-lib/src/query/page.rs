//! Pagination arithmetic and descriptors.

use std::ops::Range;

/// Number of pages needed for `rows` rows, never less than one.
///
/// A zero page size is treated as a single page.
pub fn total_pages(rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    rows.div_ceil(page_size).max(1)
}

/// The slice of a `len`-long sequence shown on 1-based `page`.
///
/// Pages past the end yield an empty range at `len`.
pub fn page_range(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// How the paginator counter is worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterStyle {
    /// `Showing 6 to 10 of 12 rows`
    #[default]
    Rows,
    /// `2 of 3`
    Pages,
}

/// A snapshot of the pagination state, for rendering a paginator.
///
/// # Example
///
/// ```
/// use tabula_lib::query::{CounterStyle, PageInfo};
///
/// let info = PageInfo::new(2, 5, 12);
/// assert_eq!(info.total_pages, 3);
/// assert_eq!(info.counter_text(CounterStyle::Rows), "Showing 6 to 10 of 12 rows");
/// assert_eq!(info.page_buttons(5), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page, 1-based.
    pub current_page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Page count for the filtered rows.
    pub total_pages: usize,
    /// Number of filtered rows.
    pub total_rows: usize,
}

impl PageInfo {
    /// Builds a descriptor, deriving the page count and clamping the page.
    pub fn new(current_page: usize, page_size: usize, total_rows: usize) -> Self {
        let total_pages = total_pages(total_rows, page_size);
        Self {
            current_page: current_page.clamp(1, total_pages),
            page_size,
            total_pages,
            total_rows,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page numbers for a paginator showing `count` buttons.
    ///
    /// The window is centred on the current page and shifted to stay within
    /// `1..=total_pages`.
    pub fn page_buttons(&self, count: usize) -> Vec<usize> {
        if count == 0 {
            return Vec::new();
        }
        let half = count / 2;
        let mut start = self.current_page.saturating_sub(half).max(1);
        let end = (start + count - 1).min(self.total_pages);
        if end - start < count - 1 {
            start = (end + 1).saturating_sub(count).max(1);
        }
        (start..=end).collect()
    }

    /// The paginator counter text.
    pub fn counter_text(&self, style: CounterStyle) -> String {
        match style {
            CounterStyle::Rows => {
                let range = page_range(self.current_page, self.page_size, self.total_rows);
                let start = if range.is_empty() { 0 } else { range.start + 1 };
                format!(
                    "Showing {} to {} of {} rows",
                    start, range.end, self.total_rows
                )
            }
            CounterStyle::Pages => format!("{} of {}", self.current_page, self.total_pages),
        }
    }
}
