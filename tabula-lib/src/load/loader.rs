//! Progressive load state machine.

use super::FetchOutcome;
use crate::model::Row;

/// Where the loader is in its cycle.
///
/// `Idle -> Loading -> Idle` while pages keep coming, `Loading -> Exhausted`
/// on an empty page or a failure. Only a reset leaves `Exhausted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Ready to fetch the next page.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// No more pages will be fetched.
    Exhausted,
}

/// Proof that a fetch was started, needed to finish it.
///
/// Tickets from before a reset are stale and their results are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    page: usize,
    generation: u64,
}

impl LoadTicket {
    /// The page to fetch.
    pub fn page(&self) -> usize {
        self.page
    }
}

/// Cursor-based progressive loader.
///
/// Holds only the cursor and state; fetched rows are handed back to the
/// caller to append.
#[derive(Debug, Clone)]
pub struct ProgressiveLoader {
    state: LoadState,
    cursor_page: usize,
    generation: u64,
}

impl Default for ProgressiveLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressiveLoader {
    /// Creates an idle loader whose cursor is on page 1.
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            cursor_page: 1,
            generation: 0,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn has_more(&self) -> bool {
        self.state != LoadState::Exhausted
    }

    /// The last page successfully loaded.
    pub fn cursor_page(&self) -> usize {
        self.cursor_page
    }

    /// Starts a fetch of the next page.
    ///
    /// Returns `None` while another fetch is in flight or once exhausted.
    pub fn begin(&mut self) -> Option<LoadTicket> {
        match self.state {
            LoadState::Idle => {
                self.state = LoadState::Loading;
                Some(LoadTicket {
                    page: self.cursor_page + 1,
                    generation: self.generation,
                })
            }
            LoadState::Loading => {
                log::debug!("Progressive load already in flight");
                None
            }
            LoadState::Exhausted => None,
        }
    }

    /// Completes a fetch started with [`begin`](Self::begin).
    ///
    /// Returns the rows to append, if any. Empty pages and failures exhaust
    /// the loader; stale tickets change nothing.
    pub fn finish(&mut self, ticket: LoadTicket, outcome: FetchOutcome) -> Option<Vec<Row>> {
        if ticket.generation != self.generation || self.state != LoadState::Loading {
            log::debug!("Discarding stale result for page {}", ticket.page);
            return None;
        }

        match outcome {
            FetchOutcome::Rows(rows) if !rows.is_empty() => {
                self.cursor_page = ticket.page;
                self.state = LoadState::Idle;
                Some(rows)
            }
            FetchOutcome::Rows(_) | FetchOutcome::Empty => {
                log::debug!("Page {} is empty, no more data", ticket.page);
                self.state = LoadState::Exhausted;
                None
            }
            FetchOutcome::Failed(err) => {
                log::warn!("Error loading page {}: {}", ticket.page, err);
                self.state = LoadState::Exhausted;
                None
            }
        }
    }

    /// Returns to page 1 and invalidates any in-flight fetch.
    pub fn reset(&mut self) {
        self.state = LoadState::Idle;
        self.cursor_page = 1;
        self.generation += 1;
    }
}

/// Decides whether a scroll position should trigger a load.
///
/// `distance_from_bottom` is the unrendered scroll distance left. A
/// `margin` of zero means two client heights.
pub fn should_load_more(distance_from_bottom: f64, client_height: f64, margin: f64) -> bool {
    let margin = if margin > 0.0 { margin } else { client_height * 2.0 };
    distance_from_bottom <= margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    fn rows(n: i64) -> Vec<Row> {
        (0..n).map(|i| Row::new().set("id", i)).collect()
    }

    #[test]
    fn test_begin_guards_in_flight() {
        let mut loader = ProgressiveLoader::new();
        let ticket = loader.begin().unwrap();
        assert_eq!(ticket.page(), 2);
        assert!(loader.is_loading());
        assert!(loader.begin().is_none());
    }

    #[test]
    fn test_rows_advance_cursor() {
        let mut loader = ProgressiveLoader::new();
        let ticket = loader.begin().unwrap();
        let appended = loader.finish(ticket, FetchOutcome::Rows(rows(2)));

        assert_eq!(appended.map(|r| r.len()), Some(2));
        assert_eq!(loader.cursor_page(), 2);
        assert_eq!(loader.state(), LoadState::Idle);
        assert_eq!(loader.begin().map(|t| t.page()), Some(3));
    }

    #[test]
    fn test_empty_page_exhausts() {
        let mut loader = ProgressiveLoader::new();
        let ticket = loader.begin().unwrap();
        assert!(loader.finish(ticket, FetchOutcome::Empty).is_none());
        assert!(!loader.has_more());
        assert_eq!(loader.cursor_page(), 1);
        assert!(loader.begin().is_none());
    }

    #[test]
    fn test_failure_fails_closed() {
        let mut loader = ProgressiveLoader::new();
        let ticket = loader.begin().unwrap();
        let outcome = FetchOutcome::Failed(FetchError::failed(2, "timeout"));
        assert!(loader.finish(ticket, outcome).is_none());
        assert_eq!(loader.state(), LoadState::Exhausted);
    }

    #[test]
    fn test_reset_discards_in_flight() {
        let mut loader = ProgressiveLoader::new();
        let stale = loader.begin().unwrap();
        loader.reset();

        assert!(loader.finish(stale, FetchOutcome::Rows(rows(3))).is_none());
        assert_eq!(loader.state(), LoadState::Idle);
        assert_eq!(loader.cursor_page(), 1);
    }

    #[test]
    fn test_scroll_threshold() {
        assert!(should_load_more(100.0, 400.0, 0.0));
        assert!(!should_load_more(900.0, 400.0, 0.0));
        assert!(should_load_more(50.0, 400.0, 50.0));
        assert!(!should_load_more(51.0, 400.0, 50.0));
    }
}
