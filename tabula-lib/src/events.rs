//! Lifecycle notifications.

use crate::model::Row;
use crate::model::RowId;

/// Receives table lifecycle notifications.
///
/// Every method has an empty default, so listeners implement only what
/// they need. Each notification fires at most once per table call and is
/// never retried.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use tabula_lib::events::TableListener;
/// use tabula_lib::{Table, TableOptions};
///
/// #[derive(Default)]
/// struct PageCounter(AtomicUsize);
///
/// impl TableListener for PageCounter {
///     fn page_loaded(&self, _page: usize) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let counter = Arc::new(PageCounter::default());
/// let mut table = Table::new(TableOptions::paginated(5));
/// table.add_listener(counter.clone());
/// table.set_page(1);
/// assert_eq!(counter.0.load(Ordering::SeqCst), 1);
/// ```
pub trait TableListener: Send + Sync {
    /// The row collection was replaced.
    fn data_loaded(&self, _rows: &[Row]) {}

    /// The current page changed through `set_page`.
    fn page_loaded(&self, _page: usize) {}

    /// A progressive fetch appended rows for `page`.
    fn rows_appended(&self, _page: usize, _rows: &[Row]) {}

    /// The selection changed. Receives the live selected identities.
    fn selection_changed(&self, _selected: &[RowId]) {}
}
