//! The table state store

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::TableOptions;
use crate::error::TableError;
use crate::events::TableListener;
use crate::load::FetchOutcome;
use crate::load::LoadState;
use crate::load::LoadTicket;
use crate::load::PageFetcher;
use crate::load::ProgressiveLoader;
use crate::load::fetch_with_retry;
use crate::model::Column;
use crate::model::FormatterSpec;
use crate::model::NULL;
use crate::model::Row;
use crate::model::RowId;
use crate::model::Value;
use crate::model::rows_from_json;
use crate::query::Comparator;
use crate::query::Filter;
use crate::query::FilterOp;
use crate::query::PageInfo;
use crate::query::Sort;
use crate::query::pipeline::Query;
use crate::query::pipeline::View;
use crate::query::pipeline::recompute;
use crate::selection::Selection;

/// A client-side data table.
///
/// Owns the authoritative row collection together with columns, sorters,
/// filters, the page cursor, the progressive loader and the selection.
/// Every mutating call reruns the query pipeline, so [`visible_rows`]
/// always reflects the current state.
///
/// In progressive mode the loaded rows are appended to the same
/// collection, which makes every row operation work on them too.
///
/// # Example
///
/// ```
/// use tabula_lib::model::{Column, Row};
/// use tabula_lib::query::Sort;
/// use tabula_lib::{Table, TableOptions};
///
/// let mut table = Table::new(TableOptions::paginated(2))
///     .with_columns(vec![Column::new("age").sorter("number")])
///     .with_data(vec![
///         Row::new().set("id", 1).set("age", 30),
///         Row::new().set("id", 2).set("age", 25),
///         Row::new().set("id", 3).set("age", 35),
///     ]);
///
/// table.set_sort([Sort::asc("age")]);
/// let ids: Vec<_> = table
///     .visible_rows()
///     .iter()
///     .map(|row| row.get_int("id").unwrap())
///     .collect();
/// assert_eq!(ids, [Some(2), Some(1)]);
/// assert_eq!(table.total_pages(), 2);
/// ```
///
/// [`visible_rows`]: Table::visible_rows
pub struct Table {
    options: TableOptions,
    rows: Vec<Row>,
    columns: Vec<Column>,
    comparators: HashMap<String, Comparator>,
    sorts: Vec<Sort>,
    filters: Vec<Filter>,
    current_page: usize,
    page_size: usize,
    loader: ProgressiveLoader,
    fetcher: Option<Arc<dyn PageFetcher>>,
    selection: Selection,
    listeners: Vec<Arc<dyn TableListener>>,
    view: View,
}

impl Table {
    /// Creates an empty table.
    pub fn new(options: TableOptions) -> Self {
        let mut table = Self {
            current_page: options.initial_page.max(1),
            page_size: options.page_size.max(1),
            options,
            rows: Vec::new(),
            columns: Vec::new(),
            comparators: HashMap::new(),
            sorts: Vec::new(),
            filters: Vec::new(),
            loader: ProgressiveLoader::new(),
            fetcher: None,
            selection: Selection::new(),
            listeners: Vec::new(),
            view: View {
                ordered: Vec::new(),
                visible: 0..0,
                current_page: 1,
                total_pages: 1,
            },
        };
        table.recompute();
        table
    }

    /// Sets the column definitions.
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.set_columns(columns);
        self
    }

    /// Sets the initial rows and moves to the configured initial page.
    pub fn with_data(mut self, rows: Vec<Row>) -> Self {
        self.current_page = self.options.initial_page.max(1);
        self.set_rows(rows);
        self
    }

    /// Sets the page fetcher used by [`load_more_data`](Self::load_more_data).
    pub fn with_fetcher(mut self, fetcher: impl PageFetcher + 'static) -> Self {
        self.set_fetcher(fetcher);
        self
    }

    pub fn set_fetcher(&mut self, fetcher: impl PageFetcher + 'static) {
        self.fetcher = Some(Arc::new(fetcher));
    }

    /// Registers a lifecycle listener.
    pub fn add_listener(&mut self, listener: Arc<dyn TableListener>) {
        self.listeners.push(listener);
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Replaces the whole row collection.
    ///
    /// Sorters, filters and the page are kept (the page is clamped to the
    /// new page count). Positional selections are dropped since positions
    /// no longer mean the same rows. In progressive mode the loader starts
    /// over from page 1 and any in-flight fetch becomes stale.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.selection.drop_positions();
        if self.options.view_mode.is_progressive() {
            self.loader.reset();
        }
        self.generate_columns();
        self.recompute();

        log::debug!("Loaded {} rows", self.rows.len());
        for listener in &self.listeners {
            listener.data_loaded(&self.rows);
        }
    }

    /// Same as [`set_rows`](Self::set_rows).
    pub fn replace_data(&mut self, rows: Vec<Row>) {
        self.set_rows(rows);
    }

    /// Removes every row.
    pub fn clear_data(&mut self) {
        self.set_rows(Vec::new());
    }

    /// Replaces the collection with rows parsed from a JSON array.
    ///
    /// On a parse error the table is left unchanged.
    pub fn load_json(&mut self, json: &str) -> Result<usize, TableError> {
        let rows = rows_from_json(json)?;
        let count = rows.len();
        self.set_rows(rows);
        Ok(count)
    }

    /// Adds rows at the start or end of the collection.
    pub fn add_rows(&mut self, rows: Vec<Row>, at_top: bool) {
        if rows.is_empty() {
            return;
        }
        if at_top {
            self.selection.shift_for_prepend(rows.len());
            self.rows.splice(0..0, rows);
        } else {
            self.rows.extend(rows);
        }
        self.generate_columns();
        self.recompute();
    }

    /// Merges each row into the existing row with the same index key.
    ///
    /// Rows without a key, or with a key not present, are skipped. Returns
    /// the number of rows updated.
    pub fn update_rows(&mut self, rows: &[Row]) -> usize {
        let mut updated = 0;
        for patch in rows {
            let Some(id) = RowId::of(patch, &self.options.index_field) else {
                log::debug!(
                    "Skipping update for row without '{}'",
                    self.options.index_field
                );
                continue;
            };
            match self.position_of(&id) {
                Some(position) => {
                    self.rows[position].merge(patch);
                    updated += 1;
                }
                None => log::debug!("No row {} to update", id),
            }
        }
        if updated > 0 {
            self.recompute();
        }
        updated
    }

    /// Removes the row at `position` in the collection.
    ///
    /// The row leaves the selection and later positional selections move
    /// down with their rows.
    pub fn delete_row(&mut self, position: usize) -> Option<Row> {
        let id = self.row_id(position)?;
        let row = self.rows.remove(position);
        let deselected = self.selection.remove(&id);
        self.selection.shift_after_delete(position);
        self.recompute();

        if deselected {
            self.notify_selection();
        }
        Some(row)
    }

    /// Writes one cell and returns its previous value.
    ///
    /// Fails when the row is gone or the field belongs to a column that is
    /// not editable. Fields without a column definition are writable. The
    /// index field is never writable.
    pub fn set_cell_value(
        &mut self,
        id: &RowId,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Value, TableError> {
        if field == self.options.index_field {
            return Err(TableError::IndexField(field.to_string()));
        }
        if let Some(column) = self.column(field)
            && !column.editable
        {
            return Err(TableError::NotEditable(field.to_string()));
        }
        let position = self
            .position_of(id)
            .ok_or_else(|| TableError::RowNotFound(id.clone()))?;

        let old = self.rows[position].insert(field, value).unwrap_or_default();
        self.recompute();
        Ok(old)
    }

    /// The authoritative collection, in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows loaded so far. Progressive rows live in the main collection.
    pub fn loaded_rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Identity of the row at `position`.
    pub fn row_id(&self, position: usize) -> Option<RowId> {
        self.rows
            .get(position)
            .map(|row| RowId::resolve(row, position, &self.options.index_field))
    }

    /// Current position of the row with identity `id`.
    pub fn position_of(&self, id: &RowId) -> Option<usize> {
        let index_field = &self.options.index_field;
        match id {
            RowId::Position(position) => self
                .rows
                .get(*position)
                .filter(|row| RowId::of(row, index_field).is_none())
                .map(|_| *position),
            RowId::Key(_) => self
                .rows
                .iter()
                .position(|row| RowId::of(row, index_field).as_ref() == Some(id)),
        }
    }

    pub fn get_row(&self, id: &RowId) -> Option<&Row> {
        self.position_of(id).map(|position| &self.rows[position])
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Replaces the column definitions and resolves their sorters.
    ///
    /// Unknown sorter names are logged and leave the column unsortable.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.comparators = resolve_comparators(&columns);
        self.columns = columns;
        self.recompute();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.field == field)
    }

    fn generate_columns(&mut self) {
        if !self.options.auto_columns || !self.columns.is_empty() {
            return;
        }
        if let Some(first) = self.rows.first() {
            let columns = Column::from_row(first);
            log::debug!("Generated {} columns", columns.len());
            self.comparators = resolve_comparators(&columns);
            self.columns = columns;
        }
    }

    // =========================================================================
    // Sorting and filtering
    // =========================================================================

    /// Replaces the sorter list. The first entry is the primary key.
    pub fn set_sort(&mut self, sorts: impl IntoIterator<Item = Sort>) {
        self.sorts = sorts.into_iter().collect();
        for sort in &self.sorts {
            if !self.comparators.contains_key(&sort.column) {
                log::debug!("No sorter for column '{}', skipping", sort.column);
            }
        }
        self.recompute();
    }

    pub fn clear_sort(&mut self) {
        self.sorts.clear();
        self.recompute();
    }

    pub fn sorters(&self) -> &[Sort] {
        &self.sorts
    }

    /// Sets the filter for `field`, replacing any filter already on it.
    pub fn set_filter(
        &mut self,
        field: impl Into<String>,
        op: impl Into<FilterOp>,
        value: impl Into<Value>,
    ) {
        self.add_filter(Filter::new(field, op, value));
    }

    /// Adds a prebuilt filter, replacing any filter on the same field.
    ///
    /// Filters with an unknown operator are kept but pass every row.
    pub fn add_filter(&mut self, filter: Filter) {
        if filter.op.is_unknown() {
            log::warn!(
                "Unknown filter operator '{}' on '{}', ignoring",
                filter.op,
                filter.field
            );
        }
        self.filters.retain(|existing| existing.field != filter.field);
        self.filters.push(filter);
        self.recompute();
    }

    /// Removes the filter on `field`, or every filter when `None`.
    pub fn clear_filter(&mut self, field: Option<&str>) {
        match field {
            Some(field) => self.filters.retain(|filter| filter.field != field),
            None => self.filters.clear(),
        }
        self.recompute();
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Moves to `page`.
    ///
    /// Pages outside `1..=total_pages` are ignored and return `false`.
    pub fn set_page(&mut self, page: usize) -> bool {
        let total = self.view.total_pages;
        if page < 1 || page > total {
            log::debug!("Ignoring page {} outside 1..={}", page, total);
            return false;
        }
        self.current_page = page;
        self.recompute();

        for listener in &self.listeners {
            listener.page_loaded(page);
        }
        true
    }

    /// Changes the page size and returns to page 1. Zero is ignored.
    pub fn set_page_size(&mut self, size: usize) {
        if size == 0 {
            log::debug!("Ignoring page size 0");
            return;
        }
        self.page_size = size;
        self.current_page = 1;
        self.recompute();
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.current_page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> bool {
        self.set_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        self.set_page(self.view.total_pages)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Page count for the filtered rows. Always 1 unless paginated.
    pub fn total_pages(&self) -> usize {
        self.view.total_pages
    }

    /// Paginator descriptor for the current state.
    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.view.total_pages,
            total_rows: self.view.ordered.len(),
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// The rows to render: filtered, sorted and windowed.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.view
            .visible_positions()
            .iter()
            .map(|&position| &self.rows[position])
            .collect()
    }

    /// Every row passing the filters, in sorted order, ignoring paging.
    pub fn all_rows(&self) -> Vec<&Row> {
        self.view
            .ordered
            .iter()
            .map(|&position| &self.rows[position])
            .collect()
    }

    /// The last pipeline result.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Display text for a cell.
    ///
    /// Runs the column's custom formatter if it has one; otherwise, or if
    /// the formatter fails, the value's plain text.
    pub fn formatted_cell(&self, row: &Row, field: &str) -> String {
        let value = row.get(field).unwrap_or(&NULL);
        match self.column(field).and_then(|column| column.formatter.as_ref()) {
            Some(FormatterSpec::Custom(format)) => match format(value, row) {
                Ok(text) => text,
                Err(err) => {
                    log::warn!("Formatter for '{}' failed: {}", field, err);
                    value.to_string()
                }
            },
            _ => value.to_string(),
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects a present row. Returns `true` if the selection changed.
    pub fn select_row(&mut self, id: RowId) -> bool {
        if self.position_of(&id).is_none() {
            log::debug!("Cannot select missing row {}", id);
            return false;
        }
        let changed = self.selection.insert(id);
        if changed {
            self.notify_selection();
        }
        changed
    }

    /// Selects several rows with a single notification.
    ///
    /// Returns the number of newly selected rows.
    pub fn select_rows(&mut self, ids: impl IntoIterator<Item = RowId>) -> usize {
        let mut changed = 0;
        for id in ids {
            if self.position_of(&id).is_some() && self.selection.insert(id) {
                changed += 1;
            }
        }
        if changed > 0 {
            self.notify_selection();
        }
        changed
    }

    /// Returns `true` if the row was selected.
    pub fn deselect_row(&mut self, id: &RowId) -> bool {
        let changed = self.selection.remove(id);
        if changed {
            self.notify_selection();
        }
        changed
    }

    /// Deselects several rows with a single notification.
    pub fn deselect_rows<'a>(&mut self, ids: impl IntoIterator<Item = &'a RowId>) -> usize {
        let changed = ids
            .into_iter()
            .filter(|id| self.selection.remove(id))
            .count();
        if changed > 0 {
            self.notify_selection();
        }
        changed
    }

    /// Flips the selection of a row and returns whether it is now selected.
    ///
    /// Missing rows can be deselected but not selected.
    pub fn toggle_select_row(&mut self, id: RowId) -> bool {
        if !self.selection.contains(&id) && self.position_of(&id).is_none() {
            log::debug!("Cannot select missing row {}", id);
            return false;
        }
        let selected = self.selection.toggle(id);
        self.notify_selection();
        selected
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.notify_selection();
        }
    }

    /// Whether a present row is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selection.contains(id) && self.position_of(id).is_some()
    }

    /// Identities of the selected rows, in collection order.
    ///
    /// Identities whose row has disappeared (e.g. after `set_rows`) are
    /// left out.
    pub fn selected_ids(&self) -> Vec<RowId> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        (0..self.rows.len())
            .filter_map(|position| self.row_id(position))
            .filter(|id| self.selection.contains(id))
            .collect()
    }

    /// The selected rows, in collection order.
    pub fn get_selected_data(&self) -> Vec<&Row> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.rows
            .iter()
            .enumerate()
            .filter(|(position, row)| {
                let id = RowId::resolve(row, *position, &self.options.index_field);
                self.selection.contains(&id)
            })
            .map(|(_, row)| row)
            .collect()
    }

    fn notify_selection(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let selected = self.selected_ids();
        for listener in &self.listeners {
            listener.selection_changed(&selected);
        }
    }

    // =========================================================================
    // Progressive loading
    // =========================================================================

    pub fn load_state(&self) -> LoadState {
        self.loader.state()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn has_more(&self) -> bool {
        self.loader.has_more()
    }

    /// Last page successfully appended; 1 before the first fetch.
    pub fn cursor_page(&self) -> usize {
        self.loader.cursor_page()
    }

    /// Starts a progressive fetch driven by the host.
    ///
    /// Returns the ticket for the page to fetch, or `None` when not in
    /// progressive mode, already loading, or exhausted. Pass the ticket and
    /// the fetch result to [`finish_load`](Self::finish_load).
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if !self.options.view_mode.is_progressive() {
            log::debug!("Progressive loading is disabled");
            return None;
        }
        self.loader.begin()
    }

    /// Completes a fetch started with [`begin_load`](Self::begin_load).
    ///
    /// Appends the fetched rows and returns how many were added. Results
    /// for tickets issued before the last `set_rows` are discarded.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: FetchOutcome) -> usize {
        let Some(rows) = self.loader.finish(ticket, outcome) else {
            return 0;
        };
        let start = self.rows.len();
        self.rows.extend(rows);
        self.generate_columns();
        self.recompute();

        let appended = &self.rows[start..];
        log::debug!("Appended {} rows from page {}", appended.len(), ticket.page());
        for listener in &self.listeners {
            listener.rows_appended(ticket.page(), appended);
        }
        appended.len()
    }

    /// Fetches and appends the next page through the configured fetcher.
    ///
    /// Does nothing without a fetcher, outside progressive mode, while a
    /// fetch is in flight, or once exhausted. A failed fetch (after the
    /// configured retries) exhausts the loader.
    pub async fn load_more_data(&mut self) -> usize {
        let Some(fetcher) = self.fetcher.clone() else {
            log::debug!("No page fetcher configured");
            return 0;
        };
        let Some(ticket) = self.begin_load() else {
            return 0;
        };
        let outcome = fetch_with_retry(fetcher.as_ref(), ticket.page(), &self.options.retry).await;
        self.finish_load(ticket, outcome)
    }

    /// Whether a scroll observer should call
    /// [`load_more_data`](Self::load_more_data) now.
    pub fn should_load_more(&self, distance_from_bottom: f64, client_height: f64, margin: f64) -> bool {
        self.options.view_mode.is_progressive()
            && self.loader.state() == LoadState::Idle
            && crate::load::should_load_more(distance_from_bottom, client_height, margin)
    }

    fn recompute(&mut self) {
        let query = Query {
            rows: &self.rows,
            filters: &self.filters,
            sorts: &self.sorts,
            comparators: &self.comparators,
            mode: self.options.view_mode,
            page: self.current_page,
            page_size: self.page_size,
        };
        self.view = recompute(&query);
        self.current_page = self.view.current_page;
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(TableOptions::default())
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("options", &self.options)
            .field("rows", &self.rows.len())
            .field("columns", &self.columns.len())
            .field("sorts", &self.sorts)
            .field("filters", &self.filters)
            .field("current_page", &self.current_page)
            .field("page_size", &self.page_size)
            .field("loader", &self.loader)
            .field("selected", &self.selection.len())
            .finish_non_exhaustive()
    }
}

fn resolve_comparators(columns: &[Column]) -> HashMap<String, Comparator> {
    columns
        .iter()
        .filter_map(|column| {
            let spec = column.sorter.as_ref()?;
            match Comparator::resolve(spec) {
                Some(comparator) => Some((column.field.clone(), comparator)),
                None => {
                    log::warn!("Unknown sorter {:?} on column '{}'", spec, column.field);
                    None
                }
            }
        })
        .collect()
}
