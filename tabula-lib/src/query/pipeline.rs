//! The query pipeline: filter, sort, then window.
//!
//! Everything here is a pure function of borrowed table state. The table
//! reruns [`recompute`] after every mutation and caches the resulting
//! [`View`]; rows themselves are never copied or reordered, the view only
//! holds positions into the collection.

use std::collections::HashMap;
use std::ops::Range;

use super::Comparator;
use super::Filter;
use super::Sort;
use super::filter::matches_all;
use super::page::page_range;
use super::page::total_pages;
use crate::config::ViewMode;
use crate::model::Row;

/// Borrowed inputs of one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub rows: &'a [Row],
    pub filters: &'a [Filter],
    pub sorts: &'a [Sort],
    /// Resolved comparators by column field.
    pub comparators: &'a HashMap<String, Comparator>,
    pub mode: ViewMode,
    pub page: usize,
    pub page_size: usize,
}

/// The output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Positions of the filtered rows, in sorted order.
    pub ordered: Vec<usize>,
    /// The part of `ordered` to render.
    pub visible: Range<usize>,
    /// The current page after clamping to `1..=total_pages`.
    pub current_page: usize,
    pub total_pages: usize,
}

impl View {
    /// Positions of the visible rows, in display order.
    pub fn visible_positions(&self) -> &[usize] {
        &self.ordered[self.visible.clone()]
    }
}

/// Runs the full pipeline.
pub fn recompute(query: &Query<'_>) -> View {
    let mut ordered = filter_rows(query.rows, query.filters);
    sort_rows(query.rows, &mut ordered, query.sorts, query.comparators);

    match query.mode {
        ViewMode::Paginated => {
            let total_pages = total_pages(ordered.len(), query.page_size);
            let current_page = query.page.clamp(1, total_pages);
            let visible = page_range(current_page, query.page_size, ordered.len());
            View {
                ordered,
                visible,
                current_page,
                total_pages,
            }
        }
        // Progressive and unpaged views show the whole filtered set
        ViewMode::All | ViewMode::Progressive => View {
            visible: 0..ordered.len(),
            ordered,
            current_page: 1,
            total_pages: 1,
        },
    }
}

/// Positions of rows passing every filter, in collection order.
pub fn filter_rows(rows: &[Row], filters: &[Filter]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| matches_all(filters, row))
        .map(|(position, _)| position)
        .collect()
}

/// Stable multi-key sort of `positions`.
///
/// Sorters whose column has no resolved comparator are skipped.
pub fn sort_rows(
    rows: &[Row],
    positions: &mut [usize],
    sorts: &[Sort],
    comparators: &HashMap<String, Comparator>,
) {
    let keys: Vec<(&Sort, &Comparator)> = sorts
        .iter()
        .filter_map(|sort| comparators.get(&sort.column).map(|cmp| (sort, cmp)))
        .collect();
    if keys.is_empty() {
        return;
    }

    // sort_by is stable: full ties keep collection order
    positions.sort_by(|&a, &b| {
        keys.iter()
            .map(|(sort, cmp)| sort.dir.apply(cmp.compare(&sort.column, &rows[a], &rows[b])))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
