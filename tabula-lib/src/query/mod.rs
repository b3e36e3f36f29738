//! Filtering, sorting and pagination.
//!
//! This module holds the pure half of the engine: the entry types hosts
//! use to describe a query, and the pipeline that turns a row collection
//! into the rows to render.
//!
//! # Entry Types
//!
//! - [`Filter`] - `(field, operator, value)` conditions, ANDed together
//! - [`Sort`] - `(column, direction)` keys, applied in order
//! - [`PageInfo`] - pagination descriptor for paginators
//!
//! # Pipeline
//!
//! - [`pipeline::recompute`] - filter, stable sort, then window

mod filter;
mod page;
pub mod pipeline;
mod sort;

pub use filter::Filter;
pub use filter::FilterOp;
pub use filter::matches_all;
pub use page::CounterStyle;
pub use page::PageInfo;
pub use page::page_range;
pub use page::total_pages;
pub use sort::Comparator;
pub use sort::Direction;
pub use sort::Sort;
