//! Client-side data table engine
//!
//! Turns a row collection into the rows a grid should render: filters,
//! a stable multi-key sort, then a page window or the whole set. Also
//! tracks the selection and appends rows fetched page by page for
//! infinite scrolling. Rendering is left to the host.
//!
//! - [`Table`] - the state store and entry point
//! - [`query`] - filters, sorters, pagination and the pure pipeline
//! - [`load`] - page fetchers and the progressive loader
//! - [`model`] - rows, values, identities and columns

pub mod config;
pub mod error;
pub mod events;
pub mod load;
pub mod model;
pub mod query;
pub mod selection;

mod table;

pub use config::TableOptions;
pub use config::ViewMode;
pub use table::*;
