//! Error types

mod callback;
mod fetch;
mod field;
mod table;

pub use callback::*;
pub use fetch::*;
pub use field::*;
pub use table::*;
