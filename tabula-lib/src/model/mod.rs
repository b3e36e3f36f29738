//! Row and column models

mod column;
mod identity;
mod row;
mod row_serde;
mod value;

pub use column::*;
pub use identity::*;
pub use row::*;
pub use row_serde::rows_from_json;
pub use value::*;
