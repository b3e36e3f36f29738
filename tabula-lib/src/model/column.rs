//! Column definitions

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::Row;
use super::Value;
use crate::error::CallbackError;

/// A host-supplied comparator.
///
/// Receives both cell values and both rows, returns the ascending order.
/// The engine reverses the result for descending sorts.
pub type CompareFn = dyn Fn(&Value, &Value, &Row, &Row) -> Result<Ordering, CallbackError> + Send + Sync;

/// A host-supplied cell formatter.
pub type FormatFn = dyn Fn(&Value, &Row) -> Result<String, CallbackError> + Send + Sync;

/// How a column sorts: a built-in sorter by name or a custom comparator.
///
/// Names are resolved once, when the columns are handed to the table.
#[derive(Clone)]
pub enum SorterSpec {
    /// Built-in sorter: `"string"`, `"number"` or `"date"`.
    Named(String),
    /// Host comparator.
    Custom(Arc<CompareFn>),
}

impl SorterSpec {
    /// Wraps a comparator closure.
    pub fn custom<F>(compare: F) -> Self
    where
        F: Fn(&Value, &Value, &Row, &Row) -> Result<Ordering, CallbackError> + Send + Sync + 'static,
    {
        SorterSpec::Custom(Arc::new(compare))
    }
}

impl From<&str> for SorterSpec {
    fn from(name: &str) -> Self {
        SorterSpec::Named(name.to_string())
    }
}

impl fmt::Debug for SorterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SorterSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            SorterSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How a column renders its cells.
///
/// Named formatters belong to the renderer and are passed through; only
/// custom formatters run inside the engine.
#[derive(Clone)]
pub enum FormatterSpec {
    /// Renderer-defined formatter, opaque to the engine.
    Named(String),
    /// Host formatter.
    Custom(Arc<FormatFn>),
}

impl FormatterSpec {
    /// Wraps a formatter closure.
    pub fn custom<F>(format: F) -> Self
    where
        F: Fn(&Value, &Row) -> Result<String, CallbackError> + Send + Sync + 'static,
    {
        FormatterSpec::Custom(Arc::new(format))
    }
}

impl From<&str> for FormatterSpec {
    fn from(name: &str) -> Self {
        FormatterSpec::Named(name.to_string())
    }
}

impl fmt::Debug for FormatterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatterSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            FormatterSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A column width hint, passed through to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Width {
    /// Fixed width in pixels.
    Pixels(u32),
    /// Any CSS length, e.g. `"20%"`.
    Css(String),
}

/// A column definition.
///
/// Only `field` and `sorter` influence the data engine (plus `editable`
/// and `formatter` for cell access). Everything else is carried for the
/// renderer.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Column;
///
/// let columns = vec![
///     Column::new("name").title("Name").sorter("string"),
///     Column::new("age").title("Age").sorter("number").editable(true),
/// ];
/// ```
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) field: String,
    pub(crate) title: String,
    pub(crate) sorter: Option<SorterSpec>,
    pub(crate) formatter: Option<FormatterSpec>,
    pub(crate) filterable: bool,
    pub(crate) editable: bool,
    pub(crate) visible: bool,
    pub(crate) width: Option<Width>,
    pub(crate) min_width: Option<u32>,
    pub(crate) max_width: Option<u32>,
}

impl Column {
    /// Creates a column for a field, titled with the field name.
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            title: field.clone(),
            field,
            sorter: None,
            formatter: None,
            filterable: true,
            editable: false,
            visible: true,
            width: None,
            min_width: None,
            max_width: None,
        }
    }

    /// Sets the display title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the sorter.
    pub fn sorter(mut self, sorter: impl Into<SorterSpec>) -> Self {
        self.sorter = Some(sorter.into());
        self
    }

    /// Sets the formatter.
    pub fn formatter(mut self, formatter: impl Into<FormatterSpec>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    /// Marks the column as usable in header filters.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Allows cell edits through [`Table::set_cell_value`](crate::Table::set_cell_value).
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Shows or hides the column.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the width hint.
    pub fn width(mut self, width: Width) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the minimum width in pixels.
    pub fn min_width(mut self, min: u32) -> Self {
        self.min_width = Some(min);
        self
    }

    /// Sets the maximum width in pixels.
    pub fn max_width(mut self, max: u32) -> Self {
        self.max_width = Some(max);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn get_title(&self) -> &str {
        &self.title
    }

    pub fn get_sorter(&self) -> Option<&SorterSpec> {
        self.sorter.as_ref()
    }

    pub fn get_formatter(&self) -> Option<&FormatterSpec> {
        self.formatter.as_ref()
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn get_width(&self) -> Option<&Width> {
        self.width.as_ref()
    }

    pub fn get_min_width(&self) -> Option<u32> {
        self.min_width
    }

    pub fn get_max_width(&self) -> Option<u32> {
        self.max_width
    }

    /// Generates one column per field of `row`, in field order.
    ///
    /// Each column gets a built-in sorter guessed from the field's value:
    /// `number` for numbers, `date` for date-times, `string` otherwise.
    pub fn from_row(row: &Row) -> Vec<Column> {
        row.fields()
            .map(|(field, value)| {
                let sorter = match value {
                    Value::Int(_) | Value::Float(_) => "number",
                    Value::DateTime(_) => "date",
                    _ => "string",
                };
                Column::new(field).sorter(sorter)
            })
            .collect()
    }
}
