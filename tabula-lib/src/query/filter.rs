//! Filter entries and their evaluation.

use std::fmt;
use std::str::FromStr;

use crate::model::Row;
use crate::model::Value;

/// A filter operator.
///
/// Parsed from the symbols hosts use in header filters. An unrecognised
/// symbol is kept as [`FilterOp::Unknown`] and lets every row through, so a
/// bad filter never blanks the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`: strict equality.
    Eq,
    /// `!=`: strict inequality.
    Ne,
    /// `like`: case-insensitive substring.
    Like,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// Anything else; always passes.
    Unknown(String),
}

impl FilterOp {
    /// Parses an operator symbol. Never fails.
    pub fn parse(symbol: &str) -> Self {
        match symbol.trim() {
            "=" | "==" => FilterOp::Eq,
            "!=" => FilterOp::Ne,
            "like" => FilterOp::Like,
            ">" => FilterOp::Gt,
            "<" => FilterOp::Lt,
            ">=" => FilterOp::Ge,
            "<=" => FilterOp::Le,
            other => FilterOp::Unknown(other.to_string()),
        }
    }

    /// Returns the operator symbol.
    pub fn symbol(&self) -> &str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Like => "like",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::Ge => ">=",
            FilterOp::Le => "<=",
            FilterOp::Unknown(symbol) => symbol,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, FilterOp::Unknown(_))
    }
}

impl From<&str> for FilterOp {
    fn from(symbol: &str) -> Self {
        FilterOp::parse(symbol)
    }
}

impl FromStr for FilterOp {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FilterOp::parse(s))
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A filter entry: `(field, operator, value)`.
///
/// A table keeps at most one filter per field; all active filters must pass
/// for a row to be shown.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Row;
/// use tabula_lib::query::Filter;
///
/// let row = Row::new().set("name", "Contoso Ltd").set("age", 30);
///
/// assert!(Filter::gt("age", 28).matches(&row));
/// assert!(Filter::like("name", "contoso").matches(&row));
/// assert!(!Filter::eq("age", "30").matches(&row));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub(crate) field: String,
    pub(crate) op: FilterOp,
    pub(crate) value: Value,
}

impl Filter {
    /// Creates a filter from parts.
    pub fn new(field: impl Into<String>, op: impl Into<FilterOp>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    /// Creates an equality filter: `field = value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Creates a not-equal filter: `field != value`.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Ne, value)
    }

    /// Creates a contains filter: `field like value`.
    pub fn like(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Like, value)
    }

    /// Creates a greater-than filter: `field > value`.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Gt, value)
    }

    /// Creates a less-than filter: `field < value`.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Lt, value)
    }

    /// Creates a greater-than-or-equal filter: `field >= value`.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Ge, value)
    }

    /// Creates a less-than-or-equal filter: `field <= value`.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Le, value)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn op(&self) -> &FilterOp {
        &self.op
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns `true` if `row` satisfies this filter.
    ///
    /// A missing field equals only `Null`, stringifies to `""` and is not a
    /// number, so it fails every ordering comparison.
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(&self.field);
        match &self.op {
            FilterOp::Eq => cell_eq(cell, &self.value),
            FilterOp::Ne => !cell_eq(cell, &self.value),
            FilterOp::Like => {
                let needle = self.value.to_string().to_lowercase();
                let haystack = cell.map(Value::to_string).unwrap_or_default();
                haystack.to_lowercase().contains(&needle)
            }
            // NaN on either side fails all four
            FilterOp::Gt => cell_number(cell) > self.value.as_f64(),
            FilterOp::Lt => cell_number(cell) < self.value.as_f64(),
            FilterOp::Ge => cell_number(cell) >= self.value.as_f64(),
            FilterOp::Le => cell_number(cell) <= self.value.as_f64(),
            FilterOp::Unknown(_) => true,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

fn cell_eq(cell: Option<&Value>, value: &Value) -> bool {
    match cell {
        Some(cell) => cell.strict_eq(value),
        None => value.is_null(),
    }
}

fn cell_number(cell: Option<&Value>) -> f64 {
    cell.map(Value::as_f64).unwrap_or(f64::NAN)
}

/// Returns `true` if `row` passes every filter (logical AND).
pub fn matches_all(filters: &[Filter], row: &Row) -> bool {
    filters.iter().all(|filter| filter.matches(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Row {
        Row::new()
            .set("id", 1)
            .set("name", "Ada Lovelace")
            .set("age", 36)
            .set("score", "12.5")
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(FilterOp::parse(">="), FilterOp::Ge);
        assert_eq!(FilterOp::parse("like"), FilterOp::Like);
        assert_eq!(FilterOp::parse("regex"), FilterOp::Unknown("regex".into()));
        assert_eq!(FilterOp::Ne.to_string(), "!=");
    }

    #[test]
    fn test_equality_is_strict() {
        let row = person();
        assert!(Filter::eq("age", 36).matches(&row));
        assert!(Filter::eq("age", 36.0).matches(&row));
        assert!(!Filter::eq("age", "36").matches(&row));
        assert!(Filter::ne("age", "36").matches(&row));
        assert!(Filter::eq("missing", Value::Null).matches(&row));
    }

    #[test]
    fn test_like_is_case_insensitive() {
        let row = person();
        assert!(Filter::like("name", "LOVE").matches(&row));
        assert!(Filter::like("age", 3).matches(&row));
        assert!(!Filter::like("name", "babbage").matches(&row));
    }

    #[test]
    fn test_comparisons_coerce_to_numbers() {
        let row = person();
        assert!(Filter::gt("score", 12).matches(&row));
        assert!(Filter::le("score", "12.5").matches(&row));
        assert!(!Filter::gt("name", 0).matches(&row));
        assert!(!Filter::lt("name", 0).matches(&row));
        assert!(!Filter::ge("missing", 0).matches(&row));
    }

    #[test]
    fn test_unknown_operator_passes() {
        let filter = Filter::new("age", "~=", 99);
        assert!(filter.op().is_unknown());
        assert!(filter.matches(&person()));
    }

    #[test]
    fn test_matches_all_is_conjunction() {
        let row = person();
        assert!(matches_all(&[], &row));
        assert!(matches_all(&[Filter::gt("age", 30), Filter::like("name", "ada")], &row));
        assert!(!matches_all(&[Filter::gt("age", 30), Filter::like("name", "grace")], &row));
    }
}
