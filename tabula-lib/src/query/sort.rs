//! Sort entries and comparators.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::model::CompareFn;
use crate::model::NULL;
use crate::model::Row;
use crate::model::SorterSpec;
use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Applies the direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        })
    }
}

/// A sorter entry: `(column, direction)`.
///
/// A table holds a list of these; the first is the primary key and later
/// entries break ties.
///
/// # Example
///
/// ```
/// use tabula_lib::query::Sort;
///
/// let sorters = vec![Sort::desc("age"), Sort::asc("name")];
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column: String,
    pub dir: Direction,
}

impl Sort {
    /// Creates a sorter entry.
    pub fn new(column: impl Into<String>, dir: Direction) -> Self {
        Self {
            column: column.into(),
            dir,
        }
    }

    /// Creates an ascending sorter entry.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Asc)
    }

    /// Creates a descending sorter entry.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Desc)
    }
}

/// A resolved column comparator.
///
/// Built from a [`SorterSpec`] when columns are set, so the sort stage never
/// looks at names.
#[derive(Clone)]
pub enum Comparator {
    /// Case-insensitive text; null and missing sort as `""`.
    String,
    /// Numeric; missing and non-numeric sort as `0`.
    Number,
    /// Timestamps; missing and unparseable sort as the epoch.
    Date,
    /// Host comparator.
    Custom(Arc<CompareFn>),
}

impl Comparator {
    /// Looks up a built-in comparator by name.
    pub fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "string" => Some(Comparator::String),
            "number" => Some(Comparator::Number),
            "date" => Some(Comparator::Date),
            _ => None,
        }
    }

    /// Resolves a column's sorter spec. `None` for unknown names.
    pub fn resolve(spec: &SorterSpec) -> Option<Self> {
        match spec {
            SorterSpec::Named(name) => Self::named(name),
            SorterSpec::Custom(compare) => Some(Comparator::Custom(Arc::clone(compare))),
        }
    }

    /// Compares the `field` cells of two rows in ascending order.
    ///
    /// A failing custom comparator is logged and counts as a tie, which
    /// leaves the pair in its previous relative order.
    pub fn compare(&self, field: &str, a: &Row, b: &Row) -> Ordering {
        let left = a.get(field);
        let right = b.get(field);
        match self {
            Comparator::String => sort_text(left).cmp(&sort_text(right)),
            Comparator::Number => sort_number(left)
                .partial_cmp(&sort_number(right))
                .unwrap_or(Ordering::Equal),
            Comparator::Date => sort_timestamp(left).cmp(&sort_timestamp(right)),
            Comparator::Custom(compare) => {
                match compare(left.unwrap_or(&NULL), right.unwrap_or(&NULL), a, b) {
                    Ok(ordering) => ordering,
                    Err(err) => {
                        log::warn!("Custom sorter for '{}' failed: {}", field, err);
                        Ordering::Equal
                    }
                }
            }
        }
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::String => f.write_str("String"),
            Comparator::Number => f.write_str("Number"),
            Comparator::Date => f.write_str("Date"),
            Comparator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn sort_text(value: Option<&Value>) -> String {
    value.map(|v| v.to_string().to_lowercase()).unwrap_or_default()
}

fn sort_number(value: Option<&Value>) -> f64 {
    let n = value.map(Value::as_f64).unwrap_or(0.0);
    if n.is_nan() { 0.0 } else { n }
}

fn sort_timestamp(value: Option<&Value>) -> i64 {
    value.and_then(Value::timestamp_millis).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallbackError;

    fn row(field: &str, value: impl Into<Value>) -> Row {
        Row::new().set(field, value)
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("DESC".parse::<Direction>(), Ok(Direction::Desc));
        assert!("up".parse::<Direction>().is_err());
        assert_eq!(Direction::Desc.apply(Ordering::Less), Ordering::Greater);
    }

    #[test]
    fn test_named_lookup() {
        assert!(matches!(Comparator::named("Number"), Some(Comparator::Number)));
        assert!(Comparator::named("alphanum").is_none());
    }

    #[test]
    fn test_string_ignores_case() {
        let cmp = Comparator::String;
        assert_eq!(cmp.compare("n", &row("n", "apple"), &row("n", "Banana")), Ordering::Less);
        assert_eq!(cmp.compare("n", &row("n", "ABC"), &row("n", "abc")), Ordering::Equal);
        assert_eq!(cmp.compare("n", &Row::new(), &row("n", "a")), Ordering::Less);
    }

    #[test]
    fn test_number_treats_missing_as_zero() {
        let cmp = Comparator::Number;
        assert_eq!(cmp.compare("n", &row("n", 10), &row("n", 9)), Ordering::Greater);
        assert_eq!(cmp.compare("n", &Row::new(), &row("n", 0)), Ordering::Equal);
        assert_eq!(cmp.compare("n", &row("n", -1), &Row::new()), Ordering::Less);
        assert_eq!(cmp.compare("n", &row("n", "x"), &row("n", 0)), Ordering::Equal);
    }

    #[test]
    fn test_date_treats_invalid_as_epoch() {
        let cmp = Comparator::Date;
        assert_eq!(
            cmp.compare("d", &row("d", "2024-01-02"), &row("d", "2023-12-31")),
            Ordering::Greater
        );
        assert_eq!(cmp.compare("d", &row("d", "garbage"), &row("d", 0)), Ordering::Equal);
    }

    #[test]
    fn test_failing_custom_is_a_tie() {
        let spec = SorterSpec::custom(|_, _, _, _| Err(CallbackError::new("boom")));
        let cmp = Comparator::resolve(&spec).unwrap();
        assert_eq!(cmp.compare("n", &row("n", 1), &row("n", 2)), Ordering::Equal);
    }
}
