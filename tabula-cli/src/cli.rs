use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use tabula_lib::model::RowId;
use tabula_lib::model::Value;
use tabula_lib::query::CounterStyle;
use tabula_lib::query::Direction;
use tabula_lib::query::Filter;
use tabula_lib::query::Sort;

/// Wording of the page counter line
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Counter {
    /// "Showing 6 to 10 of 12 rows"
    Rows,
    /// "2 of 3"
    Pages,
}

impl From<Counter> for CounterStyle {
    fn from(counter: Counter) -> Self {
        match counter {
            Counter::Rows => CounterStyle::Rows,
            Counter::Pages => CounterStyle::Pages,
        }
    }
}

/// Filter, sort and page a JSON array of rows
#[derive(Parser, Debug)]
#[command(version, about = "tabula")]
pub struct Args {
    /// JSON file holding an array of row objects
    pub path: PathBuf,

    /// Table options as JSON (defaults to the user config file if present)
    #[arg(long = "options")]
    pub options: Option<PathBuf>,

    /// Field holding row identity
    #[arg(long = "index-field")]
    pub index_field: Option<String>,

    /// Sort key as `field:asc` or `field:desc`; repeat for tie-breakers
    #[arg(long = "sort", value_parser = parse_sort)]
    pub sort: Vec<Sort>,

    /// Sorter for a field as `field=string|number|date`.
    /// Fields default to a sorter guessed from the first row.
    #[arg(long = "sorter", value_parser = parse_sorter)]
    pub sorter: Vec<(String, String)>,

    /// Filter as `"field op value"`, e.g. `"age >= 30"`; repeat to AND
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filter: Vec<Filter>,

    /// Paginate with this many rows per page
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,

    /// Page to show (implies pagination)
    #[arg(long = "page")]
    pub page: Option<usize>,

    /// Load the file page by page through the progressive loader
    #[arg(long = "progressive", action)]
    pub progressive: bool,

    /// Rows per fetched page in progressive mode (default: 10)
    #[arg(long = "chunk-size", default_value_t = 10)]
    pub chunk_size: usize,

    /// Retries per failed page fetch
    #[arg(long = "retries", default_value_t = 0)]
    pub retries: u32,

    /// Select a row by key, or by position as `#N`; repeatable
    #[arg(long = "select", value_parser = parse_row_id)]
    pub select: Vec<RowId>,

    /// Counter wording
    #[arg(long = "counter", value_enum, default_value_t = Counter::Rows)]
    pub counter: Counter,

    /// Write the log here instead of the user cache directory
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Also log debug output to stderr
    #[arg(long = "debug", action)]
    pub debug: bool,
}

/// Parses a command-line literal: JSON if it parses, a string otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from_json)
        .unwrap_or_else(|_| Value::from(raw))
}

fn parse_sort(s: &str) -> Result<Sort, String> {
    match s.rsplit_once(':') {
        Some((field, dir)) if !field.is_empty() => Ok(Sort::new(field, dir.parse::<Direction>()?)),
        _ => Ok(Sort::asc(s)),
    }
}

fn parse_sorter(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(field, sorter)| (field.to_string(), sorter.to_string()))
        .ok_or_else(|| format!("expected field=sorter, got '{}'", s))
}

fn parse_filter(s: &str) -> Result<Filter, String> {
    let mut parts = s.trim().splitn(3, char::is_whitespace);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(op), Some(value)) if !field.is_empty() => {
            Ok(Filter::new(field, op, parse_value(value.trim())))
        }
        _ => Err(format!("expected \"field op value\", got '{}'", s)),
    }
}

fn parse_row_id(s: &str) -> Result<RowId, String> {
    if let Some(position) = s.strip_prefix('#') {
        return position
            .parse()
            .map(RowId::Position)
            .map_err(|e| format!("bad position '{}': {}", position, e));
    }
    RowId::key(&parse_value(s)).ok_or_else(|| format!("'{}' cannot identify a row", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_lib::query::FilterOp;

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("age:desc").unwrap(), Sort::desc("age"));
        assert_eq!(parse_sort("name").unwrap(), Sort::asc("name"));
        assert!(parse_sort("age:sideways").is_err());
    }

    #[test]
    fn test_parse_filter() {
        let filter = parse_filter("age >= 30").unwrap();
        assert_eq!(filter.field(), "age");
        assert_eq!(filter.op(), &FilterOp::Ge);
        assert_eq!(filter.value(), &Value::Int(30));

        let filter = parse_filter("name like van der").unwrap();
        assert_eq!(filter.value(), &Value::from("van der"));

        assert!(parse_filter("age").is_err());
    }

    #[test]
    fn test_parse_row_id() {
        assert_eq!(parse_row_id("2").unwrap(), RowId::from(2));
        assert_eq!(parse_row_id("abc").unwrap(), RowId::from("abc"));
        assert_eq!(parse_row_id("#3").unwrap(), RowId::Position(3));
        assert!(parse_row_id("#x").is_err());
    }
}
