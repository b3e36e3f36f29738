//! Filtering, sorting and paging through the public table API.

use tabula_lib::model::Column;
use tabula_lib::model::Row;
use tabula_lib::model::Value;
use tabula_lib::query::CounterStyle;
use tabula_lib::query::Filter;
use tabula_lib::query::Sort;
use tabula_lib::Table;
use tabula_lib::TableOptions;

fn three_people() -> Vec<Row> {
    vec![
        Row::new().set("id", 1).set("age", 30),
        Row::new().set("id", 2).set("age", 25),
        Row::new().set("id", 3).set("age", 35),
    ]
}

fn numbered(count: i64) -> Vec<Row> {
    (0..count).map(|i| Row::new().set("id", i)).collect()
}

/// Deterministic pseudo-random rows with repeated ages and teams.
fn mixed(count: usize) -> Vec<Row> {
    let mut seed: u64 = 42;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        seed >> 33
    };
    (0..count)
        .map(|i| {
            let mut row = Row::new()
                .set("id", i as i64)
                .set("age", (next() % 8) as i64 + 20)
                .set("team", ["red", "Blue", "green"][(next() % 3) as usize]);
            if next() % 5 == 0 {
                row.remove("age");
            }
            row
        })
        .collect()
}

fn ids(rows: &[&Row]) -> Vec<i64> {
    rows.iter()
        .map(|row| row.get_int("id").unwrap().unwrap())
        .collect()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("id").sorter("number"),
        Column::new("age").sorter("number"),
        Column::new("team").sorter("string"),
    ]
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_sort_by_age() {
    let mut table = Table::default().with_columns(columns()).with_data(three_people());
    table.set_sort([Sort::asc("age")]);
    assert_eq!(ids(&table.visible_rows()), [2, 1, 3]);
}

#[test]
fn test_filter_keeps_source_order() {
    let mut table = Table::default().with_columns(columns()).with_data(three_people());
    table.set_filter("age", ">", 28);
    assert_eq!(ids(&table.visible_rows()), [1, 3]);
}

#[test]
fn test_second_page_of_twelve() {
    let mut table = Table::new(TableOptions::paginated(5)).with_data(numbered(12));
    assert!(table.set_page(2));
    assert_eq!(ids(&table.visible_rows()), [5, 6, 7, 8, 9]);
    assert_eq!(table.total_pages(), 3);
    assert_eq!(
        table.page_info().counter_text(CounterStyle::Rows),
        "Showing 6 to 10 of 12 rows"
    );
}

#[test]
fn test_out_of_range_page_is_ignored() {
    let mut table = Table::new(TableOptions::paginated(5)).with_data(numbered(12));
    table.set_page(2);
    let before = ids(&table.visible_rows());

    assert!(!table.set_page(4));
    assert_eq!(table.current_page(), 2);
    assert_eq!(ids(&table.visible_rows()), before);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_every_visible_row_passes_every_filter() {
    let filters = [Filter::ge("age", 23), Filter::like("team", "e")];
    let mut table = Table::default().with_columns(columns()).with_data(mixed(200));
    for filter in filters.iter().cloned() {
        table.add_filter(filter);
    }

    let visible = table.visible_rows();
    assert!(!visible.is_empty());
    for row in &visible {
        assert!(filters.iter().all(|filter| filter.matches(row)));
    }

    let expected = table
        .rows()
        .iter()
        .filter(|row| filters.iter().all(|filter| filter.matches(row)))
        .count();
    assert_eq!(visible.len(), expected);
}

#[test]
fn test_ties_keep_insertion_order() {
    let mut table = Table::default().with_columns(columns()).with_data(mixed(200));
    table.set_sort([Sort::asc("team")]);

    let visible = table.visible_rows();
    for pair in visible.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let team_a = a.get_string("team").unwrap().unwrap().to_lowercase();
        let team_b = b.get_string("team").unwrap().unwrap().to_lowercase();
        assert!(team_a <= team_b);
        if team_a == team_b {
            assert!(a.get_int("id").unwrap() < b.get_int("id").unwrap());
        }
    }
}

#[test]
fn test_pages_partition_the_filtered_rows() {
    let mut table = Table::new(TableOptions::paginated(7))
        .with_columns(columns())
        .with_data(mixed(100));
    table.set_filter("team", "!=", "green");
    table.set_sort([Sort::desc("age"), Sort::asc("id")]);

    let expected = ids(&table.all_rows());
    let mut seen = Vec::new();
    for page in 1..=table.total_pages() {
        assert!(table.set_page(page));
        let visible = table.visible_rows();
        assert!(visible.len() <= 7);
        seen.extend(ids(&visible));
    }
    assert_eq!(seen, expected);
}

#[test]
fn test_recompute_is_idempotent() {
    let mut table = Table::new(TableOptions::paginated(10))
        .with_columns(columns())
        .with_data(mixed(50));
    table.set_sort([Sort::asc("age")]);
    table.set_filter("age", "<", 26);
    let first = ids(&table.visible_rows());

    table.set_sort([Sort::asc("age")]);
    table.set_filter("age", "<", 26);
    table.set_page(table.current_page());
    assert_eq!(ids(&table.visible_rows()), first);
}

#[test]
fn test_missing_ages_sort_as_zero() {
    let mut table = Table::default().with_columns(columns()).with_data(vec![
        Row::new().set("id", 1).set("age", 5),
        Row::new().set("id", 2),
        Row::new().set("id", 3).set("age", -1),
    ]);
    table.set_sort([Sort::asc("age")]);
    assert_eq!(ids(&table.visible_rows()), [3, 2, 1]);
}

#[test]
fn test_non_numeric_values_fail_comparisons() {
    let mut table = Table::default().with_data(vec![
        Row::new().set("id", 1).set("age", "unknown"),
        Row::new().set("id", 2).set("age", "40"),
    ]);
    table.set_filter("age", ">", 10);
    assert_eq!(ids(&table.visible_rows()), [2]);
}

#[test]
fn test_null_and_empty_fail_comparisons() {
    let mut table = Table::default().with_data(vec![
        Row::new().set("id", 1).set("age", Value::Null),
        Row::new().set("id", 2).set("age", ""),
        Row::new().set("id", 3).set("age", 0),
        Row::new().set("id", 4),
    ]);
    table.set_filter("age", ">", -1);
    assert_eq!(ids(&table.visible_rows()), [3]);

    table.set_filter("age", "<=", 0);
    assert_eq!(ids(&table.visible_rows()), [3]);
}

#[test]
fn test_unknown_sorter_is_skipped() {
    let mut table = Table::default()
        .with_columns(vec![Column::new("age").sorter("alphanum")])
        .with_data(three_people());
    table.set_sort([Sort::desc("age")]);
    assert_eq!(ids(&table.visible_rows()), [1, 2, 3]);
}
