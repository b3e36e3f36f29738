//! Selection across paging, filtering and row mutations.

use std::sync::Arc;
use std::sync::Mutex;

use tabula_lib::events::TableListener;
use tabula_lib::model::Row;
use tabula_lib::model::RowId;
use tabula_lib::Table;
use tabula_lib::TableOptions;

fn numbered(count: i64) -> Vec<Row> {
    (1..=count).map(|i| Row::new().set("id", i)).collect()
}

fn selected_ids(table: &Table) -> Vec<i64> {
    table
        .get_selected_data()
        .iter()
        .map(|row| row.get_int("id").unwrap().unwrap())
        .collect()
}

#[derive(Default)]
struct Recorder(Mutex<Vec<Vec<RowId>>>);

impl TableListener for Recorder {
    fn selection_changed(&self, selected: &[RowId]) {
        self.0.lock().unwrap().push(selected.to_vec());
    }
}

#[test]
fn test_delete_removes_selection() {
    let mut table = Table::default().with_data(numbered(3));
    table.select_row(RowId::from(2));
    assert_eq!(selected_ids(&table), [2]);

    let position = table.position_of(&RowId::from(2)).unwrap();
    table.delete_row(position);
    assert!(!table.is_selected(&RowId::from(2)));
    assert!(selected_ids(&table).is_empty());
}

#[test]
fn test_selection_survives_paging_and_filtering() {
    let mut table = Table::new(TableOptions::paginated(5)).with_data(numbered(20));
    table.select_rows([RowId::from(2), RowId::from(17)]);

    table.set_page(3);
    table.set_filter("id", ">", 10);
    table.set_page(2);
    assert_eq!(selected_ids(&table), [2, 17]);

    table.clear_filter(None);
    assert!(table.is_selected(&RowId::from(2)));
}

#[test]
fn test_replaced_rows_resolve_lazily() {
    let mut table = Table::default().with_data(numbered(4));
    table.select_rows([RowId::from(1), RowId::from(4)]);

    table.set_rows(numbered(2));
    assert_eq!(selected_ids(&table), [1]);

    table.set_rows(numbered(4));
    assert_eq!(selected_ids(&table), [1, 4]);
}

#[test]
fn test_update_keeps_selection() {
    let mut table = Table::default().with_data(numbered(3));
    table.select_row(RowId::from(3));
    table.update_rows(&[Row::new().set("id", 3).set("name", "renamed")]);

    let selected = table.get_selected_data();
    assert_eq!(selected[0].get_string("name").unwrap(), Some("renamed"));
}

#[test]
fn test_listener_sees_each_change_once() {
    let recorder = Arc::new(Recorder::default());
    let mut table = Table::default().with_data(numbered(3));
    table.add_listener(recorder.clone());

    table.select_row(RowId::from(1));
    table.select_row(RowId::from(1));
    table.select_rows([RowId::from(2), RowId::from(3)]);
    table.delete_row(0);
    table.clear_selection();

    let events = recorder.0.lock().unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(events[1], [RowId::from(1), RowId::from(2), RowId::from(3)]);
    assert_eq!(events[2], [RowId::from(2), RowId::from(3)]);
    assert!(events[3].is_empty());
}
