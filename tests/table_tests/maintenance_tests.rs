//! Tests for table maintenance
//!
//! These tests verify:
//! - Vacuum compaction and row id reassignment
//! - Truncate removes data but keeps the definition
//! - Table stats

use std::fs;

use pagestore::storage::find_transient;
use pagestore::{Database, DatabaseConfig, Predicate, Row, Schema, StoreError, Table, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_table(rows_per_page: u64, rows: u64) -> (TempDir, Database, Table) {
    let temp_dir = TempDir::new().unwrap();
    let config = DatabaseConfig::builder().rows_per_page(rows_per_page).build();
    let db = Database::create(temp_dir.path().join("db"), config).unwrap();
    let mut table = db
        .create_table("items", Schema::from_names(["name", "tag"]))
        .unwrap();
    table
        .insert_many((1..=rows).map(|i| Row::new().with("name", format!("item{}", i))))
        .unwrap();
    (temp_dir, db, table)
}

fn name_of(table: &Table, row_id: u64) -> String {
    table
        .find_row(row_id)
        .unwrap()
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Vacuum Tests
// =============================================================================

#[test]
fn test_vacuum_renumbers_live_rows() {
    let (_temp, _db, mut table) = setup_table(10, 12);
    for row_id in 1..=6 {
        table.delete_row(row_id).unwrap();
    }

    let live = table.vacuum().unwrap();

    assert_eq!(live, 6);
    assert_eq!(table.current_row(), 6);
    assert_eq!(name_of(&table, 1), "item7");
    assert_eq!(name_of(&table, 2), "item8");
    assert_eq!(name_of(&table, 6), "item12");
    assert!(matches!(table.find_row(7), Err(StoreError::RowNotFound { .. })));
}

#[test]
fn test_vacuum_shrinks_pages() {
    let (_temp, _db, mut table) = setup_table(5, 20);
    table.delete(&Predicate::new()).unwrap();
    table.insert(Row::new().with("name", "survivor")).unwrap();
    assert_eq!(table.pages().unwrap().len(), 5);

    table.vacuum().unwrap();

    let pages = table.pages().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].file_name(), "data1_5.dat");
    assert_eq!(name_of(&table, 1), "survivor");
}

#[test]
fn test_vacuum_keeps_order_and_data() {
    let (_temp, _db, mut table) = setup_table(4, 10);
    table.update_row(9, Row::new().with("tag", "keep")).unwrap();
    table.delete_row(2).unwrap();
    table.delete_row(5).unwrap();

    table.vacuum().unwrap();

    let names: Vec<String> = table
        .scan(None)
        .unwrap()
        .map(|row| row.unwrap().get("name").and_then(Value::as_str).unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["item1", "item3", "item4", "item6", "item7", "item8", "item9", "item10"]
    );
    let tagged = table.find_record(&Predicate::new().equals("tag", "keep")).unwrap().unwrap();
    assert_eq!(tagged.row_id, 7);
}

#[test]
fn test_vacuum_leaves_no_transient_files() {
    let (_temp, _db, mut table) = setup_table(3, 9);
    table.delete_row(4).unwrap();

    table.vacuum().unwrap();

    assert_eq!(find_transient(table.dir()).unwrap(), None);
}

#[test]
fn test_vacuum_empty_table() {
    let (_temp, _db, mut table) = setup_table(10, 0);

    assert_eq!(table.vacuum().unwrap(), 0);
    assert_eq!(table.current_row(), 0);
}

#[test]
fn test_vacuum_survives_reopen() {
    let (_temp, db, mut table) = setup_table(10, 12);
    table.delete_row(12).unwrap();
    table.delete_row(1).unwrap();
    table.vacuum().unwrap();
    drop(table);

    let reopened = db.open_table("items").unwrap();

    assert_eq!(reopened.current_row(), 10);
    assert_eq!(name_of(&reopened, 10), "item11");
}

// =============================================================================
// Truncate Tests
// =============================================================================

#[test]
fn test_truncate_removes_pages() {
    let (_temp, db, mut table) = setup_table(10, 25);

    table.truncate().unwrap();

    assert!(table.pages().unwrap().is_empty());
    assert_eq!(table.current_row(), 0);
    assert!(table.dir().join("definition.json").is_file());
    assert_eq!(db.open_table("items").unwrap().current_row(), 0);
}

#[test]
fn test_insert_after_truncate_starts_at_one() {
    let (_temp, _db, mut table) = setup_table(10, 5);
    table.truncate().unwrap();

    let row_id = table.insert(Row::new().with("name", "fresh")).unwrap();

    assert_eq!(row_id, 1);
    assert_eq!(table.query(&Predicate::new()).unwrap().len(), 1);
}

// =============================================================================
// Stats Tests
// =============================================================================

#[test]
fn test_stats() {
    let (_temp, _db, table) = setup_table(10, 15);

    let stats = table.stats().unwrap();

    assert_eq!(stats.page_count, 2);
    assert_eq!(stats.current_row, 15);
    assert_eq!(stats.settings.rows_per_page, 10);
    assert_eq!(stats.columns, *table.schema());
    let on_disk: u64 = ["data1_10.dat", "data11_20.dat"]
        .iter()
        .map(|name| fs::metadata(table.dir().join(name)).unwrap().len())
        .sum();
    assert_eq!(stats.data_size, on_disk);
}

#[test]
fn test_stats_empty_table() {
    let (_temp, _db, table) = setup_table(10, 0);

    let stats = table.stats().unwrap();

    assert_eq!(stats.page_count, 0);
    assert_eq!(stats.data_size, 0);
}
