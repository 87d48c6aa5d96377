//! Tests for schema scrubbing
//!
//! These tests verify:
//! - Column name normalization and unknown column rejection
//! - Type and max length checks
//! - Missing column handling for inserts vs updates
//! - Positional input
//! - Schema validation and definition file persistence

use pagestore::schema::{MissingColumns, TableDefinition};
use pagestore::{ColumnDef, DataType, Predicate, Row, Schema, StoreError, TableSettings, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn users_schema() -> Schema {
    Schema::new()
        .column(ColumnDef::str("name", 8))
        .column(ColumnDef::int("age"))
        .column(ColumnDef::float("score"))
        .column(ColumnDef::bool("admin"))
}

// =============================================================================
// Normalization Tests
// =============================================================================

#[test]
fn test_scrub_lowercases_columns() {
    let schema = users_schema();

    let row = schema
        .scrub("users", Row::new().with("NAME", "bob"), MissingColumns::Leave)
        .unwrap();

    assert_eq!(row.get("name"), Some(&Value::from("bob")));
    assert!(!row.contains("NAME"));
}

#[test]
fn test_scrub_orders_by_schema() {
    let schema = users_schema();

    let row = schema
        .scrub(
            "users",
            Row::new().with("admin", true).with("name", "bob"),
            MissingColumns::Leave,
        )
        .unwrap();

    let columns: Vec<&str> = row.columns().collect();
    assert_eq!(columns, vec!["name", "admin"]);
}

#[test]
fn test_scrub_fills_missing_with_null() {
    let schema = users_schema();

    let row = schema
        .scrub("users", Row::new().with("name", "bob"), MissingColumns::FillNull)
        .unwrap();

    assert_eq!(row.len(), 4);
    assert_eq!(row.get("age"), Some(&Value::Null));
    assert_eq!(row.get("admin"), Some(&Value::Null));
}

#[test]
fn test_scrub_leaves_missing_out() {
    let schema = users_schema();

    let row = schema
        .scrub("users", Row::new().with("age", 30), MissingColumns::Leave)
        .unwrap();

    assert_eq!(row.len(), 1);
    assert_eq!(row.get("age"), Some(&Value::Int(30)));
}

#[test]
fn test_scrub_unknown_column() {
    let schema = users_schema();

    let result = schema.scrub(
        "users",
        Row::new().with("nickname", "bobby"),
        MissingColumns::FillNull,
    );

    match result {
        Err(StoreError::UnknownColumn { table, column }) => {
            assert_eq!(table, "users");
            assert_eq!(column, "nickname");
        }
        other => panic!("expected UnknownColumn, got {:?}", other),
    }
}

// =============================================================================
// Type and Length Tests
// =============================================================================

#[test]
fn test_scrub_type_mismatch() {
    let schema = users_schema();

    let result = schema.scrub("users", Row::new().with("age", "thirty"), MissingColumns::Leave);

    match result {
        Err(StoreError::TypeMismatch {
            column,
            expected,
            actual,
        }) => {
            assert_eq!(column, "age");
            assert_eq!(expected, "int");
            assert_eq!(actual, "str");
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_scrub_int_is_not_float() {
    let schema = users_schema();

    let result = schema.scrub("users", Row::new().with("score", 3), MissingColumns::Leave);

    assert!(matches!(result, Err(StoreError::TypeMismatch { .. })));
}

#[test]
fn test_scrub_null_accepted_for_every_type() {
    let schema = users_schema();

    let row = schema
        .scrub(
            "users",
            Row::new()
                .with("name", Value::Null)
                .with("age", Value::Null)
                .with("score", Value::Null)
                .with("admin", Value::Null),
            MissingColumns::Leave,
        )
        .unwrap();

    assert!(row.iter().all(|(_, value)| value.is_null()));
}

#[test]
fn test_scrub_length_at_limit() {
    let schema = users_schema();

    let row = schema
        .scrub("users", Row::new().with("name", "abcdefgh"), MissingColumns::Leave)
        .unwrap();

    assert_eq!(row.get("name").and_then(Value::as_str), Some("abcdefgh"));
}

#[test]
fn test_scrub_length_exceeded() {
    let schema = users_schema();

    let result = schema.scrub("users", Row::new().with("name", "abcdefghi"), MissingColumns::Leave);

    match result {
        Err(StoreError::LengthExceeded {
            column,
            max_length,
            actual,
        }) => {
            assert_eq!(column, "name");
            assert_eq!(max_length, 8);
            assert_eq!(actual, 9);
        }
        other => panic!("expected LengthExceeded, got {:?}", other),
    }
}

#[test]
fn test_scrub_length_counts_characters() {
    let schema = users_schema();

    // 8 characters, 16 bytes
    let row = schema.scrub("users", Row::new().with("name", "éééééééé"), MissingColumns::Leave);

    assert!(row.is_ok());
}

#[test]
fn test_scrub_rejects_non_finite_floats() {
    let schema = users_schema();

    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let result = schema.scrub("users", Row::new().with("score", value), MissingColumns::Leave);

        match result {
            Err(StoreError::TypeMismatch { column, expected, actual }) => {
                assert_eq!(column, "score");
                assert_eq!(expected, "float");
                assert_eq!(actual, "non-finite float");
            }
            other => panic!("expected TypeMismatch for {}, got {:?}", value, other),
        }
    }
}

#[test]
fn test_scrub_predicate_rejects_non_finite_floats() {
    let schema = users_schema();
    let predicate = Predicate::new().any_of("score", [1.0, f64::NAN]);

    let result = schema.scrub_predicate("users", &predicate);

    assert!(matches!(result, Err(StoreError::TypeMismatch { .. })));
}

// =============================================================================
// Positional Input Tests
// =============================================================================

#[test]
fn test_scrub_positional_zips_schema_order() {
    let schema = users_schema();

    let row = schema
        .scrub(
            "users",
            vec![Value::from("bob"), Value::from(42)],
            MissingColumns::FillNull,
        )
        .unwrap();

    assert_eq!(row.get("name"), Some(&Value::from("bob")));
    assert_eq!(row.get("age"), Some(&Value::Int(42)));
    assert_eq!(row.get("score"), Some(&Value::Null));
}

#[test]
fn test_scrub_positional_too_many_values() {
    let schema = Schema::from_names(["name"]);

    let result = schema.scrub(
        "users",
        vec![Value::from("bob"), Value::from("extra")],
        MissingColumns::FillNull,
    );

    assert!(matches!(result, Err(StoreError::UnknownColumn { .. })));
}

// =============================================================================
// Predicate Tests
// =============================================================================

#[test]
fn test_scrub_predicate_lowercases() {
    let schema = users_schema();

    let predicate = schema
        .scrub_predicate("users", &Predicate::new().equals("Name", "bob"))
        .unwrap();

    assert_eq!(predicate.terms()[0].column, "name");
}

#[test]
fn test_scrub_predicate_unknown_column() {
    let schema = users_schema();

    let result = schema.scrub_predicate("users", &Predicate::new().equals("nickname", "bob"));

    assert!(matches!(result, Err(StoreError::UnknownColumn { .. })));
}

#[test]
fn test_scrub_predicate_type_mismatch() {
    let schema = users_schema();

    let predicate = Predicate::new().any_of("age", [Value::from(1), Value::from("two")]);

    let result = schema.scrub_predicate("users", &predicate);

    assert!(matches!(result, Err(StoreError::TypeMismatch { .. })));
}

// =============================================================================
// Schema Declaration Tests
// =============================================================================

#[test]
fn test_from_names_defaults() {
    let schema = Schema::from_names(["Name", "password"]);

    let name = schema.get("name").unwrap();
    assert_eq!(name.data_type, DataType::Str);
    assert_eq!(name.max_length, Some(10_000));
    assert!(schema.get("password").is_some());
}

#[test]
fn test_non_str_columns_have_no_max_length() {
    let schema = users_schema();

    assert_eq!(schema.get("age").unwrap().max_length, None);
    assert_eq!(schema.get("admin").unwrap().max_length, None);
}

#[test]
fn test_validate_rejects_duplicates() {
    let schema = Schema::new()
        .column(ColumnDef::int("id"))
        .column(ColumnDef::str("ID", 10));

    assert!(matches!(schema.validate(), Err(StoreError::Config(_))));
}

#[test]
fn test_validate_rejects_empty_schema() {
    assert!(matches!(Schema::new().validate(), Err(StoreError::Config(_))));
}

// =============================================================================
// Definition File Tests
// =============================================================================

#[test]
fn test_definition_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let definition = TableDefinition {
        settings: TableSettings {
            rows_per_page: 5,
            max_rows: 50,
        },
        columns: users_schema(),
    };

    definition.save(temp_dir.path()).unwrap();
    let loaded = TableDefinition::load(temp_dir.path()).unwrap();

    assert_eq!(loaded, definition);
    let names: Vec<&str> = loaded.columns.column_names().collect();
    assert_eq!(names, vec!["name", "age", "score", "admin"]);
}

#[test]
fn test_definition_unknown_data_type() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("definition.json"),
        r#"{"settings":{"rows_per_page":10,"max_rows":100},"columns":{"blob":{"data_type":"bytes"}}}"#,
    )
    .unwrap();

    let result = TableDefinition::load(temp_dir.path());

    assert!(matches!(result, Err(StoreError::Serialization(_))));
}

#[test]
fn test_definition_str_without_max_length() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("definition.json"),
        r#"{"settings":{"rows_per_page":10,"max_rows":100},"columns":{"name":{"data_type":"str"}}}"#,
    )
    .unwrap();

    let loaded = TableDefinition::load(temp_dir.path()).unwrap();

    assert_eq!(loaded.columns.get("name").unwrap().max_length, Some(10_000));
}
