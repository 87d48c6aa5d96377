//! Tests for page addressing
//!
//! These tests verify:
//! - Row id to page range arithmetic
//! - Page file naming and parsing
//! - Numeric (not lexical) ordering of pages

use std::collections::BTreeSet;

use pagestore::storage::PageRange;

// =============================================================================
// page_for Tests
// =============================================================================

#[test]
fn test_first_page() {
    let range = PageRange::for_row(1, 10).unwrap();

    assert_eq!(range, PageRange { first: 1, last: 10 });
    assert_eq!(range.file_name(), "data1_10.dat");
}

#[test]
fn test_last_slot_of_page() {
    let range = PageRange::for_row(10, 10).unwrap();

    assert_eq!(range, PageRange { first: 1, last: 10 });
}

#[test]
fn test_first_slot_of_next_page() {
    let range = PageRange::for_row(11, 10).unwrap();

    assert_eq!(range.file_name(), "data11_20.dat");
}

#[test]
fn test_large_row_id() {
    let range = PageRange::for_row(610, 10).unwrap();

    assert_eq!(range.file_name(), "data601_610.dat");
}

#[test]
fn test_row_zero_has_no_page() {
    assert_eq!(PageRange::for_row(0, 10), None);
}

#[test]
fn test_single_row_pages() {
    for row_id in 1..=20 {
        let range = PageRange::for_row(row_id, 1).unwrap();
        assert_eq!(range, PageRange { first: row_id, last: row_id });
    }
}

#[test]
fn test_every_row_lands_in_its_own_range() {
    for rows_per_page in [1, 3, 7, 10, 64] {
        for row_id in 1..=500 {
            let range = PageRange::for_row(row_id, rows_per_page).unwrap();
            assert!(range.contains(row_id), "row {} not in {}", row_id, range);
            assert_eq!(range.capacity(), rows_per_page);
            assert_eq!((range.first - 1) % rows_per_page, 0);
        }
    }
}

#[test]
fn test_page_count_for_610_rows() {
    let names: BTreeSet<String> = (1..=610)
        .map(|row_id| PageRange::for_row(row_id, 10).unwrap().file_name())
        .collect();

    assert_eq!(names.len(), 61);
    assert!(names.contains("data1_10.dat"));
    assert!(names.contains("data601_610.dat"));
}

// =============================================================================
// Naming Tests
// =============================================================================

#[test]
fn test_parse_committed_name() {
    let range = PageRange::parse("data11_20.dat").unwrap();

    assert_eq!(range, PageRange { first: 11, last: 20 });
}

#[test]
fn test_parse_rejects_transient_and_foreign_names() {
    assert_eq!(PageRange::parse("data11_20.dat.temp"), None);
    assert_eq!(PageRange::parse("data11_20.dat.vacu"), None);
    assert_eq!(PageRange::parse("definition.json"), None);
    assert_eq!(PageRange::parse("data11_20.txt"), None);
    assert_eq!(PageRange::parse("data20_11.dat"), None);
    assert_eq!(PageRange::parse("data0_9.dat"), None);
    assert_eq!(PageRange::parse("dataX_20.dat"), None);
}

#[test]
fn test_ordering_is_numeric() {
    let mut ranges: Vec<PageRange> = ["data101_110.dat", "data11_20.dat", "data1_10.dat", "data91_100.dat"]
        .into_iter()
        .filter_map(PageRange::parse)
        .collect();

    ranges.sort();

    let firsts: Vec<u64> = ranges.iter().map(|range| range.first).collect();
    assert_eq!(firsts, vec![1, 11, 91, 101]);
}

#[test]
fn test_display() {
    assert_eq!(PageRange { first: 11, last: 20 }.to_string(), "[11, 20]");
}
