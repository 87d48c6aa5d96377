//! Query Module
//!
//! Full-table scans with an optional equality predicate. There is no index:
//! every lookup reads every page.
//!
//! ## Access Patterns
//! - `scan`: lazy, ascending page order (insertion order)
//! - `find`: first match in descending page order
//! - `query`: all matches in descending page order

mod predicate;
mod scan;

pub use predicate::{Predicate, Term};
pub use scan::{ScanOrder, TableScan};
