//! # pagestore
//!
//! A minimal file-backed record store for memory-constrained devices:
//! - One directory per table, rows stored as JSON lines in fixed-size pages
//! - Row ids map to pages by arithmetic, so there is no index to load
//! - Deletes blank a line in place; vacuum compacts and renumbers
//! - Rewrites go through a temp file and are verified before they replace
//!   the committed page
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Database                             │
//! │               (schema.json, table directories)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                          Table                               │
//! │        (row cursor, insert/update/delete, vacuum)            │
//! └──────┬──────────────────────┬───────────────────────┬───────┘
//!        │                      │                       │
//!        ▼                      ▼                       ▼
//!  ┌───────────┐         ┌─────────────┐         ┌─────────────┐
//!  │  Schema   │         │    Query    │         │   Storage   │
//!  │  (scrub)  │         │ (full scan) │────────▶│   (pages)   │
//!  └───────────┘         └─────────────┘         └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use pagestore::{Database, DatabaseConfig, Predicate, Row, Schema};
//!
//! # fn main() -> pagestore::Result<()> {
//! let db = Database::create("./data", DatabaseConfig::default())?;
//! let mut users = db.create_table("users", Schema::from_names(["name", "password"]))?;
//!
//! let id = users.insert(Row::new().with("name", "bob").with("password", "pw"))?;
//! assert_eq!(users.find_row(id)?.get("name"), Some(&"bob".into()));
//!
//! let bob = users.find(&Predicate::new().equals("name", "bob"))?;
//! assert!(bob.is_some());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod schema;
pub mod storage;
pub mod query;
pub mod table;
pub mod database;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::{DatabaseConfig, TableSettings};
pub use database::Database;
pub use query::Predicate;
pub use record::{DataType, Row, RowId, RowRecord, Value};
pub use schema::{ColumnDef, RowInput, Schema};
pub use table::{Table, TableStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pagestore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
