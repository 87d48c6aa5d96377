//! Configuration for pagestore
//!
//! Database-wide defaults and per-table settings, with sensible defaults.
//!
//! The database config is written once at creation time to
//! `{db}/schema.json` and is immutable afterwards:
//!
//! ```text
//! {"rows_per_page":10,"max_rows":10000,"storage_format_version":1}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Storage format version written by this build
pub const STORAGE_FORMAT_VERSION: u32 = 1;

/// Default number of row slots per page file
pub const DEFAULT_ROWS_PER_PAGE: u64 = 10;

/// Default upper bound on row ids per table
pub const DEFAULT_MAX_ROWS: u64 = 10_000;

/// Default max_length for `str` columns declared without one
pub const DEFAULT_MAX_LENGTH: usize = 10_000;

/// Database-wide configuration, persisted as `schema.json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    // -------------------------------------------------------------------------
    // Table Defaults
    // -------------------------------------------------------------------------
    /// Row slots per page file, inherited by new tables
    pub rows_per_page: u64,

    /// Highest row id a table may assign, inherited by new tables
    pub max_rows: u64,

    // -------------------------------------------------------------------------
    // Format
    // -------------------------------------------------------------------------
    /// On-disk format version, checked on open
    pub storage_format_version: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            max_rows: DEFAULT_MAX_ROWS,
            storage_format_version: STORAGE_FORMAT_VERSION,
        }
    }
}

impl DatabaseConfig {
    /// Create a new config builder
    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::default()
    }

    /// Settings a new table inherits when none are given
    pub fn table_settings(&self) -> TableSettings {
        TableSettings {
            rows_per_page: self.rows_per_page,
            max_rows: self.max_rows,
        }
    }

    /// Reject zero sizes and format versions this build can't read
    pub fn validate(&self) -> Result<()> {
        self.table_settings().validate()?;
        if self.storage_format_version != STORAGE_FORMAT_VERSION {
            return Err(StoreError::Config(format!(
                "Unsupported storage format version {} (supported: {})",
                self.storage_format_version, STORAGE_FORMAT_VERSION
            )));
        }
        Ok(())
    }
}

/// Builder for DatabaseConfig
#[derive(Default)]
pub struct DatabaseConfigBuilder {
    config: DatabaseConfig,
}

impl DatabaseConfigBuilder {
    /// Set the number of row slots per page file
    pub fn rows_per_page(mut self, rows: u64) -> Self {
        self.config.rows_per_page = rows;
        self
    }

    /// Set the maximum row id per table
    pub fn max_rows(mut self, rows: u64) -> Self {
        self.config.max_rows = rows;
        self
    }

    pub fn build(self) -> DatabaseConfig {
        self.config
    }
}

/// Per-table paging settings, stored in the table definition file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    pub rows_per_page: u64,
    pub max_rows: u64,
}

impl Default for TableSettings {
    fn default() -> Self {
        DatabaseConfig::default().table_settings()
    }
}

impl TableSettings {
    pub fn validate(&self) -> Result<()> {
        if self.rows_per_page == 0 {
            return Err(StoreError::Config(
                "rows_per_page must be greater than 0".to_string(),
            ));
        }
        if self.max_rows == 0 {
            return Err(StoreError::Config(
                "max_rows must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
