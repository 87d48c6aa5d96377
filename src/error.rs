//! Error types for pagestore
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::RowId;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for pagestore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O and Serialization Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("{} is already in use", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Database {} does not exist", path.display())]
    DatabaseNotFound { path: PathBuf },

    #[error("Table '{table}' does not exist")]
    TableNotFound { table: String },

    #[error("Row {row_id} not found in table '{table}'")]
    RowNotFound { table: String, row_id: RowId },

    #[error("Leftover transient file '{file}' in table '{table}'; remove .temp and .vacu files manually")]
    CorruptionGuard { table: String, file: String },

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("Column '{column}' does not exist in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Type mismatch for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Max length of {max_length} exceeded for column '{column}' (got {actual})")]
    LengthExceeded {
        column: String,
        max_length: usize,
        actual: usize,
    },

    // -------------------------------------------------------------------------
    // Write Path Errors
    // -------------------------------------------------------------------------
    #[error("Table '{table}' is full (max_rows: {max_rows})")]
    TableFull { table: String, max_rows: u64 },

    #[error("Query did not match any data in table '{table}'")]
    NoMatch { table: String },

    #[error("Write verification failed for {}: {reason}", page.display())]
    WriteVerification { page: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// True for every flavour of "does not exist" (database, table or row)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::DatabaseNotFound { .. }
                | StoreError::TableNotFound { .. }
                | StoreError::RowNotFound { .. }
        )
    }
}
