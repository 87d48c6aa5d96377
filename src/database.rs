//! Database Module
//!
//! A database is a directory of table directories plus one config file.
//!
//! ## Responsibilities
//! - Create a database directory and persist its config
//! - Validate the config (and its format version) on open
//! - Create, open, list and drop tables
//!
//! ## Layout
//! ```text
//! {db}/
//!   ├── schema.json           database config (immutable)
//!   ├── users/                one directory per table
//!   │   ├── definition.json
//!   │   └── data1_10.dat
//!   └── orders/
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DatabaseConfig, TableSettings};
use crate::error::{Result, StoreError};
use crate::schema::Schema;
use crate::table::Table;

/// Name of the database config file
pub const CONFIG_FILE: &str = "schema.json";

/// Handle on a database directory
///
/// Holds no open files. Tables opened through it are independent handles.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    config: DatabaseConfig,
}

impl Database {
    /// Create a new database directory and write its config
    ///
    /// Fails with `AlreadyExists` if anything is already at `path`.
    pub fn create(path: impl AsRef<Path>, config: DatabaseConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        config.validate()?;

        if path.exists() {
            return Err(StoreError::AlreadyExists { path });
        }

        fs::create_dir_all(&path)?;
        let json = serde_json::to_string(&config)?;
        fs::write(path.join(CONFIG_FILE), json)?;

        tracing::info!(
            path = %path.display(),
            rows_per_page = config.rows_per_page,
            max_rows = config.max_rows,
            "created database"
        );

        Ok(Self { path, config })
    }

    /// Open an existing database and validate its config
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !Self::exists(&path) {
            return Err(StoreError::DatabaseNotFound { path });
        }

        let json = fs::read_to_string(path.join(CONFIG_FILE))?;
        let config: DatabaseConfig = serde_json::from_str(&json)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "opened database");
        Ok(Self { path, config })
    }

    /// True if `path` holds a database config file
    pub fn exists(path: impl AsRef<Path>) -> bool {
        path.as_ref().join(CONFIG_FILE).is_file()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Names of every table directory, sorted
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut tables = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                tables.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        tables.sort();
        Ok(tables)
    }

    /// True if a table directory named `name` exists
    pub fn has_table(&self, name: &str) -> bool {
        self.path.join(name.to_lowercase()).is_dir()
    }

    /// Create a table with the database-wide paging settings
    pub fn create_table(&self, name: &str, schema: Schema) -> Result<Table> {
        self.create_table_with_settings(name, schema, self.config.table_settings())
    }

    /// Create a table with its own `rows_per_page`/`max_rows`
    pub fn create_table_with_settings(
        &self,
        name: &str,
        schema: Schema,
        settings: TableSettings,
    ) -> Result<Table> {
        let name = table_name(name)?;
        Table::create(self.path.join(&name), name, schema, settings)
    }

    pub fn open_table(&self, name: &str) -> Result<Table> {
        let name = table_name(name)?;
        Table::open(self.path.join(&name), name)
    }

    /// Remove a table directory and everything in it
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let name = table_name(name)?;
        let dir = self.path.join(&name);
        if !dir.is_dir() {
            return Err(StoreError::TableNotFound { table: name });
        }

        fs::remove_dir_all(&dir)?;
        tracing::info!(table = %name, "dropped table");
        Ok(())
    }
}

/// Lower-case `name` and make sure it is a single path component
fn table_name(name: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    if name.is_empty() || name.contains(['/', '\\', '.']) {
        return Err(StoreError::Config(format!("Invalid table name '{}'", name)));
    }
    Ok(name)
}
