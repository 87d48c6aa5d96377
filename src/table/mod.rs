//! Table Module
//!
//! Row-level operations on one table directory.
//!
//! ## Responsibilities
//! - Assign row ids from the cursor and append rows to their pages
//! - Point lookups, updates and deletes by row id
//! - Predicate-driven find/query/scan/update/delete (see `query.rs`)
//! - Truncate, vacuum and stats (see `maintenance.rs`)
//!
//! ## Concurrency
//! None. A table assumes it is the only handle touching its directory;
//! mutating operations take `&mut self` and perform blocking I/O, and no
//! file stays open between calls.

mod maintenance;
mod query;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TableSettings;
use crate::error::{Result, StoreError};
use crate::record::{Row, RowId, RowRecord};
use crate::schema::{MissingColumns, RowInput, Schema, TableDefinition, DEFINITION_FILE};
use crate::storage::{find_transient, list_pages, PageFile, PageRange, Rewrite, RowCursor};

pub use maintenance::TableStats;

/// An open table
#[derive(Debug)]
pub struct Table {
    /// Lower-case table name
    name: String,

    /// `{db}/{name}`
    dir: PathBuf,

    schema: Schema,

    settings: TableSettings,

    /// Highest row id assigned so far
    cursor: RowCursor,
}

impl Table {
    /// Create the table directory and its definition file
    pub(crate) fn create(
        dir: PathBuf,
        name: String,
        schema: Schema,
        settings: TableSettings,
    ) -> Result<Self> {
        schema.validate()?;
        settings.validate()?;

        if dir.exists() {
            return Err(StoreError::AlreadyExists { path: dir });
        }
        fs::create_dir(&dir)?;

        let definition = TableDefinition {
            settings,
            columns: schema,
        };
        definition.save(&dir)?;

        tracing::info!(table = %name, rows_per_page = settings.rows_per_page, "created table");

        Ok(Self {
            name,
            dir,
            schema: definition.columns,
            settings,
            cursor: RowCursor::default(),
        })
    }

    /// Open an existing table directory
    ///
    /// On open:
    /// 1. Load the definition file
    /// 2. Refuse to continue if a `.temp` or `.vacu` file was left behind
    /// 3. Recover the row cursor from the highest non-empty page
    pub(crate) fn open(dir: PathBuf, name: String) -> Result<Self> {
        if !dir.join(DEFINITION_FILE).is_file() {
            return Err(StoreError::TableNotFound { table: name });
        }

        let definition = TableDefinition::load(&dir)?;

        if let Some(file) = find_transient(&dir)? {
            tracing::warn!(table = %name, file = %file, "transient file left behind, refusing to open");
            return Err(StoreError::CorruptionGuard { table: name, file });
        }

        let cursor = RowCursor::recover(&dir)?;

        tracing::info!(table = %name, current_row = cursor.current(), "opened table");

        Ok(Self {
            name,
            dir,
            schema: definition.columns,
            settings: definition.settings,
            cursor,
        })
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Insert one row; columns not supplied are stored as null
    pub fn insert(&mut self, input: impl Into<RowInput>) -> Result<RowId> {
        let data = self
            .schema
            .scrub(&self.name, input, MissingColumns::FillNull)?;
        self.append_row(data)
    }

    /// Insert rows in order, one append per page touched.
    ///
    /// Every row is validated before anything is written. A failure on a
    /// later page leaves the earlier pages committed and is returned as is;
    /// the rows that made it are `current_row()` after the call minus
    /// `current_row()` before it.
    pub fn insert_many<I>(&mut self, inputs: I) -> Result<u64>
    where
        I: IntoIterator,
        I::Item: Into<RowInput>,
    {
        let rows = inputs
            .into_iter()
            .map(|input| {
                self.schema
                    .scrub(&self.name, input, MissingColumns::FillNull)
            })
            .collect::<Result<Vec<Row>>>()?;

        let mut remaining = rows.len() as u64;
        let mut rows = rows.into_iter();
        let mut inserted = 0;

        while remaining > 0 {
            let current = self.cursor.current();
            let page = self.page_for(current + 1)?;
            let chunk = remaining.min(page.range().last - current);
            self.ensure_capacity(chunk)?;

            let first = self.cursor.advance(chunk);
            let records: Vec<RowRecord> = (first..first + chunk)
                .zip(rows.by_ref())
                .map(|(row_id, data)| RowRecord::new(row_id, data))
                .collect();
            page.append_batch(&records)?;

            inserted += chunk;
            remaining -= chunk;
        }

        tracing::debug!(table = %self.name, inserted, current_row = self.cursor.current(), "batch insert");
        Ok(inserted)
    }

    /// Append already-scrubbed data under the next row id
    fn append_row(&mut self, data: Row) -> Result<RowId> {
        self.ensure_capacity(1)?;
        let row_id = self.cursor.advance(1);
        let page = self.page_for(row_id)?;
        page.append(&RowRecord::new(row_id, data))?;
        Ok(row_id)
    }

    fn ensure_capacity(&self, count: u64) -> Result<()> {
        if self.cursor.current() + count > self.settings.max_rows {
            return Err(StoreError::TableFull {
                table: self.name.clone(),
                max_rows: self.settings.max_rows,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Row Id Operations
    // =========================================================================

    /// Data of the row with `row_id`
    pub fn find_row(&self, row_id: RowId) -> Result<Row> {
        Ok(self.find_row_record(row_id)?.data)
    }

    /// The full record (id + data) of `row_id`
    pub fn find_row_record(&self, row_id: RowId) -> Result<RowRecord> {
        let page = self.page_for(row_id)?;
        match page.locate(row_id)? {
            Some((_, record)) => Ok(record),
            None => Err(self.row_not_found(row_id)),
        }
    }

    /// Merge `changes` into the stored row; other columns stay as they are
    pub fn update_row(&mut self, row_id: RowId, changes: impl Into<RowInput>) -> Result<()> {
        let changes = self
            .schema
            .scrub(&self.name, changes, MissingColumns::Leave)?;
        self.rewrite_row(row_id, Rewrite::Update(changes))
    }

    /// Blank the row's line. The id is never handed out again by this handle.
    pub fn delete_row(&mut self, row_id: RowId) -> Result<()> {
        self.rewrite_row(row_id, Rewrite::Delete)
    }

    fn rewrite_row(&mut self, row_id: RowId, change: Rewrite) -> Result<()> {
        let page = self.page_for(row_id)?;
        page.rewrite(&self.name, row_id, change)?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn settings(&self) -> TableSettings {
        self.settings
    }

    /// Highest row id assigned so far (0 for an empty table)
    pub fn current_row(&self) -> RowId {
        self.cursor.current()
    }

    /// Committed page ranges, ascending
    pub fn pages(&self) -> Result<Vec<PageRange>> {
        list_pages(&self.dir)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Page owning `row_id`; row 0 has none
    fn page_for(&self, row_id: RowId) -> Result<PageFile> {
        PageRange::for_row(row_id, self.settings.rows_per_page)
            .map(|range| PageFile::new(&self.dir, range))
            .ok_or_else(|| self.row_not_found(row_id))
    }

    fn row_not_found(&self, row_id: RowId) -> StoreError {
        StoreError::RowNotFound {
            table: self.name.clone(),
            row_id,
        }
    }
}
