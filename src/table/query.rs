//! Predicate-driven table operations
//!
//! All of these are full scans. `find`/`query` walk pages newest-first,
//! `scan` walks them oldest-first.

use crate::error::{Result, StoreError};
use crate::query::{Predicate, ScanOrder, TableScan};
use crate::record::{Row, RowId, RowRecord};
use crate::schema::{MissingColumns, RowInput};
use crate::storage::Rewrite;

use super::Table;

impl Table {
    /// Lazy scan of row data in insertion order
    pub fn scan(
        &self,
        predicate: Option<&Predicate>,
    ) -> Result<impl Iterator<Item = Result<Row>> + '_> {
        Ok(self
            .scan_records(predicate)?
            .map(|record| record.map(|record| record.data)))
    }

    /// Lazy scan yielding row ids alongside data
    pub fn scan_records(&self, predicate: Option<&Predicate>) -> Result<TableScan<'_>> {
        let predicate = match predicate {
            Some(predicate) => self.schema.scrub_predicate(&self.name, predicate)?,
            None => Predicate::new(),
        };
        TableScan::new(&self.dir, ScanOrder::Ascending, predicate)
    }

    /// First match, most recent page first
    pub fn find(&self, predicate: &Predicate) -> Result<Option<Row>> {
        Ok(self.find_record(predicate)?.map(|record| record.data))
    }

    pub fn find_record(&self, predicate: &Predicate) -> Result<Option<RowRecord>> {
        self.newest_first(predicate)?.next().transpose()
    }

    /// All matches, most recent page first
    pub fn query(&self, predicate: &Predicate) -> Result<Vec<Row>> {
        self.newest_first(predicate)?
            .map(|record| record.map(|record| record.data))
            .collect()
    }

    pub fn query_records(&self, predicate: &Predicate) -> Result<Vec<RowRecord>> {
        self.newest_first(predicate)?.collect()
    }

    /// Ids of every matching row, most recent page first
    pub fn matching_row_ids(&self, predicate: &Predicate) -> Result<Vec<RowId>> {
        self.newest_first(predicate)?
            .map(|record| record.map(|record| record.row_id))
            .collect()
    }

    /// Merge `changes` into every matching row; returns how many were updated
    pub fn update(&mut self, predicate: &Predicate, changes: impl Into<RowInput>) -> Result<usize> {
        let changes = self
            .schema
            .scrub(&self.name, changes, MissingColumns::Leave)?;
        let row_ids = self.matches_or_fail(predicate)?;

        for &row_id in &row_ids {
            self.rewrite_row(row_id, Rewrite::Update(changes.clone()))?;
        }

        tracing::debug!(table = %self.name, rows = row_ids.len(), "updated by predicate");
        Ok(row_ids.len())
    }

    /// Delete every matching row; returns how many were deleted
    pub fn delete(&mut self, predicate: &Predicate) -> Result<usize> {
        let row_ids = self.matches_or_fail(predicate)?;

        for &row_id in &row_ids {
            self.rewrite_row(row_id, Rewrite::Delete)?;
        }

        tracing::debug!(table = %self.name, rows = row_ids.len(), "deleted by predicate");
        Ok(row_ids.len())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn newest_first(&self, predicate: &Predicate) -> Result<TableScan<'_>> {
        let predicate = self.schema.scrub_predicate(&self.name, predicate)?;
        TableScan::new(&self.dir, ScanOrder::Descending, predicate)
    }

    fn matches_or_fail(&self, predicate: &Predicate) -> Result<Vec<RowId>> {
        let row_ids = self.matching_row_ids(predicate)?;
        if row_ids.is_empty() {
            return Err(StoreError::NoMatch {
                table: self.name.clone(),
            });
        }
        Ok(row_ids)
    }
}
