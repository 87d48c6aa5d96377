//! Truncate, vacuum and stats

use std::fs;

use crate::config::TableSettings;
use crate::error::Result;
use crate::schema::Schema;
use crate::storage::{list_pages, list_vacuum_sources, transient_path, PageFile, VACUUM_SUFFIX};

use super::Table;

/// Snapshot of a table's definition and on-disk footprint
#[derive(Debug, Clone, PartialEq)]
pub struct TableStats {
    pub settings: TableSettings,
    pub columns: Schema,
    pub page_count: usize,
    pub current_row: u64,
    /// Total bytes across page files
    pub data_size: u64,
}

impl Table {
    /// Delete every page file and reset the cursor. The schema is kept.
    pub fn truncate(&mut self) -> Result<()> {
        let pages = list_pages(&self.dir)?;
        for range in &pages {
            fs::remove_file(range.path_in(&self.dir))?;
        }
        self.cursor.reset();

        tracing::info!(table = %self.name, pages = pages.len(), "truncated table");
        Ok(())
    }

    /// Compact the table by replaying every live row into fresh pages.
    ///
    /// Row ids are reassigned from 1 in the old scan order. Steps:
    /// 1. Rename every page to `*.vacu`
    /// 2. Reset the cursor
    /// 3. For each source page (ascending), insert each live row through the
    ///    single-row path, then delete the source
    ///
    /// An interruption leaves `.vacu` files that block the next open.
    /// Returns the number of live rows.
    pub fn vacuum(&mut self) -> Result<u64> {
        let pages = list_pages(&self.dir)?;
        tracing::info!(table = %self.name, pages = pages.len(), "vacuum started");

        for range in &pages {
            let committed = range.path_in(&self.dir);
            fs::rename(&committed, transient_path(&committed, VACUUM_SUFFIX))?;
        }

        self.cursor.reset();

        for range in list_vacuum_sources(&self.dir)? {
            let source = PageFile::at(
                transient_path(&range.path_in(&self.dir), VACUUM_SUFFIX),
                range,
            );
            for line in source.lines()? {
                if let Some(record) = line? {
                    self.append_row(record.data)?;
                }
            }
            fs::remove_file(source.path())?;
        }

        let live_rows = self.cursor.current();
        tracing::info!(
            table = %self.name,
            live_rows,
            pages = list_pages(&self.dir)?.len(),
            "vacuum finished"
        );
        Ok(live_rows)
    }

    /// Definition, page count, cursor and byte size of the table
    pub fn stats(&self) -> Result<TableStats> {
        let pages = list_pages(&self.dir)?;
        let mut data_size = 0;
        for range in &pages {
            data_size += fs::metadata(range.path_in(&self.dir))?.len();
        }

        Ok(TableStats {
            settings: self.settings,
            columns: self.schema.clone(),
            page_count: pages.len(),
            current_row: self.cursor.current(),
            data_size,
        })
    }
}
