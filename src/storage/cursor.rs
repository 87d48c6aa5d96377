//! Row cursor
//!
//! Tracks `current_row`, the highest row id handed out. It is never
//! persisted: on open it is recovered from the pages themselves, which keeps
//! flash writes down to the rows alone.

use std::path::Path;

use crate::error::Result;
use crate::record::RowId;

use super::{list_pages, PageFile};

/// In-memory high-water mark for row ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCursor {
    current: RowId,
}

impl RowCursor {
    /// Recover the cursor from a table directory.
    ///
    /// Walks pages from the highest range down and takes the `r` of the last
    /// non-blank line of the first page that has one; 0 when no page does.
    pub fn recover(dir: &Path) -> Result<Self> {
        for range in list_pages(dir)?.into_iter().rev() {
            let page = PageFile::new(dir, range);
            if let Some(record) = page.last_record()? {
                tracing::debug!(page = %range, current_row = record.row_id, "recovered row cursor");
                return Ok(Self {
                    current: record.row_id,
                });
            }
        }
        Ok(Self::default())
    }

    pub fn current(&self) -> RowId {
        self.current
    }

    /// Reserve the next `count` ids; returns the first of them
    pub fn advance(&mut self, count: u64) -> RowId {
        let first = self.current + 1;
        self.current += count;
        first
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}
