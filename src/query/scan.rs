//! Table scan
//!
//! Lazy, single-pass walk over every live row of a table. Holds at most one
//! open page and one decoded record at a time.

use std::path::Path;

use crate::error::{Result, StoreError};
use crate::record::RowRecord;
use crate::storage::{list_pages, PageFile, PageLines, PageRange};

use super::Predicate;

/// Page visiting order. Lines within a page are always read top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// Lowest range first (insertion order)
    Ascending,
    /// Highest range first (most recent rows first)
    Descending,
}

/// Iterator over the records matching a predicate
pub struct TableScan<'a> {
    dir: &'a Path,
    pages: std::vec::IntoIter<PageRange>,
    current: Option<PageLines>,
    predicate: Predicate,
    finished: bool,
}

impl<'a> TableScan<'a> {
    /// Snapshot the page list of `dir` and prepare to walk it
    pub fn new(dir: &'a Path, order: ScanOrder, predicate: Predicate) -> Result<Self> {
        let mut pages = list_pages(dir)?;
        if order == ScanOrder::Descending {
            pages.reverse();
        }
        Ok(Self {
            dir,
            pages: pages.into_iter(),
            current: None,
            predicate,
            finished: false,
        })
    }

    fn fail(&mut self, error: StoreError) -> Option<Result<RowRecord>> {
        self.finished = true;
        self.current = None;
        Some(Err(error))
    }
}

impl Iterator for TableScan<'_> {
    type Item = Result<RowRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let Some(lines) = self.current.as_mut() else {
                let Some(range) = self.pages.next() else {
                    self.finished = true;
                    return None;
                };
                match PageFile::new(self.dir, range).lines() {
                    Ok(lines) => self.current = Some(lines),
                    Err(e) => return self.fail(e),
                }
                continue;
            };

            match lines.next() {
                Some(Ok(Some(record))) => {
                    if self.predicate.matches(&record.data) {
                        return Some(Ok(record));
                    }
                }
                Some(Ok(None)) => {}
                Some(Err(e)) => return self.fail(e),
                None => self.current = None,
            }
        }
    }
}
