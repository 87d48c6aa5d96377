//! Page file reader
//!
//! Line-at-a-time access to a page file. Only one line is held in memory at
//! a time, whatever the page size.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::record::{is_blank, RowId, RowRecord};

use super::PageRange;

/// Handle to one page file (which may not exist yet)
#[derive(Debug, Clone)]
pub struct PageFile {
    range: PageRange,
    path: PathBuf,
}

impl PageFile {
    /// The committed page for `range` inside a table directory
    pub fn new(dir: &Path, range: PageRange) -> Self {
        Self {
            range,
            path: range.path_in(dir),
        }
    }

    /// A page stored under a non-standard path (vacuum sources)
    pub fn at(path: PathBuf, range: PageRange) -> Self {
        Self { range, path }
    }

    pub fn range(&self) -> PageRange {
        self.range
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Every line in file order; blank (deleted) slots come back as `None`
    pub fn lines(&self) -> Result<PageLines> {
        let file = File::open(&self.path)?;
        Ok(PageLines {
            lines: BufReader::new(file).lines(),
        })
    }

    /// Find `row_id` by matching the stored `r` of each non-blank line.
    ///
    /// Returns the zero-based line index together with the record, or `None`
    /// if the page does not exist or does not hold the row.
    pub fn locate(&self, row_id: RowId) -> Result<Option<(usize, RowRecord)>> {
        if !self.exists() {
            return Ok(None);
        }
        for (index, line) in self.lines()?.enumerate() {
            if let Some(record) = line? {
                if record.row_id == row_id {
                    return Ok(Some((index, record)));
                }
            }
        }
        Ok(None)
    }

    /// Zero-based line index of `row_id`, if present
    pub fn line_for(&self, row_id: RowId) -> Result<Option<usize>> {
        Ok(self.locate(row_id)?.map(|(index, _)| index))
    }

    /// The record on the last non-blank line
    pub fn last_record(&self) -> Result<Option<RowRecord>> {
        let file = File::open(&self.path)?;
        let mut last_line: Option<String> = None;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if !is_blank(&line) {
                last_line = Some(line);
            }
        }
        last_line
            .map(|line| RowRecord::decode_line(&line))
            .transpose()
    }

    /// Number of non-blank lines
    pub fn live_rows(&self) -> Result<usize> {
        let mut count = 0;
        for line in self.lines()? {
            if line?.is_some() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Total number of lines, blank slots included
    pub fn line_count(&self) -> Result<usize> {
        let file = File::open(&self.path)?;
        let mut count = 0;
        for line in BufReader::new(file).lines() {
            line?;
            count += 1;
        }
        Ok(count)
    }
}

/// Iterator over the lines of a page file
pub struct PageLines {
    lines: Lines<BufReader<File>>,
}

impl Iterator for PageLines {
    type Item = Result<Option<RowRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };
        if is_blank(&line) {
            return Some(Ok(None));
        }
        Some(RowRecord::decode_line(&line).map(Some))
    }
}
