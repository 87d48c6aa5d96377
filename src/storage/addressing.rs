//! Page addressing
//!
//! Pure arithmetic from a row id to the page file that owns its slot.
//! Never touches disk.
//!
//! With `rows_per_page = 10`:
//! ```text
//! row 1..=10   -> data1_10.dat
//! row 11..=20  -> data11_20.dat
//! row 610      -> data601_610.dat
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::record::RowId;

/// Prefix shared by every page file name
pub const PAGE_PREFIX: &str = "data";

/// Extension of a committed page file
pub const PAGE_EXTENSION: &str = "dat";

/// Closed range `[first, last]` of row-id slots held by one page file
///
/// Ordering is numeric on `(first, last)`, never lexical on the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageRange {
    pub first: RowId,
    pub last: RowId,
}

impl PageRange {
    /// The page owning `row_id`, or `None` for row 0 (empty table)
    pub fn for_row(row_id: RowId, rows_per_page: u64) -> Option<Self> {
        if row_id == 0 || rows_per_page == 0 {
            return None;
        }
        let (first, last) = if row_id % rows_per_page == 0 {
            let last = (row_id / rows_per_page) * rows_per_page;
            (last - rows_per_page + 1, last)
        } else {
            let first = (row_id / rows_per_page) * rows_per_page + 1;
            (first, first + rows_per_page - 1)
        };
        Some(Self { first, last })
    }

    pub fn contains(&self, row_id: RowId) -> bool {
        (self.first..=self.last).contains(&row_id)
    }

    /// Slots in this page
    pub fn capacity(&self) -> u64 {
        self.last - self.first + 1
    }

    /// `data<first>_<last>.dat`
    pub fn file_name(&self) -> String {
        format!("{}{}_{}.{}", PAGE_PREFIX, self.first, self.last, PAGE_EXTENSION)
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }

    /// Parse a committed page file name
    /// "data11_20.dat" -> Some(11..=20); transient siblings -> None
    pub fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name
            .strip_prefix(PAGE_PREFIX)?
            .strip_suffix(PAGE_EXTENSION)?
            .strip_suffix('.')?;
        let (first, last) = stem.split_once('_')?;
        let range = Self {
            first: first.parse().ok()?,
            last: last.parse().ok()?,
        };
        (range.first >= 1 && range.first <= range.last).then_some(range)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}
