//! Storage Module
//!
//! Paginated flat-file storage for one table directory.
//!
//! ## Responsibilities
//! - Map row ids to page files (pure arithmetic, no index)
//! - Append and copy-on-write rewrite of page files
//! - Discover committed pages on disk, sorted by numeric range
//! - Recover the row cursor on open
//! - Refuse to open a table with leftover transient files
//!
//! ## Table Directory Layout
//! ```text
//! {db}/{table}/
//!   ├── definition.json
//!   ├── data1_10.dat          rows 1..=10, one JSON record per line
//!   ├── data11_20.dat         rows 11..=20
//!   ├── data11_20.dat.temp    in-flight rewrite (must not survive a crash)
//!   └── data1_10.dat.vacu     in-flight vacuum source (same)
//! ```

mod addressing;
mod cursor;
mod page;
mod writer;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use addressing::{PageRange, PAGE_EXTENSION, PAGE_PREFIX};
pub use cursor::RowCursor;
pub use page::{PageFile, PageLines};
pub use writer::{Rewrite, Rewritten};

/// Suffix of a page being rewritten
pub const TEMP_SUFFIX: &str = ".temp";

/// Suffix of a page being replayed by vacuum
pub const VACUUM_SUFFIX: &str = ".vacu";

/// `page.dat` + `.temp` -> `page.dat.temp`
pub fn transient_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Committed page files in a table directory, ascending by range
pub fn list_pages(dir: &Path) -> Result<Vec<PageRange>> {
    list_with(dir, PageRange::parse)
}

/// Vacuum source pages (`*.dat.vacu`), ascending by original range
pub fn list_vacuum_sources(dir: &Path) -> Result<Vec<PageRange>> {
    list_with(dir, |name| {
        name.strip_suffix(VACUUM_SUFFIX).and_then(PageRange::parse)
    })
}

/// Name of the first leftover `.temp` or `.vacu` file, if any
pub fn find_transient(dir: &Path) -> Result<Option<String>> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(TEMP_SUFFIX) || name.ends_with(VACUUM_SUFFIX) {
            return Ok(Some(name));
        }
    }
    Ok(None)
}

fn list_with(dir: &Path, parse: impl Fn(&str) -> Option<PageRange>) -> Result<Vec<PageRange>> {
    let mut ranges = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(range) = parse(&entry.file_name().to_string_lossy()) {
            ranges.push(range);
        }
    }

    ranges.sort();
    Ok(ranges)
}
