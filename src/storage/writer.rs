//! Page file writer
//!
//! ## Write Paths
//! - `append`: one record appended to the page (single-row insert)
//! - `append_batch`: many records in a single append, then re-read and
//!   compared byte-for-byte against what was meant to land
//! - `rewrite`: copy-on-write for update/delete
//!
//! ## Rewrite Ordering
//! ```text
//! page.dat ──copy line by line──▶ page.dat.temp   (target line substituted)
//!                                      │
//!                                 sync + verify
//!                                      │
//! remove page.dat ◀────────────────────┘
//! rename page.dat.temp ─▶ page.dat                 (commit point)
//! ```
//! Until the rename the original page is untouched. A crash in between
//! leaves a `.temp` sibling that blocks the next table open.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use crate::error::{Result, StoreError};
use crate::record::{is_blank, Row, RowId, RowRecord, BLANK_LINE};

use super::{transient_path, PageFile, TEMP_SUFFIX};

/// Change applied to one row by `rewrite`
#[derive(Debug, Clone)]
pub enum Rewrite {
    /// Merge these columns into the stored data
    Update(Row),
    /// Blank the row's line, keeping its slot
    Delete,
}

/// Outcome of a successful rewrite
#[derive(Debug, Clone, PartialEq)]
pub enum Rewritten {
    /// The row's data after the merge
    Updated(Row),
    Deleted,
}

impl PageFile {
    /// Append one record, creating the page if needed
    pub fn append(&self, record: &RowRecord) -> Result<()> {
        let line = record.encode_line()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        tracing::debug!(page = %self.range(), row_id = record.row_id, "appended row");
        Ok(())
    }

    /// Append several records with one write and verify them on disk
    pub fn append_batch(&self, records: &[RowRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for record in records {
            buffer.push_str(&record.encode_line()?);
        }

        // Everything past this offset must be exactly `buffer`
        let start_offset = match fs::metadata(self.path()) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.path())?;
            file.write_all(buffer.as_bytes())?;
            file.sync_all()?;
        }

        self.verify_tail(start_offset, buffer.as_bytes())?;

        tracing::debug!(
            page = %self.range(),
            first_row = records[0].row_id,
            count = records.len(),
            "appended row batch"
        );
        Ok(())
    }

    /// Replace or blank the line holding `row_id` via a temp copy and rename
    pub fn rewrite(&self, table: &str, row_id: RowId, change: Rewrite) -> Result<Rewritten> {
        if !self.exists() {
            return Err(StoreError::RowNotFound {
                table: table.to_string(),
                row_id,
            });
        }

        let temp_path = transient_path(self.path(), TEMP_SUFFIX);
        let temp = PageFile::at(temp_path.clone(), self.range());

        let copied = self.copy_with_change(&temp, row_id, &change);
        let (target_line, line_count, outcome) = match copied {
            Ok(Some(copied)) => copied,
            Ok(None) => {
                let _ = fs::remove_file(&temp_path);
                return Err(StoreError::RowNotFound {
                    table: table.to_string(),
                    row_id,
                });
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        if let Err(e) = temp.verify_rewrite(row_id, target_line, line_count, &outcome) {
            tracing::warn!(page = %self.range(), row_id, error = %e, "rewrite verification failed");
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::remove_file(self.path())?;
        fs::rename(&temp_path, self.path())?;

        tracing::debug!(page = %self.range(), row_id, line = target_line, "rewrote page");
        Ok(outcome)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Copy every line into `temp`, substituting the target.
    /// Returns `(target_line, line_count, outcome)`, or `None` if the row is absent.
    fn copy_with_change(
        &self,
        temp: &PageFile,
        row_id: RowId,
        change: &Rewrite,
    ) -> Result<Option<(usize, usize, Rewritten)>> {
        let input = BufReader::new(File::open(self.path())?);
        let mut output = BufWriter::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(temp.path())?,
        );

        let mut found: Option<(usize, Rewritten)> = None;
        let mut line_count = 0;

        for (index, line) in input.lines().enumerate() {
            let line = line?;
            line_count += 1;

            if is_blank(&line) {
                output.write_all(BLANK_LINE.as_bytes())?;
                continue;
            }

            let mut record = RowRecord::decode_line(&line)?;
            if found.is_some() || record.row_id != row_id {
                output.write_all(line.as_bytes())?;
                output.write_all(BLANK_LINE.as_bytes())?;
                continue;
            }

            match change {
                Rewrite::Delete => {
                    output.write_all(BLANK_LINE.as_bytes())?;
                    found = Some((index, Rewritten::Deleted));
                }
                Rewrite::Update(changes) => {
                    record.data.merge(changes);
                    output.write_all(record.encode_line()?.as_bytes())?;
                    found = Some((index, Rewritten::Updated(record.data)));
                }
            }
        }

        output.flush()?;
        let file = output.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        Ok(found.map(|(index, outcome)| (index, line_count, outcome)))
    }

    /// Check a freshly written temp page reflects the intended change
    fn verify_rewrite(
        &self,
        row_id: RowId,
        target_line: usize,
        expected_lines: usize,
        outcome: &Rewritten,
    ) -> Result<()> {
        let fail = |reason: String| StoreError::WriteVerification {
            page: self.path().to_path_buf(),
            reason,
        };

        let line_count = self.line_count()?;
        if line_count != expected_lines {
            return Err(fail(format!(
                "expected {} lines, found {}",
                expected_lines, line_count
            )));
        }

        match (outcome, self.locate(row_id)?) {
            (Rewritten::Deleted, None) => Ok(()),
            (Rewritten::Deleted, Some((line, _))) => Err(fail(format!(
                "row {} still present at line {}",
                row_id, line
            ))),
            (Rewritten::Updated(expected), Some((line, record)))
                if line == target_line && record.data == *expected =>
            {
                Ok(())
            }
            (Rewritten::Updated(_), Some((line, _))) => Err(fail(format!(
                "row {} at line {} does not hold the updated data",
                row_id, line
            ))),
            (Rewritten::Updated(_), None) => {
                Err(fail(format!("row {} missing after update", row_id)))
            }
        }
    }

    /// Compare the bytes after `offset` against `expected`
    pub fn verify_tail(&self, offset: u64, expected: &[u8]) -> Result<()> {
        let mut file = File::open(self.path())?;
        file.seek(SeekFrom::Start(offset))?;
        let mut written = Vec::with_capacity(expected.len());
        file.read_to_end(&mut written)?;

        if written != expected {
            tracing::warn!(
                page = %self.range(),
                expected = expected.len(),
                found = written.len(),
                "batch append verification failed"
            );
            return Err(StoreError::WriteVerification {
                page: self.path().to_path_buf(),
                reason: format!(
                    "appended bytes differ from the batch ({} expected, {} on disk)",
                    expected.len(),
                    written.len()
                ),
            });
        }
        Ok(())
    }
}
