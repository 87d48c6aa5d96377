//! Row Record codec
//!
//! One record per line, newline-terminated:
//!
//! ```text
//! {"r":17,"d":{"name":"bob","age":42}}\n
//! \n                                      <- deleted slot
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{Row, RowId};

/// A line consisting of only the terminator marks a deleted slot
pub const BLANK_LINE: &str = "\n";

/// A stored row: permanent id plus mutable column data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    #[serde(rename = "r")]
    pub row_id: RowId,

    #[serde(rename = "d")]
    pub data: Row,
}

impl RowRecord {
    pub fn new(row_id: RowId, data: Row) -> Self {
        Self { row_id, data }
    }

    /// Encode as a single newline-terminated line
    pub fn encode_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Decode one line (with or without its terminator)
    pub fn decode_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim_end_matches(['\n', '\r']))?)
    }
}

/// Whether a raw page line is a deleted slot
pub fn is_blank(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']).is_empty()
}
