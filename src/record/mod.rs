//! Record Module
//!
//! The in-memory shape of stored rows and their on-disk line encoding.
//!
//! ## Responsibilities
//! - Tagged column values (`str`, `int`, `float`, `bool`, null)
//! - Ordered row data with merge semantics for updates
//! - Row Record line format `{"r": <row_id>, "d": {...}}`

mod codec;
mod row;
mod value;

pub use codec::{is_blank, RowRecord, BLANK_LINE};
pub use row::Row;
pub use value::{DataType, Value};

/// Row identifier, assigned from 1 upwards and never reused
pub type RowId = u64;
