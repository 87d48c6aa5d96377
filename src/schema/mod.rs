//! Schema Module
//!
//! Column definitions for a table and the definition file that stores them.
//!
//! ## Definition File (`{table}/definition.json`)
//! ```text
//! {
//!   "settings": {"rows_per_page": 10, "max_rows": 10000},
//!   "columns": {
//!     "name":  {"data_type": "str", "max_length": 10000},
//!     "age":   {"data_type": "int"}
//!   }
//! }
//! ```
//!
//! Column order in the file is declaration order and drives positional
//! inserts, so it is preserved on both read and write.

mod scrub;

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::config::{TableSettings, DEFAULT_MAX_LENGTH};
use crate::error::{Result, StoreError};
use crate::record::DataType;

pub use scrub::{MissingColumns, RowInput};

/// Name of the per-table definition file
pub const DEFINITION_FILE: &str = "definition.json";

/// A single column declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    /// Only meaningful for `str` columns
    pub max_length: Option<usize>,
}

impl ColumnDef {
    pub fn str(name: impl Into<String>, max_length: usize) -> Self {
        Self::new(name, DataType::Str, Some(max_length))
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Int, None)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Float, None)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Bool, None)
    }

    fn new(name: impl Into<String>, data_type: DataType, max_length: Option<usize>) -> Self {
        let max_length = match data_type {
            DataType::Str => Some(max_length.unwrap_or(DEFAULT_MAX_LENGTH)),
            _ => None,
        };
        Self {
            name: name.into().to_lowercase(),
            data_type,
            max_length,
        }
    }
}

/// Ordered set of column declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// All-`str` schema with the default max length
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: names
                .into_iter()
                .map(|name| ColumnDef::str(name, DEFAULT_MAX_LENGTH))
                .collect(),
        }
    }

    /// Builder-style column append
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Reject empty schemas and duplicate column names
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(StoreError::Config(
                "A table needs at least one column".to_string(),
            ));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(StoreError::Config("Column names must not be empty".to_string()));
            }
            if self.columns[..i].iter().any(|other| other.name == column.name) {
                return Err(StoreError::Config(format!(
                    "Duplicate column '{}'",
                    column.name
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Serialization (ordered JSON object)
// =============================================================================

#[derive(Serialize, Deserialize)]
struct ColumnSpec {
    data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<usize>,
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            let spec = ColumnSpec {
                data_type: column.data_type,
                max_length: column.max_length,
            };
            map.serialize_entry(&column.name, &spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(SchemaVisitor)
    }
}

struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = Schema;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of column names to column definitions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Schema, A::Error> {
        let mut schema = Schema::new();
        while let Some((name, spec)) = access.next_entry::<String, ColumnSpec>()? {
            let column = ColumnDef::new(name, spec.data_type, spec.max_length);
            if schema.get(&column.name).is_some() {
                return Err(de::Error::custom(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
            schema.columns.push(column);
        }
        Ok(schema)
    }
}

// =============================================================================
// Definition File
// =============================================================================

/// Contents of a table's definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub settings: TableSettings,
    pub columns: Schema,
}

impl TableDefinition {
    /// Read the definition file from a table directory
    pub fn load(table_dir: &Path) -> Result<Self> {
        let contents = fs::read_to_string(table_dir.join(DEFINITION_FILE))?;
        let definition: TableDefinition = serde_json::from_str(&contents)?;
        definition.settings.validate()?;
        Ok(definition)
    }

    /// Write the definition file into a table directory
    pub fn save(&self, table_dir: &Path) -> Result<()> {
        let contents = serde_json::to_string(self)?;
        fs::write(table_dir.join(DEFINITION_FILE), contents)?;
        Ok(())
    }
}
