//! Scrub: validate and normalize user-supplied rows against a schema
//!
//! - Column names are lower-cased
//! - Unknown columns are rejected
//! - Non-null values must match the declared type; `str` values must fit
//!   within `max_length` (counted in characters); floats must be finite
//! - Output columns follow schema declaration order

use crate::error::{Result, StoreError};
use crate::query::{Predicate, Term};
use crate::record::{Row, Value};

use super::{ColumnDef, Schema};

/// What to do with schema columns the caller did not supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingColumns {
    /// Set them to null (insert)
    FillNull,
    /// Leave them out (update, predicates)
    Leave,
}

/// Row data as supplied by a caller
#[derive(Debug, Clone, PartialEq)]
pub enum RowInput {
    /// Column -> value mapping
    Named(Row),
    /// Values zipped against schema column order
    Positional(Vec<Value>),
}

impl From<Row> for RowInput {
    fn from(row: Row) -> Self {
        RowInput::Named(row)
    }
}

impl From<Vec<Value>> for RowInput {
    fn from(values: Vec<Value>) -> Self {
        RowInput::Positional(values)
    }
}

impl Schema {
    /// Validate `input` and return a normalized row
    pub fn scrub(
        &self,
        table: &str,
        input: impl Into<RowInput>,
        missing: MissingColumns,
    ) -> Result<Row> {
        let named = match input.into() {
            RowInput::Named(row) => row,
            RowInput::Positional(values) => self.zip_positional(table, values)?,
        };

        let mut supplied = Row::new();
        for (column, value) in named {
            let column = column.to_lowercase();
            let definition = self.lookup(table, &column)?;
            check_value(definition, &value)?;
            supplied.insert(column, value);
        }

        let mut scrubbed = Row::new();
        for definition in self.columns() {
            match supplied.remove(&definition.name) {
                Some(value) => scrubbed.insert(definition.name.clone(), value),
                None if missing == MissingColumns::FillNull => {
                    scrubbed.insert(definition.name.clone(), Value::Null)
                }
                None => {}
            }
        }
        Ok(scrubbed)
    }

    /// Normalize a predicate's column names and type-check its values
    pub fn scrub_predicate(&self, table: &str, predicate: &Predicate) -> Result<Predicate> {
        let mut terms = Vec::with_capacity(predicate.terms().len());
        for term in predicate.terms() {
            let column = term.column.to_lowercase();
            let definition = self.lookup(table, &column)?;
            for value in &term.accepted {
                check_value(definition, value)?;
            }
            terms.push(Term {
                column,
                accepted: term.accepted.clone(),
            });
        }
        Ok(Predicate::from_terms(terms))
    }

    fn lookup(&self, table: &str, column: &str) -> Result<&ColumnDef> {
        self.get(column).ok_or_else(|| StoreError::UnknownColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
    }

    fn zip_positional(&self, table: &str, values: Vec<Value>) -> Result<Row> {
        if values.len() > self.len() {
            return Err(StoreError::UnknownColumn {
                table: table.to_string(),
                column: format!("#{}", self.len() + 1),
            });
        }
        Ok(self
            .column_names()
            .map(str::to_string)
            .zip(values)
            .collect())
    }
}

fn check_value(definition: &ColumnDef, value: &Value) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    if value.data_type() != Some(definition.data_type) {
        return Err(StoreError::TypeMismatch {
            column: definition.name.clone(),
            expected: definition.data_type.to_string(),
            actual: value.type_name().to_string(),
        });
    }
    // JSON has no NaN/inf; serde_json would store them as null
    if let Value::Float(f) = value {
        if !f.is_finite() {
            return Err(StoreError::TypeMismatch {
                column: definition.name.clone(),
                expected: definition.data_type.to_string(),
                actual: "non-finite float".to_string(),
            });
        }
    }
    if let (Value::Str(s), Some(max_length)) = (value, definition.max_length) {
        let length = s.chars().count();
        if length > max_length {
            return Err(StoreError::LengthExceeded {
                column: definition.name.clone(),
                max_length,
                actual: length,
            });
        }
    }
    Ok(())
}
