//! Equality predicates
//!
//! AND across columns, OR across the accepted values of one column.

use crate::record::{Row, Value};

/// One column's accepted values
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub column: String,
    pub accepted: Vec<Value>,
}

impl Term {
    fn matches(&self, row: &Row) -> bool {
        row.get(&self.column)
            .is_some_and(|value| self.accepted.contains(value))
    }
}

/// Multi-column equality filter
///
/// An empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    terms: Vec<Term>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `column == value`
    pub fn equals(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.any_of(column, [value])
    }

    /// Require `column` to equal one of `values`
    pub fn any_of<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.terms.push(Term {
            column: column.into(),
            accepted: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// A row matches when every term finds its column with an accepted value.
    /// A column missing from the row is a non-match.
    pub fn matches(&self, row: &Row) -> bool {
        self.terms.iter().all(|term| term.matches(row))
    }

    pub(crate) fn from_terms(terms: Vec<Term>) -> Self {
        Self { terms }
    }
}
