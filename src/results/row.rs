use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// Column names shared by every row of one result, plus a name → index lookup.
#[derive(Debug)]
pub struct Columns {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Columns {
    #[must_use]
    pub fn new(names: Vec<String>) -> Arc<Self> {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Arc::new(Self { names, index })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn position(&self, column_name: &str) -> Option<usize> {
        self.index.get(column_name).copied()
    }
}

/// A single record returned by a query, keyed by column name.
///
/// Values keep result-column order; lookups by name go through the shared
/// [`Columns`] index.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<Columns>,
    values: Vec<RowValues>,
}

impl Row {
    /// Create a row; `values` must line up with `columns`.
    #[must_use]
    pub fn new(columns: Arc<Columns>, values: Vec<RowValues>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.names()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.columns
            .position(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.columns
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Rows compare as field → value mappings; column order does not matter.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}
