use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::QueryBuilderError;
use crate::types::RowValues;

/// Parameter class a value is bound as.
///
/// The single-letter tags are the ones reported by [`BindList::type_tags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindType {
    /// Text, also used for NULL
    Text,
    /// 64-bit float
    Double,
    /// 64-bit integer, also used for booleans
    Integer,
    /// Binary data
    Blob,
}

impl BindType {
    #[must_use]
    pub fn tag(self) -> char {
        match self {
            BindType::Text => 's',
            BindType::Double => 'd',
            BindType::Integer => 'i',
            BindType::Blob => 'b',
        }
    }
}

/// One registered parameter: its class and the normalized value.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub bind_type: BindType,
    pub value: RowValues,
}

/// Ordered parameters for one statement.
///
/// Order must match placeholder order in the compiled SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindList {
    bindings: Vec<Binding>,
}

impl BindList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value, classifying it and normalizing booleans to 1/0.
    pub fn add_binding(&mut self, value: RowValues) {
        let (bind_type, value) = match value {
            RowValues::Text(s) => (BindType::Text, RowValues::Text(s)),
            RowValues::Null => (BindType::Text, RowValues::Null),
            RowValues::Float(f) => (BindType::Double, RowValues::Float(f)),
            RowValues::Int(i) => (BindType::Integer, RowValues::Int(i)),
            RowValues::Bool(b) => (BindType::Integer, RowValues::Int(i64::from(b))),
            RowValues::Blob(bytes) => (BindType::Blob, RowValues::Blob(bytes)),
        };
        self.bindings.push(Binding { bind_type, value });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Concatenated type tags in bind order, e.g. `"sii"`.
    #[must_use]
    pub fn type_tags(&self) -> String {
        self.bindings.iter().map(|b| b.bind_type.tag()).collect()
    }

    /// Normalized values in bind order.
    #[must_use]
    pub fn values(&self) -> Vec<&RowValues> {
        self.bindings.iter().map(|b| &b.value).collect()
    }

    /// Bind every value positionally onto a prepared statement.
    ///
    /// A no-op for an empty list.
    ///
    /// # Errors
    ///
    /// Returns `QueryBuilderError::ParameterError` when the statement's placeholder count
    /// differs from the number of registered values, or a backend error if binding fails.
    pub fn bind_all(&self, stmt: &mut Statement<'_>) -> Result<(), QueryBuilderError> {
        if self.bindings.is_empty() {
            return Ok(());
        }

        let expected = stmt.parameter_count();
        if expected != self.bindings.len() {
            return Err(QueryBuilderError::ParameterError(format!(
                "statement expects {expected} parameters but {} were registered ({})",
                self.bindings.len(),
                self.type_tags()
            )));
        }

        for (idx, binding) in self.bindings.iter().enumerate() {
            stmt.raw_bind_parameter(idx + 1, row_value_to_sqlite_value(&binding.value))?;
        }
        Ok(())
    }
}

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Null => Value::Null,
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}
