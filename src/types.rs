use std::fmt;

use clap::ValueEnum;
use serde_json::Value as JsonValue;

/// Values that can be bound as query parameters or read back from a row.
///
/// The set is closed on purpose: the binder maps each variant to a backend
/// parameter class, so there is no "unsupported type" at runtime.
/// ```rust
/// use sql_query_builder::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value, stored by the backend as 1/0
    Bool(bool),
    /// NULL value
    Null,
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<u32> for RowValues {
    fn from(value: u32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_owned())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Scalars map one-to-one; arrays and objects are stored as their JSON text.
impl From<&JsonValue> for RowValues {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => RowValues::Null,
            JsonValue::Bool(b) => RowValues::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => RowValues::Int(i),
                None => n.as_f64().map_or(RowValues::Null, RowValues::Float),
            },
            JsonValue::String(s) => RowValues::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => RowValues::Text(value.to_string()),
        }
    }
}

/// The kind of statement a builder call compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    Raw,
}

impl QueryKind {
    /// INSERT, UPDATE and DELETE run inside an explicit transaction.
    #[must_use]
    pub fn is_mutation(self) -> bool {
        matches!(self, QueryKind::Insert | QueryKind::Update | QueryKind::Delete)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKind::Select => "select",
            QueryKind::Insert => "insert",
            QueryKind::Update => "update",
            QueryKind::Delete => "delete",
            QueryKind::Raw => "query",
        };
        f.write_str(name)
    }
}

/// Which configured database a connection opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum DatabaseMode {
    /// The test database (`TEST_DB_DATABASE`)
    Test,
    /// The production database (`DB_DATABASE`)
    #[default]
    Production,
}

/// Row cap appended as `LIMIT n` to SELECT-shaped calls.
///
/// Text converts with integer coercion: optional leading whitespace and sign,
/// then digits; anything else yields 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLimit(pub i64);

impl From<i64> for RowLimit {
    fn from(value: i64) -> Self {
        RowLimit(value)
    }
}

impl From<i32> for RowLimit {
    fn from(value: i32) -> Self {
        RowLimit(i64::from(value))
    }
}

impl From<u32> for RowLimit {
    fn from(value: u32) -> Self {
        RowLimit(i64::from(value))
    }
}

impl From<usize> for RowLimit {
    fn from(value: usize) -> Self {
        RowLimit(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for RowLimit {
    fn from(value: &str) -> Self {
        RowLimit(coerce_integer(value))
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn coerce_integer(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative { -value } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_limit_coerces_text() {
        assert_eq!(RowLimit::from("10"), RowLimit(10));
        assert_eq!(RowLimit::from("  7 rows"), RowLimit(7));
        assert_eq!(RowLimit::from("-3"), RowLimit(-3));
        assert_eq!(RowLimit::from("ten"), RowLimit(0));
        assert_eq!(RowLimit::from(""), RowLimit(0));
    }

    #[test]
    fn json_scalars_convert_directly() {
        assert_eq!(RowValues::from(&serde_json::json!(123)), RowValues::Int(123));
        assert_eq!(RowValues::from(&serde_json::json!(1.5)), RowValues::Float(1.5));
        assert_eq!(RowValues::from(&serde_json::json!(null)), RowValues::Null);
        assert_eq!(
            RowValues::from(&serde_json::json!({"a": 1})),
            RowValues::Text(r#"{"a":1}"#.into())
        );
    }

    #[test]
    fn optional_values_map_none_to_null() {
        assert_eq!(RowValues::from(None::<i64>), RowValues::Null);
        assert_eq!(RowValues::from(Some("x")), RowValues::Text("x".into()));
    }
}
