use std::sync::Arc;

use rusqlite::types::Value;

use crate::error::QueryBuilderError;
use crate::results::{Columns, Row};
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row, unescaping text.
///
/// # Errors
///
/// Returns `QueryBuilderError` if the value cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, QueryBuilderError> {
    let value: Value = row.get(idx)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(strip_slashes(&s))),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

/// Drain a result cursor into rows, keeping result order.
///
/// # Errors
///
/// Returns `QueryBuilderError` if stepping the cursor or reading a column fails.
pub fn materialize(
    mut rows: rusqlite::Rows<'_>,
    columns: &Arc<Columns>,
) -> Result<Vec<Row>, QueryBuilderError> {
    let mut results = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            values.push(sqlite_extract_value(row, i)?);
        }
        results.push(Row::new(Arc::clone(columns), values));
    }
    Ok(results)
}

/// Remove backslash escaping from stored text.
///
/// A backslash escapes the character after it, `\0` becomes NUL and a trailing
/// lone backslash is dropped.
#[must_use]
pub fn strip_slashes(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some(escaped) => out.push(escaped),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_escaped_quotes() {
        assert_eq!(strip_slashes(r"O\'Reilly"), "O'Reilly");
        assert_eq!(strip_slashes(r#"say \"hi\""#), r#"say "hi""#);
    }

    #[test]
    fn double_backslash_becomes_single() {
        assert_eq!(strip_slashes(r"C:\\temp"), r"C:\temp");
    }

    #[test]
    fn trailing_backslash_is_dropped() {
        assert_eq!(strip_slashes(r"abc\"), "abc");
    }

    #[test]
    fn escaped_zero_is_nul() {
        assert_eq!(strip_slashes(r"a\0b"), "a\0b");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(strip_slashes("llamas are cool"), "llamas are cool");
    }
}
