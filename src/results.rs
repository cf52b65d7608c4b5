//! Materialized query results.

mod row;

pub use row::{Columns, Row};
