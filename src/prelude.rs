//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types so a single
//! `use sql_query_builder::prelude::*;` is enough to build and run queries.

pub use crate::error::{FixtureError, QueryBuilderError};
pub use crate::fixtures::{FixtureFormat, FixtureLoader, FixtureParser, JsonParser, XmlParser};
pub use crate::query_builder::{CompiledQuery, FieldMap, PendingQuery, QueryBuilder, RawOutcome};
pub use crate::results::Row;
pub use crate::sqlite::{BindList, BindType, ConnectionOptions, ConnectionOptionsBuilder, Database};
pub use crate::types::{DatabaseMode, QueryKind, RowLimit, RowValues};
