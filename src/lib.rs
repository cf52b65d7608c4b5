//! A small query builder over a single `SQLite` connection.
//!
//! Predicates, field lists and mutation payloads accumulate on a [`QueryBuilder`], are
//! compiled into one parameterized statement, bound, executed and returned as
//! [`Row`]s. A [`FixtureLoader`] for JSON/XML test data sits alongside.
//!
//! ```rust
//! use sql_query_builder::prelude::*;
//!
//! # fn demo() -> Result<(), QueryBuilderError> {
//! let mut db = Database::open_in_memory()?;
//! db.execute_batch("CREATE TABLE flags (id INTEGER PRIMARY KEY, name TEXT, active INTEGER)")?;
//!
//! let mut query = db.query();
//! query.insert("flags", [("name", RowValues::from("beta")), ("active", RowValues::from(true))])?;
//!
//! query.where_eq("active", true);
//! assert_eq!(query.num_rows("flags")?, 1);
//!
//! // predicates do not carry over to the next call
//! assert_eq!(query.get("flags")?.len(), 1);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

pub mod error;
pub mod fixtures;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod sqlite;
pub mod types;

pub use error::{FixtureError, QueryBuilderError};
pub use fixtures::{FixtureFormat, FixtureLoader, FixtureParser};
pub use query_builder::{CompiledQuery, FieldMap, PendingQuery, QueryBuilder, RawOutcome};
pub use results::Row;
pub use sqlite::{ConnectionOptions, ConnectionOptionsBuilder, Database};
pub use types::{DatabaseMode, QueryKind, RowLimit, RowValues};
