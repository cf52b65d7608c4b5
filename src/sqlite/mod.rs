// SQLite module - the single backend behind the query builder
//
// - config: connection options and their builder
// - connection: the connection manager (connect/disconnect/switch)
// - params: parameter binding
// - query: result materialization
// - executor: prepare, execute, commit/rollback

pub mod config;
pub mod connection;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{ConnectionOptions, ConnectionOptionsBuilder, MEMORY_DATABASE};
pub use connection::Database;
pub use executor::MutationOutcome;
pub use params::{BindList, BindType, Binding};
pub use query::strip_slashes;
