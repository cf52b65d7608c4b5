//! Fixture seeder.
//!
//! Loads fixture files for the named tables and inserts every record through the
//! query builder.
//!
//! Usage:
//! ```bash
//! # Seed the test database from ./fixtures/*.json (names from DB_DATABASE/TEST_DB_DATABASE)
//! cargo run --bin seed-fixtures -- --fixtures ./fixtures users orders
//!
//! # XML fixtures, clearing the tables first
//! cargo run --bin seed-fixtures -- --fixtures ./fixtures --format xml --truncate users
//! ```

use std::path::PathBuf;

use clap::Parser;
use serde_json::{Map, Value};
use sql_query_builder::prelude::*;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "seed-fixtures",
    about = "Insert fixture records into a SQLite database"
)]
struct SeedArgs {
    /// Directory holding `<table>.<format>` fixture files
    #[arg(long)]
    fixtures: PathBuf,

    /// Fixture file format
    #[arg(long, value_enum, default_value_t = FixtureFormat::Json)]
    format: FixtureFormat,

    /// Directory holding the database files
    #[arg(long, env = "DB_HOST", default_value = ".")]
    data_dir: PathBuf,

    /// Production database name
    #[arg(long, env = "DB_DATABASE")]
    database: String,

    /// Test database name
    #[arg(long, env = "TEST_DB_DATABASE")]
    test_database: String,

    /// Which database to seed
    #[arg(long, value_enum, default_value_t = DatabaseMode::Test)]
    mode: DatabaseMode,

    /// Delete existing rows from each table before inserting
    #[arg(long)]
    truncate: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Tables to seed; each needs a matching fixture file
    #[arg(required = true)]
    tables: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let mut loader = FixtureLoader::for_format(&args.fixtures, args.format)?;
    let mut db = Database::builder(&args.data_dir, args.database.as_str())
        .test_database(args.test_database.as_str())
        .mode(args.mode)
        .connect()?;

    for table in &args.tables {
        let fixtures = loader.get_all(table)?;
        let records = records_of(fixtures);
        if records.is_empty() {
            warn!(table = %table, "fixture holds no records");
            continue;
        }

        let mut query = db.query();
        if args.truncate {
            query.delete(table)?;
        }

        let mut inserted = 0usize;
        for record in records {
            let payload = record
                .iter()
                .map(|(field, value)| (field.as_str(), RowValues::from(value)));
            if query.insert(table, payload)?.is_some() {
                inserted += 1;
            }
        }
        info!(table = %table, inserted, "seeded");
    }

    db.disconnect()?;
    Ok(())
}

/// Flatten a fixture document into its records.
///
/// An array yields its object elements. An object with any scalar member is itself a
/// record; otherwise its members are flattened (the shape XML fixtures take, e.g.
/// `{"record": [...]}`).
fn records_of(fixtures: &Value) -> Vec<&Map<String, Value>> {
    match fixtures {
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        Value::Object(map) if map.values().any(|v| !v.is_array() && !v.is_object()) => {
            vec![map]
        }
        Value::Object(map) => map.values().flat_map(records_of).collect(),
        _ => Vec::new(),
    }
}
