use std::env;
use std::path::{Path, PathBuf};

use crate::error::QueryBuilderError;
use crate::types::DatabaseMode;

use super::connection::Database;

/// Database name that opens a private in-memory database instead of a file.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Options for the single `SQLite` connection.
///
/// `data_dir` is where database files live; `<data_dir>/<name>.db` is opened for the
/// database selected by `mode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub data_dir: PathBuf,
    pub database: String,
    pub test_database: String,
    pub mode: DatabaseMode,
}

impl ConnectionOptions {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, database: impl Into<String>) -> Self {
        let database = database.into();
        Self {
            data_dir: data_dir.into(),
            test_database: database.clone(),
            database,
            mode: DatabaseMode::Production,
        }
    }

    /// Options for a throwaway in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(".", MEMORY_DATABASE)
    }

    /// Read `DB_HOST`, `DB_DATABASE`, `TEST_DB_DATABASE` and `TESTMODE` from the environment.
    ///
    /// `DB_HOST` defaults to the current directory; `TESTMODE=true` selects the test
    /// database.
    ///
    /// # Errors
    ///
    /// Returns `QueryBuilderError::ConfigError` when a database name is missing.
    pub fn from_env() -> Result<Self, QueryBuilderError> {
        let data_dir = env::var("DB_HOST").unwrap_or_else(|_| ".".to_string());
        let database = env::var("DB_DATABASE")
            .map_err(|_| QueryBuilderError::ConfigError("DB_DATABASE is not set".into()))?;
        let test_database = env::var("TEST_DB_DATABASE")
            .map_err(|_| QueryBuilderError::ConfigError("TEST_DB_DATABASE is not set".into()))?;
        let mode = match env::var("TESTMODE").as_deref() {
            Ok("true") => DatabaseMode::Test,
            _ => DatabaseMode::Production,
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            database,
            test_database,
            mode,
        })
    }

    /// Name of the database `connect` opens for the configured mode.
    #[must_use]
    pub fn selected_database(&self) -> &str {
        match self.mode {
            DatabaseMode::Test => &self.test_database,
            DatabaseMode::Production => &self.database,
        }
    }

    /// Location of a named database within `data_dir`.
    #[must_use]
    pub fn database_path(&self, name: &str) -> PathBuf {
        if name == MEMORY_DATABASE {
            return PathBuf::from(MEMORY_DATABASE);
        }
        let file = if Path::new(name).extension().is_some() {
            name.to_string()
        } else {
            format!("{name}.db")
        };
        self.data_dir.join(file)
    }

    pub(crate) fn validate(&self) -> Result<(), QueryBuilderError> {
        if self.selected_database().is_empty() {
            return Err(QueryBuilderError::ConfigError(format!(
                "no database name configured for {:?} mode",
                self.mode
            )));
        }
        if self.selected_database() != MEMORY_DATABASE && !self.data_dir.is_dir() {
            return Err(QueryBuilderError::ConfigError(format!(
                "data directory {} does not exist",
                self.data_dir.display()
            )));
        }
        Ok(())
    }
}

/// Fluent builder for `ConnectionOptions`.
#[derive(Debug, Clone)]
pub struct ConnectionOptionsBuilder {
    opts: ConnectionOptions,
}

impl ConnectionOptionsBuilder {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, database: impl Into<String>) -> Self {
        Self {
            opts: ConnectionOptions::new(data_dir, database),
        }
    }

    #[must_use]
    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.opts.data_dir = data_dir.into();
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.opts.database = database.into();
        self
    }

    #[must_use]
    pub fn test_database(mut self, test_database: impl Into<String>) -> Self {
        self.opts.test_database = test_database.into();
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: DatabaseMode) -> Self {
        self.opts.mode = mode;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectionOptions {
        self.opts
    }

    /// Build the options and open a connection with them.
    ///
    /// # Errors
    ///
    /// Returns `QueryBuilderError` if the options are invalid or the database cannot be opened.
    pub fn connect(self) -> Result<Database, QueryBuilderError> {
        let mut db = Database::new(self.finish());
        db.connect()?;
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selects_database() {
        let opts = ConnectionOptionsBuilder::new("/var/data", "app")
            .test_database("app_test")
            .mode(DatabaseMode::Test)
            .finish();
        assert_eq!(opts.selected_database(), "app_test");
        assert_eq!(
            opts.database_path(opts.selected_database()),
            PathBuf::from("/var/data/app_test.db")
        );
    }

    #[test]
    fn explicit_extension_is_kept() {
        let opts = ConnectionOptions::new("/tmp", "legacy.sqlite3");
        assert_eq!(
            opts.database_path("legacy.sqlite3"),
            PathBuf::from("/tmp/legacy.sqlite3")
        );
    }

    #[test]
    fn memory_database_ignores_data_dir() {
        let opts = ConnectionOptions::in_memory();
        assert_eq!(opts.database_path(MEMORY_DATABASE), PathBuf::from(":memory:"));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn missing_data_dir_is_config_error() {
        let opts = ConnectionOptions::new("/definitely/not/here", "app");
        assert!(matches!(
            opts.validate(),
            Err(QueryBuilderError::ConfigError(_))
        ));
    }
}
