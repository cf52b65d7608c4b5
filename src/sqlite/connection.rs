use std::fmt;

use rusqlite::Connection;

use crate::error::QueryBuilderError;
use crate::query_builder::QueryBuilder;

use super::config::{ConnectionOptions, ConnectionOptionsBuilder, MEMORY_DATABASE};

/// Owner of the one live `SQLite` connection.
///
/// Builders borrow it mutably, so at most one call sequence runs against the
/// connection at a time. Mutations are not left to implicit auto-commit: the
/// executor wraps each one in `BEGIN`/`COMMIT` (or `ROLLBACK`).
pub struct Database {
    options: ConnectionOptions,
    conn: Option<Connection>,
    active_database: Option<String>,
}

impl Database {
    /// Create an unconnected manager; call [`Database::connect`] before querying.
    #[must_use]
    pub fn new(options: ConnectionOptions) -> Self {
        Self {
            options,
            conn: None,
            active_database: None,
        }
    }

    #[must_use]
    pub fn builder(
        data_dir: impl Into<std::path::PathBuf>,
        database: impl Into<String>,
    ) -> ConnectionOptionsBuilder {
        ConnectionOptionsBuilder::new(data_dir, database)
    }

    /// Open a private in-memory database, already connected.
    ///
    /// # Errors
    /// Returns `QueryBuilderError::ConnectionError` if `SQLite` cannot open the database.
    pub fn open_in_memory() -> Result<Self, QueryBuilderError> {
        let mut db = Self::new(ConnectionOptions::in_memory());
        db.connect()?;
        Ok(db)
    }

    /// (Re)connect to the database selected by the configured mode.
    ///
    /// Any existing connection is closed first.
    ///
    /// # Errors
    /// Returns `QueryBuilderError::ConfigError` for invalid options and
    /// `QueryBuilderError::ConnectionError` if the database cannot be opened.
    pub fn connect(&mut self) -> Result<(), QueryBuilderError> {
        self.disconnect()?;
        self.options.validate()?;
        let name = self.options.selected_database().to_owned();
        self.open(&name)
    }

    /// Close the connection. Safe to call when already disconnected.
    ///
    /// # Errors
    /// Returns `QueryBuilderError::ConnectionError` if `SQLite` refuses to close the handle.
    pub fn disconnect(&mut self) -> Result<(), QueryBuilderError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        let name = self.active_database.take().unwrap_or_default();
        conn.close().map_err(|(_, e)| {
            QueryBuilderError::ConnectionError(format!("failed to close database {name}: {e}"))
        })?;
        tracing::info!(database = %name, "disconnected");
        Ok(())
    }

    /// Point the live connection at another database in the same data directory.
    ///
    /// Does nothing when no connection is open. The new database is opened before the
    /// current one is released, so a failed switch leaves the existing connection in
    /// place.
    ///
    /// # Errors
    /// Returns `QueryBuilderError::ConnectionError` if the new database cannot be
    /// opened or the previous connection cannot be closed.
    pub fn switch_database(&mut self, name: &str) -> Result<(), QueryBuilderError> {
        if self.conn.is_none() {
            return Ok(());
        }
        let conn = self.open_connection(name)?;
        let previous = self.active_database.replace(name.to_owned()).unwrap_or_default();
        if let Some(old) = self.conn.replace(conn) {
            old.close().map_err(|(_, e)| {
                QueryBuilderError::ConnectionError(format!(
                    "failed to close database {previous}: {e}"
                ))
            })?;
        }
        tracing::info!(from = %previous, database = %name, "switched database");
        Ok(())
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Name of the database the live connection points at.
    #[must_use]
    pub fn active_database(&self) -> Option<&str> {
        self.active_database.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> &ConnectionOptions {
        &self.options
    }

    /// Start a query builder against this connection.
    pub fn query(&mut self) -> QueryBuilder<'_> {
        QueryBuilder::new(self)
    }

    /// Execute a batch of statements (schema setup and the like) in one transaction.
    ///
    /// # Errors
    /// Returns `QueryBuilderError` if not connected or any statement fails; the batch is
    /// rolled back in that case.
    pub fn execute_batch(&self, sql: &str) -> Result<(), QueryBuilderError> {
        let conn = self.connection()?;
        if !conn.is_autocommit() {
            return conn.execute_batch(sql).map_err(QueryBuilderError::SqliteError);
        }
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.commit().map_err(QueryBuilderError::SqliteError)
    }

    pub(crate) fn connection(&self) -> Result<&Connection, QueryBuilderError> {
        self.conn
            .as_ref()
            .ok_or_else(|| QueryBuilderError::ConnectionError("database is not connected".into()))
    }

    fn open(&mut self, name: &str) -> Result<(), QueryBuilderError> {
        let conn = self.open_connection(name)?;
        self.conn = Some(conn);
        self.active_database = Some(name.to_owned());
        Ok(())
    }

    fn open_connection(&self, name: &str) -> Result<Connection, QueryBuilderError> {
        let path = self.options.database_path(name);
        let opened = if name == MEMORY_DATABASE {
            Connection::open_in_memory()
        } else {
            Connection::open(&path)
        };
        let conn = opened.map_err(|e| {
            QueryBuilderError::ConnectionError(format!(
                "failed to open database {}: {e}",
                path.display()
            ))
        })?;

        // Constraint violations must surface as errors.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        tracing::info!(database = %name, path = %path.display(), "connected");
        Ok(conn)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("options", &self.options)
            .field("connected", &self.conn.is_some())
            .field("active_database", &self.active_database)
            .finish()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Err(e) = self.disconnect() {
            tracing::warn!(error = %e, "disconnect on drop failed");
        }
    }
}
