use crate::error::QueryBuilderError;
use crate::results::Row;
use crate::sqlite::executor;
use crate::types::QueryKind;

use super::QueryBuilder;

impl QueryBuilder<'_> {
    /// Fetch rows from `table`, honouring accumulated predicates, fields and limit.
    ///
    /// An empty table name is a no-op returning no rows.
    ///
    /// # Errors
    /// Returns `QueryBuilderError` if the database is not connected, the statement cannot
    /// be prepared, or execution fails.
    pub fn get(&mut self, table: &str) -> Result<Vec<Row>, QueryBuilderError> {
        if table.is_empty() {
            return Ok(Vec::new());
        }
        let compiled = self.take_pending(QueryKind::Select, table).compile();
        executor::execute_read(self.db.connection()?, &compiled)
    }

    /// Count the rows `get` would return, without returning them.
    ///
    /// Read-only: never commits or rolls back.
    ///
    /// # Errors
    /// Same conditions as [`QueryBuilder::get`].
    pub fn num_rows(&mut self, table: &str) -> Result<usize, QueryBuilderError> {
        if table.is_empty() {
            return Ok(0);
        }
        let compiled = self.take_pending(QueryKind::Select, table).compile();
        let rows = executor::execute_read(self.db.connection()?, &compiled)?;
        Ok(rows.len())
    }
}
