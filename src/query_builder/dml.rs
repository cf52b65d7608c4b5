use crate::error::QueryBuilderError;
use crate::sqlite::executor;
use crate::types::{QueryKind, RowValues};

use super::{FieldMap, QueryBuilder, RawOutcome};

impl QueryBuilder<'_> {
    /// Insert one record and return its generated rowid.
    ///
    /// Returns `Ok(None)` when no row was inserted (or the table name is empty).
    ///
    /// # Errors
    /// Returns `QueryBuilderError::EmptyPayload` for an empty payload,
    /// `QueryBuilderError::PrepareFailed` for a broken statement, and
    /// `QueryBuilderError::MutationFailed` if execution or commit fails (after rollback).
    pub fn insert<K, I>(&mut self, table: &str, payload: I) -> Result<Option<i64>, QueryBuilderError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RowValues)>,
    {
        if table.is_empty() {
            return Ok(None);
        }
        let outcome = self.run_mutation(QueryKind::Insert, table, payload.into_iter().collect())?;
        Ok((outcome.affected > 0).then_some(outcome.last_insert_id))
    }

    /// Update matching rows with `payload`.
    ///
    /// Without predicates every row of the table is updated.
    ///
    /// # Errors
    /// Same conditions as [`QueryBuilder::insert`].
    pub fn update<K, I>(&mut self, table: &str, payload: I) -> Result<bool, QueryBuilderError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RowValues)>,
    {
        if table.is_empty() {
            return Ok(false);
        }
        let outcome = self.run_mutation(QueryKind::Update, table, payload.into_iter().collect())?;
        Ok(outcome.affected > 0)
    }

    /// Delete matching rows; `true` when at least one row went away.
    ///
    /// Without predicates every row of the table is deleted.
    ///
    /// # Errors
    /// Returns `QueryBuilderError::PrepareFailed` for a broken statement and
    /// `QueryBuilderError::MutationFailed` if execution or commit fails (after rollback).
    pub fn delete(&mut self, table: &str) -> Result<bool, QueryBuilderError> {
        if table.is_empty() {
            return Ok(false);
        }
        let outcome = self.run_mutation(QueryKind::Delete, table, FieldMap::new())?;
        Ok(outcome.affected > 0)
    }

    /// Run caller-written SQL. Accumulated predicates are discarded, not applied.
    ///
    /// No transaction is opened; the statement runs under `SQLite`'s auto-commit.
    ///
    /// # Errors
    /// Returns `QueryBuilderError::PrepareFailed` for a broken statement or a backend error
    /// if execution fails.
    pub fn raw_query(&mut self, sql: &str, want_results: bool) -> Result<RawOutcome, QueryBuilderError> {
        let mut pending = self.take_pending(QueryKind::Raw, "");
        pending.raw_sql = sql.to_owned();
        let rows = executor::execute_read(self.db.connection()?, &pending.compile())?;

        if want_results {
            Ok(RawOutcome::Rows(rows))
        } else {
            Ok(RawOutcome::Executed)
        }
    }

    fn run_mutation(
        &mut self,
        kind: QueryKind,
        table: &str,
        payload: FieldMap,
    ) -> Result<executor::MutationOutcome, QueryBuilderError> {
        let mut pending = self.take_pending(kind, table);
        pending.payload = payload;

        if kind != QueryKind::Delete && pending.payload.is_empty() {
            return Err(QueryBuilderError::EmptyPayload {
                operation: kind,
                table: table.to_owned(),
            });
        }

        executor::execute_mutation(self.db.connection()?, kind, &pending.compile())
    }
}
