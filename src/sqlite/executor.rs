use rusqlite::{Connection, Statement};

use crate::error::QueryBuilderError;
use crate::query_builder::CompiledQuery;
use crate::results::{Columns, Row};
use crate::types::QueryKind;

use super::query::materialize;

/// Result of a committed INSERT/UPDATE/DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    pub affected: u64,
    pub last_insert_id: i64,
}

/// Prepare SQL text against the connection.
///
/// A failure here means the statement itself is broken; the error carries the full
/// SQL text and the backend message.
///
/// # Errors
/// Returns `QueryBuilderError::PrepareFailed`.
pub fn prepare<'c>(conn: &'c Connection, sql: &str) -> Result<Statement<'c>, QueryBuilderError> {
    conn.prepare(sql).map_err(|e| {
        tracing::error!(sql, error = %e, "query could not be prepared");
        QueryBuilderError::PrepareFailed {
            sql: sql.to_owned(),
            message: e.to_string(),
        }
    })
}

/// Prepare a compiled query and bind its parameters.
///
/// # Errors
/// Returns `QueryBuilderError::PrepareFailed` or `QueryBuilderError::ParameterError`.
pub fn prepare_bound<'c>(
    conn: &'c Connection,
    compiled: &CompiledQuery,
) -> Result<Statement<'c>, QueryBuilderError> {
    let mut stmt = prepare(conn, &compiled.sql)?;
    compiled.binds.bind_all(&mut stmt)?;
    tracing::debug!(
        sql = %compiled.sql,
        types = %compiled.binds.type_tags(),
        "statement prepared"
    );
    Ok(stmt)
}

/// Step a bound statement to completion, materializing every row it yields.
///
/// # Errors
/// Returns `QueryBuilderError` if execution or row decoding fails.
pub fn execute(stmt: &mut Statement<'_>) -> Result<Vec<Row>, QueryBuilderError> {
    let columns = Columns::new(
        stmt.column_names()
            .into_iter()
            .map(std::string::ToString::to_string)
            .collect(),
    );
    let rows = stmt.raw_query();
    materialize(rows, &columns)
}

/// Run a read-only compiled query. Never commits or rolls back.
///
/// # Errors
/// Returns `QueryBuilderError` if preparing, binding or executing fails.
pub fn execute_read(
    conn: &Connection,
    compiled: &CompiledQuery,
) -> Result<Vec<Row>, QueryBuilderError> {
    let mut stmt = prepare_bound(conn, compiled)?;
    execute(&mut stmt)
}

/// Run an INSERT/UPDATE/DELETE inside its own transaction.
///
/// On any failure after `BEGIN` the transaction is rolled back and the backend
/// message is surfaced as `QueryBuilderError::MutationFailed`. If `BEGIN` itself
/// fails nothing is rolled back.
///
/// # Errors
/// Returns `QueryBuilderError::PrepareFailed`/`ParameterError` before the transaction
/// starts, or `QueryBuilderError::MutationFailed` once it has.
pub fn execute_mutation(
    conn: &Connection,
    kind: QueryKind,
    compiled: &CompiledQuery,
) -> Result<MutationOutcome, QueryBuilderError> {
    debug_assert!(kind.is_mutation(), "{kind} is not a mutation");
    let mut stmt = prepare_bound(conn, compiled)?;

    // A failed BEGIN means a transaction this call does not own may be open.
    if let Err(e) = conn.execute_batch("BEGIN") {
        return Err(QueryBuilderError::MutationFailed {
            operation: kind,
            message: e.to_string(),
        });
    }

    match run_and_commit(conn, &mut stmt) {
        Ok(outcome) => {
            tracing::debug!(
                operation = %kind,
                affected = outcome.affected,
                "mutation committed"
            );
            Ok(outcome)
        }
        Err(e) => {
            rollback(conn);
            Err(QueryBuilderError::MutationFailed {
                operation: kind,
                message: e.to_string(),
            })
        }
    }
}

fn run_and_commit(
    conn: &Connection,
    stmt: &mut Statement<'_>,
) -> Result<MutationOutcome, QueryBuilderError> {
    execute(stmt)?;
    let outcome = MutationOutcome {
        affected: u64::try_from(conn.changes()).unwrap_or(u64::MAX),
        last_insert_id: conn.last_insert_rowid(),
    };
    conn.execute_batch("COMMIT")?;
    Ok(outcome)
}

fn rollback(conn: &Connection) {
    if conn.is_autocommit() {
        return;
    }
    if let Err(e) = conn.execute_batch("ROLLBACK") {
        tracing::warn!(error = %e, "rollback failed");
    }
}
