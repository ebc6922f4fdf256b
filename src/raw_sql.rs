//! Raw SQL helpers.
//!
//! Convenience functions over [`QueryExecutor`] for the common call shapes:
//! a statement without parameters, a parameterized statement, all rows, a
//! single row, and a single value.

use crate::error::DaoError;
use crate::executor::QueryExecutor;
use crate::value::{Record, SqlValue};

/// Execute a mutating statement that takes no parameters.
///
/// # Errors
///
/// Returns `DaoError` if the SQL execution fails.
pub fn execute_unprepared<E: QueryExecutor + ?Sized>(executor: &E, sql: &str) -> Result<u64, DaoError> {
    executor.execute(sql, &[])
}

/// Execute a parameterized mutating statement.
///
/// # Errors
///
/// Returns `DaoError` if the SQL execution fails.
pub fn execute_statement<E: QueryExecutor + ?Sized>(
    executor: &E,
    sql: &str,
    params: &[SqlValue],
) -> Result<u64, DaoError> {
    executor.execute(sql, params)
}

/// Query every row of a statement.
///
/// # Errors
///
/// Returns `DaoError` if the query execution fails.
pub fn find_all_by_statement<E: QueryExecutor + ?Sized>(
    executor: &E,
    sql: &str,
    params: &[SqlValue],
) -> Result<Vec<Record>, DaoError> {
    executor.query(sql, params)
}

/// Query a statement that is expected to match exactly one row.
///
/// Returns `Ok(None)` when no row or more than one row matched.
///
/// # Errors
///
/// Returns `DaoError` if the query execution fails.
pub fn find_by_statement<E: QueryExecutor + ?Sized>(
    executor: &E,
    sql: &str,
    params: &[SqlValue],
) -> Result<Option<Record>, DaoError> {
    let mut rows = executor.query(sql, params)?;
    match rows.len() {
        1 => Ok(rows.pop()),
        0 => Ok(None),
        n => {
            log::warn!("Expected at most one row, got {}", n);
            Ok(None)
        }
    }
}

/// Query the first column of the first row.
///
/// Returns `Ok(None)` when the statement matched no rows.
///
/// # Errors
///
/// Returns `DaoError` if the query execution fails.
pub fn query_value<E: QueryExecutor + ?Sized>(
    executor: &E,
    sql: &str,
    params: &[SqlValue],
    column: &str,
) -> Result<Option<SqlValue>, DaoError> {
    let rows = executor.query(sql, params)?;
    match rows.first() {
        None => Ok(None),
        Some(row) => row
            .get(column)
            .cloned()
            .map(Some)
            .ok_or_else(|| DaoError::Parse(format!("Missing column '{column}'"))),
    }
}
