//! Scripted executor for tests.
//!
//! Compiled for this crate's unit tests and, with the `mock` feature, for
//! downstream crates.
//!
//! ```ignore
//! use shop_dao::mock::MockExecutor;
//! use shop_dao::{QueryExecutor, Record, SqlValue};
//!
//! let executor = MockExecutor::new()
//!     .append_query_results(vec![[("id", SqlValue::Int(1))].into_iter().collect::<Record>()])
//!     .append_exec_result(1);
//!
//! assert_eq!(executor.query("SELECT id FROM t", &[]).unwrap().len(), 1);
//! assert_eq!(executor.execute("DELETE FROM t WHERE id = $1", &[SqlValue::Int(1)]).unwrap(), 1);
//! assert_eq!(executor.statements().len(), 2);
//! ```

use crate::error::DaoError;
use crate::executor::QueryExecutor;
use crate::value::{Record, SqlValue};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A statement the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

#[derive(Debug)]
enum MockResult {
    Exec(u64),
    Rows(Vec<Record>),
    Error(DaoError),
}

/// Executor that replays queued results in order and records every statement
#[derive(Debug, Default)]
pub struct MockExecutor {
    results: Mutex<VecDeque<MockResult>>,
    statements: Mutex<Vec<RecordedStatement>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the affected-row count for the next `execute`.
    pub fn append_exec_result(self, rows_affected: u64) -> Self {
        self.push(MockResult::Exec(rows_affected))
    }

    /// Queue the rows for the next `query`.
    pub fn append_query_results(self, rows: Vec<Record>) -> Self {
        self.push(MockResult::Rows(rows))
    }

    /// Queue a failure for the next call of either kind.
    pub fn append_error(self, error: DaoError) -> Self {
        self.push(MockResult::Error(error))
    }

    /// Every statement received so far, oldest first.
    pub fn statements(&self) -> Vec<RecordedStatement> {
        lock(&self.statements).clone()
    }

    /// Number of queued results not consumed yet.
    pub fn pending(&self) -> usize {
        lock(&self.results).len()
    }

    fn push(self, result: MockResult) -> Self {
        lock(&self.results).push_back(result);
        self
    }

    fn next(&self, sql: &str, params: &[SqlValue]) -> Result<MockResult, DaoError> {
        lock(&self.statements).push(RecordedStatement {
            sql: sql.to_owned(),
            params: params.to_vec(),
        });
        match lock(&self.results).pop_front() {
            Some(MockResult::Error(e)) => Err(e),
            Some(result) => Ok(result),
            None => Err(DaoError::Query(format!("No mock result queued for: {sql}"))),
        }
    }
}

impl QueryExecutor for MockExecutor {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DaoError> {
        match self.next(sql, params)? {
            MockResult::Exec(n) => Ok(n),
            _ => Err(DaoError::Query(format!("Queued rows, but execute was called: {sql}"))),
        }
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, DaoError> {
        match self.next(sql, params)? {
            MockResult::Rows(rows) => Ok(rows),
            _ => Err(DaoError::Query(format!("Queued an exec result, but query was called: {sql}"))),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queue_is_an_error() {
        let executor = MockExecutor::new();
        let err = executor.execute("DELETE FROM t", &[]).unwrap_err();
        assert!(matches!(err, DaoError::Query(_)));
        assert_eq!(executor.statements().len(), 1);
    }

    #[test]
    fn test_kind_mismatch_is_an_error() {
        let executor = MockExecutor::new().append_exec_result(1);
        assert!(executor.query("SELECT 1", &[]).is_err());
        assert_eq!(executor.pending(), 0);
    }
}
