//! Query executor.
//!
//! [`QueryExecutor`] is the seam every repository is written against. It has
//! two surfaces: `execute` for mutating statements (row count back) and
//! `query` for reading statements (decoded rows back).
//!
//! [`PgExecutor`] is the PostgreSQL implementation. Each call opens its own
//! connection from the settings file, runs exactly one statement, and drops
//! the connection before returning, whether the statement succeeded or not.

use crate::connection;
use crate::error::DaoError;
use crate::value::{bind_params, Record, SqlValue};
use may_postgres::types::{FromSql, Type};
use may_postgres::{Client, Row};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Trait for executing database operations
///
/// # Examples
///
/// ```no_run
/// use shop_dao::{PgExecutor, QueryExecutor, SqlValue};
///
/// # fn main() -> Result<(), shop_dao::DaoError> {
/// let executor = PgExecutor::new("config/connection.properties");
///
/// let deleted = executor.execute(
///     "DELETE FROM product_categories WHERE id = $1",
///     &[SqlValue::Int(42)],
/// )?;
///
/// let rows = executor.query("SELECT id, name FROM product_categories", &[])?;
/// for row in &rows {
///     println!("{} {}", row.get_i32("id")?, row.get_text("name")?);
/// }
/// # Ok(())
/// # }
/// ```
pub trait QueryExecutor {
    /// Execute a mutating statement and return the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns `DaoError` if connecting or executing fails.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DaoError>;

    /// Execute a query and return every row, in result-set order.
    ///
    /// # Errors
    ///
    /// Returns `DaoError` if connecting, executing, or decoding a column fails.
    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, DaoError>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DaoError> {
        (**self).execute(sql, params)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, DaoError> {
        (**self).query(sql, params)
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for Box<E> {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DaoError> {
        (**self).execute(sql, params)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, DaoError> {
        (**self).query(sql, params)
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for Arc<E> {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DaoError> {
        (**self).execute(sql, params)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, DaoError> {
        (**self).query(sql, params)
    }
}

/// PostgreSQL executor that connects per call
#[derive(Debug, Clone)]
pub struct PgExecutor {
    settings_path: PathBuf,
}

impl PgExecutor {
    /// Create an executor that reads its connection settings from `settings_path`.
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn connect(&self) -> Result<Client, DaoError> {
        connection::connect_with_settings(&self.settings_path).map_err(DaoError::from)
    }
}

impl QueryExecutor for PgExecutor {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DaoError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("db.execute", sql = sql, params = params.len()).entered();

        log::info!("Trying to execute DML SQL query with {} parameter(s)", params.len());
        let client = self.connect()?;

        log::debug!("Executing DML SQL query: {}", sql);
        let start = Instant::now();
        let affected = client.execute(sql, &bind_params(params)).map_err(|e| {
            log::error!("SQL query failed: {}", e);
            DaoError::Postgres(e)
        })?;

        log::info!(
            "Executed DML SQL query: {} row(s) affected in {:?}",
            affected,
            start.elapsed()
        );
        Ok(affected)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>, DaoError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("db.query", sql = sql, params = params.len()).entered();

        log::info!("Trying to execute Select SQL query with {} parameter(s)", params.len());
        let client = self.connect()?;

        log::debug!("Executing Select SQL query: {}", sql);
        let start = Instant::now();
        let rows = client.query(sql, &bind_params(params)).map_err(|e| {
            log::error!("SQL query failed: {}", e);
            DaoError::Postgres(e)
        })?;

        let records = rows.iter().map(row_to_record).collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "Executed Select SQL query: {} row(s) in {:?}",
            records.len(),
            start.elapsed()
        );
        Ok(records)
    }
}

fn row_to_record(row: &Row) -> Result<Record, DaoError> {
    let mut record = Record::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, idx, column.type_()).map_err(|e| {
            DaoError::Parse(format!("Failed to decode column '{}': {}", column.name(), e))
        })?;
        record.insert(column.name(), value);
    }
    Ok(record)
}

fn decode_column(row: &Row, idx: usize, ty: &Type) -> Result<SqlValue, String> {
    fn get<'a, T: FromSql<'a>>(row: &'a Row, idx: usize) -> Result<Option<T>, String> {
        row.try_get::<usize, Option<T>>(idx).map_err(|e| e.to_string())
    }

    let value = if *ty == Type::BOOL {
        get::<bool>(row, idx)?.map(SqlValue::Bool)
    } else if *ty == Type::INT2 {
        get::<i16>(row, idx)?.map(SqlValue::SmallInt)
    } else if *ty == Type::INT4 {
        get::<i32>(row, idx)?.map(SqlValue::Int)
    } else if *ty == Type::INT8 {
        get::<i64>(row, idx)?.map(SqlValue::BigInt)
    } else if *ty == Type::FLOAT4 {
        get::<f32>(row, idx)?.map(SqlValue::Real)
    } else if *ty == Type::FLOAT8 {
        get::<f64>(row, idx)?.map(SqlValue::Double)
    } else if *ty == Type::NUMERIC {
        get::<Decimal>(row, idx)?.map(SqlValue::Numeric)
    } else if <String as FromSql<'_>>::accepts(ty) {
        get::<String>(row, idx)?.map(SqlValue::Text)
    } else {
        return Err(format!("unsupported column type {ty}"));
    };

    Ok(value.unwrap_or(SqlValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_path_is_kept() {
        let executor = PgExecutor::new("config/connection.properties");
        assert_eq!(
            executor.settings_path(),
            Path::new("config/connection.properties")
        );
    }

    #[test]
    fn test_missing_settings_fail_as_connection_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let executor = PgExecutor::new(dir.path().join("absent.properties"));

        let err = executor
            .execute("DELETE FROM product_categories", &[])
            .expect_err("execute must fail without settings");
        assert!(matches!(err, DaoError::Connection(_)));
        assert!(err.to_string().contains("Can't connect to database"));

        let err = executor
            .query("SELECT id FROM product_categories", &[])
            .expect_err("query must fail without settings");
        assert!(matches!(err, DaoError::Connection(_)));
    }

    #[test]
    fn test_refused_connection_fails_as_connection_error() {
        use crate::connection::ConnectionError;
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .suffix(".properties")
            .tempfile()
            .expect("temp file");
        writeln!(file, "db_name=shop").unwrap();
        writeln!(file, "db_url=127.0.0.1:1").unwrap();
        writeln!(file, "db_user=shop").unwrap();
        writeln!(file, "db_password=secret").unwrap();
        let executor = PgExecutor::new(file.path());

        let err = executor
            .execute("DELETE FROM product_categories", &[])
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, DaoError::Connection(ConnectionError::Postgres(_))));
        assert!(err.is_database_error());
        assert!(err.to_string().starts_with("Can't connect to database"));

        let err = executor
            .query("SELECT id FROM product_categories", &[])
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, DaoError::Connection(ConnectionError::Postgres(_))));
        assert!(err.to_string().starts_with("Can't connect to database"));
    }

    #[test]
    fn test_executor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgExecutor>();
    }
}
