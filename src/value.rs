//! Parameter and column values.
//!
//! [`SqlValue`] is what callers bind into a statement and what the executor
//! decodes each column into. A [`Record`] is one decoded row, keyed by column
//! name. Records stay inside the data-access layer: repositories map them onto
//! typed entities (see [`crate::model::FromRecord`]) right after each query.

use crate::error::DaoError;
use bytes::BytesMut;
use may_postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// A dynamically typed SQL value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Real(f32),
    Double(f64),
    Numeric(Decimal),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Integer view of the value. Text is parsed, so numeric text columns work too.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::SmallInt(v) => Some(i64::from(*v)),
            SqlValue::Int(v) => Some(i64::from(*v)),
            SqlValue::BigInt(v) => Some(*v),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(v) => write!(f, "{v}"),
            SqlValue::SmallInt(v) => write!(f, "{v}"),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::BigInt(v) => write!(f, "{v}"),
            SqlValue::Real(v) => write!(f, "{v}"),
            SqlValue::Double(v) => write!(f, "{v}"),
            SqlValue::Numeric(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::SmallInt(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Real(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Double(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Numeric(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_owned())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(v) => v.to_sql_checked(ty, out),
            SqlValue::SmallInt(v) => integer_to_sql(i64::from(*v), ty, out),
            SqlValue::Int(v) => integer_to_sql(i64::from(*v), ty, out),
            SqlValue::BigInt(v) => integer_to_sql(*v, ty, out),
            SqlValue::Real(v) => {
                if *ty == Type::FLOAT8 {
                    f64::from(*v).to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            SqlValue::Double(v) => v.to_sql_checked(ty, out),
            SqlValue::Numeric(v) => v.to_sql_checked(ty, out),
            SqlValue::Text(v) => v.to_sql_checked(ty, out),
        }
    }

    // The concrete check happens per variant in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// Bind integers to whatever width the server inferred for the placeholder.
fn integer_to_sql(
    v: i64,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    if *ty == Type::INT2 {
        i16::try_from(v)?.to_sql_checked(ty, out)
    } else if *ty == Type::INT4 {
        i32::try_from(v)?.to_sql_checked(ty, out)
    } else {
        v.to_sql_checked(ty, out)
    }
}

/// Bind `params` to positional placeholders: `params[0]` is `$1`, and so on.
///
/// The placeholder count is not checked here; the driver rejects a mismatch.
pub fn bind_params(params: &[SqlValue]) -> Vec<&dyn ToSql> {
    params.iter().map(|p| p as &dyn ToSql).collect()
}

/// One result row: column name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: HashMap<String, SqlValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: SqlValue) {
        self.columns.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns.get(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn require(&self, column: &str) -> Result<&SqlValue, DaoError> {
        match self.columns.get(column) {
            None => Err(DaoError::Parse(format!("Missing column '{column}'"))),
            Some(value) if value.is_null() => {
                Err(DaoError::Parse(format!("Column '{column}' is NULL")))
            }
            Some(value) => Ok(value),
        }
    }

    /// Non-null column rendered as text.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::Parse` if the column is missing or NULL.
    pub fn get_text(&self, column: &str) -> Result<String, DaoError> {
        self.require(column).map(ToString::to_string)
    }

    /// Non-null column as `i32`, parsing text if needed.
    ///
    /// # Errors
    ///
    /// Returns `DaoError::Parse` if the column is missing, NULL, not numeric,
    /// or out of range.
    pub fn get_i32(&self, column: &str) -> Result<i32, DaoError> {
        let value = self.require(column)?;
        let wide = value
            .as_i64()
            .ok_or_else(|| DaoError::Parse(format!("Column '{column}' is not an integer: {value}")))?;
        i32::try_from(wide)
            .map_err(|_| DaoError::Parse(format!("Column '{column}' is out of range: {wide}")))
    }
}

impl<K: Into<String>> FromIterator<(K, SqlValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, SqlValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
