//! Error types shared by the executor and the repositories.

use crate::connection::ConnectionError;
use may_postgres::Error as PostgresError;

/// Errors returned by every data-access operation
#[derive(Debug, thiserror::Error)]
pub enum DaoError {
    /// The entity was rejected before any database access
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No row with the given id exists
    #[error("There is no {entity} with id {id} in the database")]
    NotFound { entity: &'static str, id: i32 },
    /// Reading the settings or opening the connection failed
    #[error("Can't connect to database: {0}")]
    Connection(#[from] ConnectionError),
    /// The statement failed on the server
    #[error("Can't complete request: {0}")]
    Postgres(#[from] PostgresError),
    /// Executor failure that carries no driver error
    #[error("Query error: {0}")]
    Query(String),
    /// A column could not be decoded or mapped onto an entity
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DaoError {
    /// `true` for failures that came from connecting or running SQL rather
    /// than from the caller's input.
    pub fn is_database_error(&self) -> bool {
        matches!(
            self,
            DaoError::Connection(_) | DaoError::Postgres(_) | DaoError::Query(_)
        )
    }
}

/// Validation failures for entities about to be persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Category must have a name.")]
    EmptyName,
    #[error("Category must have a department.")]
    EmptyDepartment,
    #[error("Category must have a description.")]
    EmptyDescription,
}
