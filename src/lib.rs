//! # shop-dao
//!
//! Synchronous PostgreSQL data access for the shop's product categories.
//!
//! Every operation opens its own connection from a settings file, runs one
//! parameterized statement, and closes the connection again. There is no pool,
//! no cache and no cross-statement transaction.
//!
//! ```no_run
//! use shop_dao::{ProductCategory, ProductCategoryDao, ProductCategoryDaoDb};
//!
//! # fn main() -> Result<(), shop_dao::DaoError> {
//! let dao = ProductCategoryDaoDb::connect("config/connection.properties");
//! let id = dao.add(&ProductCategory::new("Tablet", "Hardware", "A tablet computer"))?;
//! assert_eq!(dao.find(id)?.map(|c| c.name), Some("Tablet".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod dao;
pub mod error;
pub mod executor;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;
pub mod raw_sql;
pub mod value;

pub use config::ConnectionSettings;
pub use connection::{connect, connect_with_settings, ConnectionError};
pub use dao::{ProductCategoryDao, ProductCategoryDaoDb};
pub use error::{DaoError, ValidationError};
pub use executor::{PgExecutor, QueryExecutor};
pub use model::{FromRecord, Product, ProductCategory};
pub use value::{bind_params, Record, SqlValue};
