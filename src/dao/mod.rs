//! Repositories.
//!
//! Each repository builds SQL and parameters for one entity, runs them through
//! a [`QueryExecutor`](crate::executor::QueryExecutor), and maps the rows back
//! onto typed entities.

pub mod product_category;

pub use product_category::{ProductCategoryDao, ProductCategoryDaoDb};
