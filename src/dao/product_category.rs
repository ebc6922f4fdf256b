//! Product category repository over the `product_categories` table.

use crate::error::DaoError;
use crate::executor::{PgExecutor, QueryExecutor};
use crate::model::{FromRecord, Product, ProductCategory};
use crate::raw_sql::{execute_statement, execute_unprepared, find_all_by_statement, find_by_statement};
use crate::value::SqlValue;
use std::path::PathBuf;

const ENTITY: &str = "product category";

const INSERT_SQL: &str =
    "INSERT INTO product_categories (name, description, department) VALUES ($1, $2, $3) RETURNING id";
const FIND_BY_ID_SQL: &str =
    "SELECT id, name, description, department FROM product_categories WHERE id = $1";
const FIND_ID_BY_NAME_SQL: &str =
    "SELECT id FROM product_categories WHERE name = $1 ORDER BY id LIMIT 1";
const SELECT_ALL_SQL: &str =
    "SELECT id, name, description, department FROM product_categories ORDER BY id";
const DELETE_BY_ID_SQL: &str = "DELETE FROM product_categories WHERE id = $1";
const DELETE_ALL_SQL: &str = "DELETE FROM product_categories";

/// Persistence operations for [`ProductCategory`]
pub trait ProductCategoryDao {
    /// Validate and insert `category`, returning the id the database assigned.
    ///
    /// # Errors
    ///
    /// `DaoError::Validation` (without touching the database) if a field is
    /// empty, otherwise any executor error.
    fn add(&self, category: &ProductCategory) -> Result<i32, DaoError>;

    /// The category with `id`, or `None` unless exactly one row matches.
    ///
    /// # Errors
    ///
    /// Returns `DaoError` if the query or the row mapping fails.
    fn find(&self, id: i32) -> Result<Option<ProductCategory>, DaoError>;

    /// Delete the category with `id`.
    ///
    /// # Errors
    ///
    /// `DaoError::NotFound` if no such row exists, otherwise any executor error.
    fn remove(&self, id: i32) -> Result<(), DaoError>;

    /// Delete every category and return how many rows went.
    ///
    /// # Errors
    ///
    /// Returns `DaoError` if the statement fails.
    fn remove_all(&self) -> Result<u64, DaoError>;

    /// Id of the first category named `name`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns `DaoError` if the query or the id conversion fails. A missing
    /// name is not an error.
    fn find_id_by_name(&self, name: &str) -> Result<Option<i32>, DaoError>;

    /// Every category, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DaoError` if the query or any row mapping fails.
    fn get_all(&self) -> Result<Vec<ProductCategory>, DaoError>;

    /// The sentinel "All" category. Never touches the database.
    fn default_category(&self) -> ProductCategory {
        ProductCategory::default_category()
    }

    /// Keep the products in `category`; the sentinel keeps everything.
    fn filter_products(&self, products: Vec<Product>, category: &ProductCategory) -> Vec<Product> {
        if category.is_default() {
            return products;
        }
        products
            .into_iter()
            .filter(|product| product.category().same_category(category))
            .collect()
    }
}

/// [`ProductCategoryDao`] backed by a [`QueryExecutor`]
#[derive(Debug, Clone)]
pub struct ProductCategoryDaoDb<E> {
    executor: E,
}

impl ProductCategoryDaoDb<PgExecutor> {
    /// Repository that connects to PostgreSQL with the settings at `settings_path`.
    pub fn connect(settings_path: impl Into<PathBuf>) -> Self {
        Self::new(PgExecutor::new(settings_path))
    }
}

impl<E: QueryExecutor> ProductCategoryDaoDb<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: QueryExecutor> ProductCategoryDao for ProductCategoryDaoDb<E> {
    fn add(&self, category: &ProductCategory) -> Result<i32, DaoError> {
        log::info!("Adding new category: {}", category);
        if let Err(e) = category.validate() {
            log::error!("Rejected category: {}", e);
            return Err(e.into());
        }

        let params = [
            SqlValue::from(category.name.as_str()),
            SqlValue::from(category.description.as_str()),
            SqlValue::from(category.department.as_str()),
        ];
        let rows = self.executor.query(INSERT_SQL, &params)?;
        let id = rows
            .first()
            .ok_or_else(|| DaoError::Query("INSERT did not return an id".to_string()))?
            .get_i32("id")?;

        log::info!("Added category with id {}", id);
        Ok(id)
    }

    fn find(&self, id: i32) -> Result<Option<ProductCategory>, DaoError> {
        log::info!("Searching for category by id: {}", id);
        let found = find_by_statement(&self.executor, FIND_BY_ID_SQL, &[SqlValue::Int(id)])?
            .map(|record| ProductCategory::from_record(&record))
            .transpose()?;

        match &found {
            Some(category) => log::info!("Returning: {}", category),
            None => log::info!("No category found by id: {}", id),
        }
        Ok(found)
    }

    fn remove(&self, id: i32) -> Result<(), DaoError> {
        log::info!("Removing category by id: {}", id);
        let removed = execute_statement(&self.executor, DELETE_BY_ID_SQL, &[SqlValue::Int(id)])?;
        if removed == 0 {
            log::info!("No category found by id: {}", id);
            return Err(DaoError::NotFound { entity: ENTITY, id });
        }
        log::info!("Removed category {}", id);
        Ok(())
    }

    fn remove_all(&self) -> Result<u64, DaoError> {
        log::info!("Removing all categories");
        let removed = execute_unprepared(&self.executor, DELETE_ALL_SQL)?;
        log::info!("All categories removed ({})", removed);
        Ok(removed)
    }

    fn find_id_by_name(&self, name: &str) -> Result<Option<i32>, DaoError> {
        log::info!("Searching for category by name: {}", name);
        let rows = self.executor.query(FIND_ID_BY_NAME_SQL, &[SqlValue::from(name)])?;
        let id = rows.first().map(|row| row.get_i32("id")).transpose()?;

        match id {
            Some(id) => log::info!("Returning: {}", id),
            None => log::info!("No category found by name: {}", name),
        }
        Ok(id)
    }

    fn get_all(&self) -> Result<Vec<ProductCategory>, DaoError> {
        log::info!("Getting all categories");
        let categories = find_all_by_statement(&self.executor, SELECT_ALL_SQL, &[])?
            .iter()
            .map(ProductCategory::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("Returning {} categories", categories.len());
        Ok(categories)
    }
}
