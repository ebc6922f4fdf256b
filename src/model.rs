//! Domain model.
//!
//! Entities are plain owned structs. Rows are mapped onto them with
//! [`FromRecord`] immediately after each query.

use crate::error::{DaoError, ValidationError};
use crate::value::Record;
use rust_decimal::Decimal;
use std::fmt;

/// Name of the sentinel category that means "no filter".
pub const DEFAULT_CATEGORY_NAME: &str = "All";

/// Typed mapping from a result row onto an entity.
pub trait FromRecord: Sized {
    /// # Errors
    ///
    /// Returns `DaoError::Parse` if a required column is missing or malformed.
    fn from_record(record: &Record) -> Result<Self, DaoError>;
}

/// A product category, e.g. "Tablet" in the "Hardware" department.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductCategory {
    id: Option<i32>,
    pub name: String,
    pub department: String,
    pub description: String,
}

impl ProductCategory {
    /// Build an unpersisted category. Fields are not validated here; see
    /// [`ProductCategory::validate`].
    pub fn new(
        name: impl Into<String>,
        department: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            department: department.into(),
            description: description.into(),
        }
    }

    /// The sentinel "All" category.
    pub fn default_category() -> Self {
        Self::new(DEFAULT_CATEGORY_NAME, "", "")
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Database id, `None` until persisted.
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default_category()
    }

    /// Check that the category can be persisted.
    ///
    /// # Errors
    ///
    /// Returns the first empty field, checked in name, department, description order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            Err(ValidationError::EmptyName)
        } else if self.department.is_empty() {
            Err(ValidationError::EmptyDepartment)
        } else if self.description.is_empty() {
            Err(ValidationError::EmptyDescription)
        } else {
            Ok(())
        }
    }

    /// Whether `other` denotes the same category: by id when both are
    /// persisted, by field values otherwise.
    pub fn same_category(&self, other: &ProductCategory) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.name == other.name
                    && self.department == other.department
                    && self.description == other.description
            }
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "id: {id}, ")?,
            None => write!(f, "id: none, ")?,
        }
        write!(
            f,
            "name: {}, department: {}, description: {}",
            self.name, self.department, self.description
        )
    }
}

impl FromRecord for ProductCategory {
    fn from_record(record: &Record) -> Result<Self, DaoError> {
        Ok(ProductCategory::new(
            record.get_text("name")?,
            record.get_text("department")?,
            record.get_text("description")?,
        )
        .with_id(record.get_i32("id")?))
    }
}

/// A product offered by the shop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: Option<i32>,
    pub name: String,
    pub description: String,
    pub default_price: Decimal,
    pub currency: String,
    pub category: ProductCategory,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        default_price: Decimal,
        currency: impl Into<String>,
        category: ProductCategory,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            default_price,
            currency: currency.into(),
            category,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn category(&self) -> &ProductCategory {
        &self.category
    }

    /// Price with currency, e.g. `"49.9 USD"`.
    pub fn price(&self) -> String {
        format!("{} {}", self.default_price, self.currency)
    }
}
