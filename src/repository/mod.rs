use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::Category;
use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::pagination::Pagination;

pub mod catalog;
pub mod kv;
pub mod memory;

pub use catalog::StaticCatalog;
pub use memory::MemoryStore;

/// Errors raised by persistence and catalog backends.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("catalog data is invalid: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("in-memory store lock poisoned")]
    Poisoned,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be handed to the build repository and the HTTP layer alike.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read access to string blobs stored under well-known keys.
pub trait KeyValueReader {
    /// Raw value stored under `key`, `None` when the key was never written.
    fn get_value(&self, key: &str) -> RepositoryResult<Option<String>>;
}

/// Write access to string blobs stored under well-known keys.
pub trait KeyValueWriter {
    /// Insert or overwrite the value stored under `key`.
    fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()>;
    /// Delete `key`, returning the number of removed entries.
    fn remove_value(&self, key: &str) -> RepositoryResult<usize>;
}

/// Ordering applied to catalog listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    Name,
}

impl TryFrom<&str> for SortOption {
    type Error = RepositoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Self::Default),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            other => Err(RepositoryError::ValidationError(format!(
                "unknown sort option: {other}"
            ))),
        }
    }
}

/// Price bounds and exact spec attribute matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
    /// Spec attribute (camelCase key) to required value, e.g. `socket = AM5`.
    pub specs: BTreeMap<String, String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let price = product.price.get();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        self.specs.iter().all(|(key, expected)| {
            product.specs.spec_value(key).as_deref() == Some(expected.as_str())
        })
    }
}

/// Query parameters used when listing or searching catalog products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Restrict to a single slot.
    pub category: Option<Category>,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub sort: SortOption,
    pub filter: ProductFilter,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }
    pub fn filter(mut self, filter: ProductFilter) -> Self {
        self.filter = filter;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations over the product catalog.
pub trait CatalogReader {
    /// List products matching `query`. The count is taken before pagination.
    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}
