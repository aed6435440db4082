//! Catalog store abstraction consumed by the query engine.
//!
//! The store owns products and categories. The engine only asks it to count,
//! fetch and look up; storage, indexing and durability live behind this trait.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use storefront_catalog::{Category, FilterSpecification, Product, Slug, SortPolicy};
use storefront_core::{CategoryId, ProductId};

pub use in_memory::{InMemoryCatalogStore, StoreCalls};
pub use postgres::PostgresCatalogStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be mapped to a catalog type.
    #[error("failed to decode stored record: {0}")]
    Decode(String),
}

/// Query/filter/sort/limit interface over the product catalog.
///
/// Implementations must apply `filter` exactly as
/// [`FilterSpecification::matches`] does and order with `sort`, so that
/// `count(f) == fetch(f, sort, 0, None).len()` for every filter.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Number of products matching `filter`, ignoring pagination.
    async fn count(&self, filter: &FilterSpecification) -> Result<u64, StoreError>;

    /// Matching products, ordered by `sort`, skipping `offset` rows and
    /// returning at most `limit` (`None` = no limit).
    async fn fetch(
        &self,
        filter: &FilterSpecification,
        sort: SortPolicy,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Product>, StoreError>;

    async fn find_category_by_slug(&self, slug: &Slug) -> Result<Option<Category>, StoreError>;

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Product by id regardless of its active flag.
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// All categories ordered by name, ties by id.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
}

#[async_trait::async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn count(&self, filter: &FilterSpecification) -> Result<u64, StoreError> {
        (**self).count(filter).await
    }

    async fn fetch(
        &self,
        filter: &FilterSpecification,
        sort: SortPolicy,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Product>, StoreError> {
        (**self).fetch(filter, sort, offset, limit).await
    }

    async fn find_category_by_slug(&self, slug: &Slug) -> Result<Option<Category>, StoreError> {
        (**self).find_category_by_slug(slug).await
    }

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        (**self).find_category(id).await
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_product(id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).list_categories().await
    }
}
