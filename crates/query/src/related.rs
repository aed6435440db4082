//! "You may also like" selection for a product detail page.

use tracing::{debug, instrument};

use storefront_catalog::{FilterSpecification, Product, SortMode, SortPolicy};
use storefront_infra::CatalogStore;

use crate::engine::{CatalogQueryEngine, store_failure};
use crate::error::QueryError;

/// Other public products in the same category as `product`.
///
/// `None` when the product has no category; such products have no related
/// items.
pub fn related_filter(product: &Product) -> Option<FilterSpecification> {
    let category_id = product.category_id?;
    Some(FilterSpecification::public().in_category(category_id).excluding(product.id))
}

impl<S> CatalogQueryEngine<S>
where
    S: CatalogStore,
{
    /// Up to `limit` related products in relevance order.
    ///
    /// Issues a single fetch and no count.
    #[instrument(skip_all, fields(product_id = %product.id, limit = limit), err)]
    pub async fn related_to(&self, product: &Product, limit: u64) -> Result<Vec<Product>, QueryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let Some(filter) = related_filter(product) else {
            debug!("product has no category; no related items");
            return Ok(Vec::new());
        };
        self.store()
            .fetch(&filter, SortPolicy::for_mode(SortMode::Relevance), 0, Some(limit))
            .await
            .map_err(store_failure)
    }
}
