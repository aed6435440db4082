//! The storefront views, each reduced to a filter, a sort and a page.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument};

use storefront_catalog::{
    Category, FilterSpecification, PageRequest, Product, ResultSet, SortMode,
};
use storefront_core::ProductId;
use storefront_infra::CatalogStore;

use crate::config::ListingConfig;
use crate::engine::{CatalogQueryEngine, store_failure};
use crate::error::QueryError;
use crate::resolver::{RawFilter, resolve};

/// Query-string parameters of the category page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryListingParams {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Unknown tokens fall back to relevance instead of failing the request.
    #[serde(deserialize_with = "lenient_sort")]
    pub sort: SortMode,
    pub page: i64,
}

fn lenient_sort<'de, D>(deserializer: D) -> Result<SortMode, D::Error>
where
    D: Deserializer<'de>,
{
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(SortMode::parse_lenient(token.as_deref()))
}

impl Default for CategoryListingParams {
    fn default() -> Self {
        Self {
            min_price: None,
            max_price: None,
            sort: SortMode::default(),
            page: 1,
        }
    }
}

impl CategoryListingParams {
    /// Build from raw query values. Anything unusable falls back to its
    /// default: relevance for the sort, page 1 for the page.
    pub fn from_query(
        min_price: Option<&str>,
        max_price: Option<&str>,
        sort: Option<&str>,
        page: Option<&str>,
    ) -> Self {
        Self {
            min_price: min_price.map(str::to_owned),
            max_price: max_price.map(str::to_owned),
            sort: SortMode::parse_lenient(sort),
            page: page.and_then(|p| p.trim().parse().ok()).unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListing {
    pub category: Category,
    pub results: ResultSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    /// Heading text: `name`, plus ` - variant` when there is one.
    pub display_name: String,
    pub category: Option<Category>,
    pub related: Vec<Product>,
}

/// Entry point for every storefront listing.
#[derive(Debug, Clone)]
pub struct Storefront<S> {
    engine: CatalogQueryEngine<S>,
    config: ListingConfig,
}

impl<S> Storefront<S>
where
    S: CatalogStore,
{
    pub fn new(store: S, config: ListingConfig) -> Self {
        Self {
            engine: CatalogQueryEngine::new(store),
            config,
        }
    }

    pub fn engine(&self) -> &CatalogQueryEngine<S> {
        &self.engine
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Home page feed.
    pub async fn list_featured(&self) -> Result<ResultSet, QueryError> {
        self.engine
            .query(
                &FilterSpecification::public(),
                SortMode::Relevance,
                PageRequest::first(self.config.home_page_size),
            )
            .await
    }

    #[instrument(skip(self, params), fields(sort = %params.sort), err)]
    pub async fn list_by_category(
        &self,
        slug: &str,
        params: &CategoryListingParams,
    ) -> Result<CategoryListing, QueryError> {
        let raw = RawFilter::for_slug(slug)
            .with_prices(params.min_price.clone(), params.max_price.clone());
        let resolved = resolve(self.engine.store(), &raw).await?;
        let Some(category) = resolved.category else {
            return Err(QueryError::NotFound);
        };
        let results = self
            .engine
            .query(
                &resolved.filter,
                params.sort,
                PageRequest::new(params.page, self.config.category_page_size),
            )
            .await?;
        Ok(CategoryListing { category, results })
    }

    /// Search page. All matches on one page, in the fixed search order.
    pub async fn search(&self, text: &str) -> Result<ResultSet, QueryError> {
        let filter = FilterSpecification::public().with_search(text);
        self.engine
            .query(&filter, SortMode::Relevance, PageRequest::unbounded())
            .await
    }

    pub async fn related_to(&self, product: &Product) -> Result<Vec<Product>, QueryError> {
        self.engine.related_to(product, self.config.related_limit).await
    }

    /// Detail page: the product, its category and its related items.
    ///
    /// Unknown and inactive products are both [`QueryError::NotFound`]. A
    /// category that has since disappeared is reported as `None`.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn product_detail(&self, id: ProductId) -> Result<ProductDetail, QueryError> {
        let store = self.engine.store();
        let product = store
            .find_product(id)
            .await
            .map_err(store_failure)?
            .filter(|p| p.is_active)
            .ok_or(QueryError::NotFound)?;

        let category_lookup = async {
            match product.category_id {
                Some(category_id) => store.find_category(category_id).await.map_err(store_failure),
                None => Ok(None),
            }
        };
        let (category, related) = tokio::try_join!(category_lookup, self.related_to(&product))?;
        if product.category_id.is_some() && category.is_none() {
            debug!("product references a missing category");
        }

        Ok(ProductDetail {
            display_name: product.display_name(),
            product,
            category,
            related,
        })
    }

    /// Detail page addressed by a raw path segment.
    pub async fn product_detail_by_key(&self, raw_id: &str) -> Result<ProductDetail, QueryError> {
        let id: ProductId = raw_id.parse()?;
        self.product_detail(id).await
    }

    /// Category index, ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>, QueryError> {
        self.engine.store().list_categories().await.map_err(store_failure)
    }
}
