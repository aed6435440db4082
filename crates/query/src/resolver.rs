//! Turns raw listing inputs into a [`FilterSpecification`].

use serde::Deserialize;
use tracing::debug;

use storefront_catalog::{Category, FilterSpecification, PriceRange, Slug};
use storefront_core::CategoryId;
use storefront_infra::CatalogStore;

use crate::engine::store_failure;
use crate::error::QueryError;

/// How a listing names its category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRef {
    Slug(String),
    Id(CategoryId),
}

/// Unvalidated listing inputs, typically straight from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawFilter {
    pub category: Option<CategoryRef>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search_text: Option<String>,
}

impl RawFilter {
    pub fn for_slug(slug: impl Into<String>) -> Self {
        Self {
            category: Some(CategoryRef::Slug(slug.into())),
            ..Self::default()
        }
    }

    pub fn with_prices(mut self, min: Option<String>, max: Option<String>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }
}

/// The normalized filter plus the category it was scoped to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilter {
    pub filter: FilterSpecification,
    pub category: Option<Category>,
}

/// Resolve `raw` against the store.
///
/// The category must exist, otherwise [`QueryError::NotFound`]. A slug that is
/// not well formed can't name a category and is treated the same way.
/// Unusable price bounds are dropped. The result is always active-only.
pub async fn resolve<S>(store: &S, raw: &RawFilter) -> Result<ResolvedFilter, QueryError>
where
    S: CatalogStore + ?Sized,
{
    let category = match &raw.category {
        None => None,
        Some(CategoryRef::Slug(raw_slug)) => {
            let Ok(slug) = raw_slug.parse::<Slug>() else {
                debug!(slug = %raw_slug, "malformed category slug");
                return Err(QueryError::NotFound);
            };
            Some(
                store
                    .find_category_by_slug(&slug)
                    .await
                    .map_err(store_failure)?
                    .ok_or(QueryError::NotFound)?,
            )
        }
        Some(CategoryRef::Id(id)) => {
            Some(
                store
                    .find_category(*id)
                    .await
                    .map_err(store_failure)?
                    .ok_or(QueryError::NotFound)?,
            )
        }
    };

    let mut filter = FilterSpecification::public().with_price_range(PriceRange::parse_lenient(
        raw.min_price.as_deref(),
        raw.max_price.as_deref(),
    ));
    if let Some(category) = &category {
        filter = filter.in_category(category.id);
    }
    if let Some(text) = &raw.search_text {
        filter = filter.with_search(text.clone());
    }

    Ok(ResolvedFilter { filter, category })
}
