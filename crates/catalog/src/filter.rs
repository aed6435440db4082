//! Filter specification: which products qualify for a listing request.

use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, ProductId, ValueObject};

use crate::product::{Price, Product};
use crate::search::SearchQuery;

/// Inclusive price bounds. Either side may be open.
///
/// A range whose lower bound exceeds its upper bound is legal and matches
/// nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Price>,
    pub max: Option<Price>,
}

impl PriceRange {
    pub fn new(min: Option<Price>, max: Option<Price>) -> Self {
        Self { min, max }
    }

    /// Build a range from raw query-string values. Bounds that do not parse as
    /// non-negative numbers are dropped, not reported.
    pub fn parse_lenient(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: parse_bound("min_price", min),
            max: parse_bound("max_price", max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: Price) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

fn parse_bound(name: &'static str, raw: Option<&str>) -> Option<Price> {
    let raw = raw?;
    let parsed = Price::parse_lenient(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        tracing::debug!(bound = name, raw, "dropping unparsable price bound");
    }
    parsed
}

impl ValueObject for PriceRange {}

/// Normalized description of which products qualify for a request.
///
/// [`Default`] is the public listing filter: active products only, no other
/// restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpecification {
    pub category_id: Option<CategoryId>,
    pub price_min: Option<Price>,
    pub price_max: Option<Price>,
    pub search_text: Option<String>,
    pub active_only: bool,
    /// Product left out of the result (the product a related list is built for).
    pub exclude_id: Option<ProductId>,
}

impl Default for FilterSpecification {
    fn default() -> Self {
        Self {
            category_id: None,
            price_min: None,
            price_max: None,
            search_text: None,
            active_only: true,
            exclude_id: None,
        }
    }
}

impl ValueObject for FilterSpecification {}

impl FilterSpecification {
    /// Active products only.
    pub fn public() -> Self {
        Self::default()
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_min = range.min;
        self.price_max = range.max;
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn excluding(mut self, product_id: ProductId) -> Self {
        self.exclude_id = Some(product_id);
        self
    }

    pub fn price_range(&self) -> PriceRange {
        PriceRange::new(self.price_min, self.price_max)
    }

    /// True when the request is a search, even a blank one.
    pub fn is_search(&self) -> bool {
        self.search_text.is_some()
    }

    /// The normalized query, `None` when absent or blank.
    pub fn search_query(&self) -> Option<SearchQuery> {
        self.search_text.as_deref().and_then(SearchQuery::parse)
    }

    /// A search was requested but the text is blank; no query is performed.
    pub fn is_blank_search(&self) -> bool {
        self.is_search() && self.search_query().is_none()
    }

    /// Structural predicates: active flag, category, price range, exclusion.
    pub fn matches_structure(&self, product: &Product) -> bool {
        if self.active_only && !product.is_active {
            return false;
        }
        if let Some(category_id) = self.category_id {
            if product.category_id != Some(category_id) {
                return false;
            }
        }
        if self.exclude_id == Some(product.id) {
            return false;
        }
        self.price_range().contains(product.price)
    }

    /// Full predicate. A blank search matches nothing.
    pub fn matches(&self, product: &Product) -> bool {
        if !self.matches_structure(product) {
            return false;
        }
        match (&self.search_text, self.search_query()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(_), Some(query)) => query.matches(product),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn price(raw: &str) -> Price {
        raw.parse().unwrap()
    }

    fn product(n: u128, raw_price: &str) -> Product {
        Product::new(
            ProductId::from_uuid(Uuid::from_u128(n)),
            format!("Product {n}"),
            price(raw_price),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .in_category(CategoryId::new(1))
    }

    #[test]
    fn default_filter_is_active_only() {
        let filter = FilterSpecification::default();
        assert!(filter.active_only);
        assert!(filter.matches(&product(1, "10")));
        assert!(!filter.matches(&product(1, "10").active(false)));
    }

    #[test]
    fn price_range_is_inclusive() {
        let range = PriceRange::new(Some(price("60")), Some(price("150")));
        assert!(range.contains(price("60")));
        assert!(range.contains(price("150")));
        assert!(range.contains(price("100")));
        assert!(!range.contains(price("50")));
        assert!(!range.contains(price("200")));
    }

    #[test]
    fn inverted_price_range_matches_nothing() {
        let range = PriceRange::new(Some(price("150")), Some(price("60")));
        for raw in ["0", "60", "100", "150", "1000"] {
            assert!(!range.contains(price(raw)));
        }
    }

    #[test]
    fn lenient_range_drops_malformed_bounds() {
        let range = PriceRange::parse_lenient(Some("abc"), Some(" 99.5 "));
        assert_eq!(range.min, None);
        assert_eq!(range.max, Some(price("99.5")));

        let range = PriceRange::parse_lenient(Some("-10"), Some(""));
        assert!(range.is_unbounded());
    }

    #[test]
    fn category_filter_requires_equal_category() {
        let filter = FilterSpecification::public().in_category(CategoryId::new(2));
        assert!(!filter.matches(&product(1, "10")));
        assert!(!filter.matches(&Product { category_id: None, ..product(1, "10") }));
        assert!(filter.matches(&product(1, "10").in_category(CategoryId::new(2))));
    }

    #[test]
    fn excluded_product_never_matches() {
        let target = product(5, "10");
        let filter = FilterSpecification::public().excluding(target.id);
        assert!(!filter.matches(&target));
        assert!(filter.matches(&product(6, "10")));
    }

    #[test]
    fn blank_search_matches_nothing() {
        let filter = FilterSpecification::public().with_search("   ");
        assert!(filter.is_blank_search());
        assert!(!filter.matches(&product(1, "10")));
    }

    #[test]
    fn search_combines_with_structural_filters() {
        let filter = FilterSpecification::public().with_search("product 1");
        assert!(filter.matches(&product(1, "10")));
        assert!(!filter.matches(&product(1, "10").active(false)));
        assert!(!filter.matches(&product(2, "10")));
    }
}
