//! Per-view listing sizes.

use serde::Deserialize;

const HOME_PAGE_SIZE: i64 = 12;
const CATEGORY_PAGE_SIZE: i64 = 48;
const RELATED_LIMIT: u64 = 4;

/// Page sizes of the storefront views.
///
/// Search is always unbounded and has no setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "RawListingConfig")]
pub struct ListingConfig {
    pub home_page_size: i64,
    pub category_page_size: i64,
    pub related_limit: u64,
}

/// Deserialized form before size checks; absent fields stay `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawListingConfig {
    home_page_size: Option<i64>,
    category_page_size: Option<i64>,
    related_limit: Option<i64>,
}

impl From<RawListingConfig> for ListingConfig {
    fn from(raw: RawListingConfig) -> Self {
        let defaults = Self::default();
        Self {
            home_page_size: raw
                .home_page_size
                .and_then(|v| checked("home_page_size", v))
                .unwrap_or(defaults.home_page_size),
            category_page_size: raw
                .category_page_size
                .and_then(|v| checked("category_page_size", v))
                .unwrap_or(defaults.category_page_size),
            related_limit: raw
                .related_limit
                .and_then(|v| checked("related_limit", v))
                .and_then(|v| u64::try_from(v).ok())
                .unwrap_or(defaults.related_limit),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            home_page_size: HOME_PAGE_SIZE,
            category_page_size: CATEGORY_PAGE_SIZE,
            related_limit: RELATED_LIMIT,
        }
    }
}

impl ListingConfig {
    /// Read `STOREFRONT_HOME_PAGE_SIZE`, `STOREFRONT_CATEGORY_PAGE_SIZE` and
    /// `STOREFRONT_RELATED_LIMIT`. Missing or unusable values keep their
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            home_page_size: positive(&lookup, "STOREFRONT_HOME_PAGE_SIZE")
                .unwrap_or(defaults.home_page_size),
            category_page_size: positive(&lookup, "STOREFRONT_CATEGORY_PAGE_SIZE")
                .unwrap_or(defaults.category_page_size),
            related_limit: positive(&lookup, "STOREFRONT_RELATED_LIMIT")
                .and_then(|v| u64::try_from(v).ok())
                .unwrap_or(defaults.related_limit),
        }
    }
}

fn positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<i64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<i64>() {
        Ok(value) => checked(key, value),
        Err(_) => {
            tracing::warn!(key, raw = %raw, "ignoring malformed listing size; using default");
            None
        }
    }
}

fn checked(key: &str, value: i64) -> Option<i64> {
    if value > 0 {
        return Some(value);
    }
    tracing::warn!(key, value, "ignoring non-positive listing size; using default");
    None
}
