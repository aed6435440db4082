//! Deterministic ordering rules for listings.
//!
//! Every policy is an ordered list of [`SortKey`]s. The in-memory comparator
//! and SQL `ORDER BY` clauses are both derived from these lists, so every
//! store ranks the same way.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, ValueObject};

use crate::product::Product;

/// Listing sort selected by the shopper.
///
/// Serialized as its query-string token (`price_asc`, not `price_ascending`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum SortMode {
    /// Featured first, then newest. Not a text-relevance score.
    #[default]
    Relevance,
    PriceAscending,
    PriceDescending,
    Newest,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Relevance,
        SortMode::PriceAscending,
        SortMode::PriceDescending,
        SortMode::Newest,
    ];

    /// Query-string token used by the listing UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::PriceAscending => "price_asc",
            SortMode::PriceDescending => "price_desc",
            SortMode::Newest => "newest",
        }
    }

    /// Unknown or missing tokens fall back to [`SortMode::Relevance`].
    pub fn parse_lenient(token: Option<&str>) -> Self {
        token.and_then(|t| t.parse().ok()).unwrap_or_default()
    }
}

impl ValueObject for SortMode {}

impl FromStr for SortMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(SortMode::Relevance),
            "price_asc" | "price_ascending" => Ok(SortMode::PriceAscending),
            "price_desc" | "price_descending" => Ok(SortMode::PriceDescending),
            "newest" => Ok(SortMode::Newest),
            other => Err(DomainError::validation(format!(
                "unknown sort mode {other:?}; expected one of: relevance, price_asc, price_desc, newest"
            ))),
        }
    }
}

impl TryFrom<String> for SortMode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortMode> for &'static str {
    fn from(mode: SortMode) -> Self {
        mode.as_str()
    }
}

impl core::fmt::Display for SortMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Pinned,
    Featured,
    Price,
    CreatedAt,
    Id,
}

impl SortField {
    /// Store column backing this field.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Pinned => "is_pinned",
            SortField::Featured => "featured",
            SortField::Price => "price",
            SortField::CreatedAt => "created_at",
            SortField::Id => "id",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Pinned => a.is_pinned.cmp(&b.is_pinned),
            SortField::Featured => a.featured.cmp(&b.featured),
            SortField::Price => a.price.cmp(&b.price),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Id => a.id.cmp(&b.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

impl SortKey {
    pub const fn asc(field: SortField) -> Self {
        Self { field, direction: Direction::Ascending }
    }

    pub const fn desc(field: SortField) -> Self {
        Self { field, direction: Direction::Descending }
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ord = self.field.compare(a, b);
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

const RELEVANCE_KEYS: &[SortKey] = &[
    SortKey::desc(SortField::Pinned),
    SortKey::desc(SortField::Featured),
    SortKey::desc(SortField::CreatedAt),
    SortKey::asc(SortField::Id),
];

const PRICE_ASCENDING_KEYS: &[SortKey] = &[
    SortKey::desc(SortField::Pinned),
    SortKey::asc(SortField::Price),
    SortKey::asc(SortField::Id),
];

const PRICE_DESCENDING_KEYS: &[SortKey] = &[
    SortKey::desc(SortField::Pinned),
    SortKey::desc(SortField::Price),
    SortKey::asc(SortField::Id),
];

const NEWEST_KEYS: &[SortKey] = &[
    SortKey::desc(SortField::Pinned),
    SortKey::desc(SortField::CreatedAt),
    SortKey::asc(SortField::Id),
];

/// A total order over products.
///
/// Pinned products always lead. The final key is the product id, so two
/// distinct products never compare equal and repeated queries page stably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortPolicy {
    name: &'static str,
    keys: &'static [SortKey],
}

impl SortPolicy {
    pub fn for_mode(mode: SortMode) -> Self {
        let keys = match mode {
            SortMode::Relevance => RELEVANCE_KEYS,
            SortMode::PriceAscending => PRICE_ASCENDING_KEYS,
            SortMode::PriceDescending => PRICE_DESCENDING_KEYS,
            SortMode::Newest => NEWEST_KEYS,
        };
        Self { name: mode.as_str(), keys }
    }

    /// Fixed order of the search view: featured first, then newest, with the
    /// pinning override applied like every other listing.
    pub fn search() -> Self {
        Self { name: "search", keys: RELEVANCE_KEYS }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn keys(&self) -> &'static [SortKey] {
        self.keys
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    pub fn sort(&self, products: &mut [Product]) {
        products.sort_by(|a, b| self.compare(a, b));
    }
}

impl From<SortMode> for SortPolicy {
    fn from(mode: SortMode) -> Self {
        Self::for_mode(mode)
    }
}
