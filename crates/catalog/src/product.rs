use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, DomainError, DomainResult, Entity, ProductId, ValueObject};

/// Non-negative decimal price.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(format!(
                "price cannot be negative (got {amount})"
            )));
        }
        Ok(Self(amount))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a user-supplied bound the way the listing UI expects: blank,
    /// malformed and negative input all yield `None` instead of an error.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl ValueObject for Price {}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("price cannot be empty"));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|e| DomainError::validation(format!("price {trimmed:?}: {e}")))?;
        Self::new(amount)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A catalog product as the store returns it.
///
/// Products are created and edited by the admin surface; the query engine
/// only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub variant: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub buy_link: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// A visible, unpromoted, uncategorised product.
    pub fn new(id: ProductId, name: impl Into<String>, price: Price, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            variant: None,
            price,
            description: None,
            category_id: None,
            images: Vec::new(),
            buy_link: None,
            featured: false,
            is_pinned: false,
            is_active: default_active(),
            created_at,
            updated_at: None,
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = String>) -> Self {
        self.images = images.into_iter().collect();
        self
    }

    pub fn with_buy_link(mut self, buy_link: impl Into<String>) -> Self {
        self.buy_link = Some(buy_link.into());
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.is_pinned = pinned;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// Label shown on the detail view: `"{name} - {variant}"` when a variant exists.
    pub fn display_name(&self) -> String {
        match self.variant.as_deref().map(str::trim) {
            Some(variant) if !variant.is_empty() => format!("{} - {}", self.name, variant),
            _ => self.name.clone(),
        }
    }

    /// First image, used as the listing thumbnail.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn test_product() -> Product {
        Product::new(
            ProductId::from_uuid(Uuid::from_u128(1)),
            "Phone",
            "199.99".parse().unwrap(),
            test_time(),
        )
    }

    #[test]
    fn price_rejects_negative_amounts() {
        let err = Price::new(Decimal::new(-1, 0)).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for negative price"),
        }
    }

    #[test]
    fn price_accepts_zero_and_negative_zero() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::zero());
        assert!("-0".parse::<Price>().is_ok());
    }

    #[test]
    fn lenient_price_parsing_drops_bad_input() {
        assert_eq!(Price::parse_lenient(" 60 ").map(|p| p.amount()), Some(Decimal::new(60, 0)));
        assert_eq!(Price::parse_lenient(""), None);
        assert_eq!(Price::parse_lenient("   "), None);
        assert_eq!(Price::parse_lenient("cheap"), None);
        assert_eq!(Price::parse_lenient("-5"), None);
    }

    #[test]
    fn new_product_defaults_to_visible_and_unpromoted() {
        let product = test_product();
        assert!(product.is_active);
        assert!(!product.featured);
        assert!(!product.is_pinned);
        assert!(product.images.is_empty());
        assert_eq!(product.category_id, None);
    }

    #[test]
    fn display_name_includes_variant_when_present() {
        let product = test_product();
        assert_eq!(product.display_name(), "Phone");
        assert_eq!(product.clone().with_variant("128GB").display_name(), "Phone - 128GB");
        assert_eq!(product.with_variant("  ").display_name(), "Phone");
    }

    #[test]
    fn deserialize_applies_record_defaults() {
        let json = serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Phone",
            "price": "10.50",
            "created_at": "2024-05-01T12:00:00Z"
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert!(product.is_active);
        assert!(!product.is_pinned);
        assert_eq!(product.price.amount(), Decimal::new(1050, 2));
    }

    #[test]
    fn deserialize_rejects_negative_price() {
        let json = serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Phone",
            "price": "-1",
            "created_at": "2024-05-01T12:00:00Z"
        });
        assert!(serde_json::from_value::<Product>(json).is_err());
    }
}
