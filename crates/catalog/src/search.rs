//! Free-text matching over a product's name, variant and description.

use crate::product::Product;

/// A normalized, non-blank free-text query.
///
/// Construct with [`SearchQuery::parse`]; blank input has no query at all,
/// which is how "don't match everything on an empty search box" is enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    folded: String,
}

impl SearchQuery {
    /// Returns `None` for empty or whitespace-only text.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            folded: text.to_lowercase(),
        })
    }

    /// The trimmed text as the shopper typed it.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-insensitive substring match on `name`, `variant` or `description`.
    pub fn matches(&self, product: &Product) -> bool {
        let fields = [
            Some(product.name.as_str()),
            product.variant.as_deref(),
            product.description.as_deref(),
        ];
        fields
            .into_iter()
            .map(|field| field.unwrap_or_default())
            .any(|field| field.to_lowercase().contains(&self.folded))
    }

    /// `ILIKE` pattern for stores that match in SQL: `%text%` with `\`, `%`
    /// and `_` escaped so they match literally.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.text.len() + 2);
        pattern.push('%');
        for ch in self.text.chars() {
            if matches!(ch, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}
