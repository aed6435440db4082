use serde::{Deserialize, Serialize};

use crate::pagination::PageWindow;
use crate::product::Product;

/// One page of a listing plus the size of the whole match set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<Product>,
    /// Matches across all pages.
    pub total_count: u64,
    pub total_pages: u64,
    /// Effective 1-based page after clamping.
    pub page: u64,
    pub has_more: bool,
}

impl ResultSet {
    pub fn new(items: Vec<Product>, total_count: u64, window: &PageWindow) -> Self {
        Self {
            items,
            total_count,
            total_pages: window.total_pages(total_count),
            page: window.page,
            has_more: window.has_more(total_count),
        }
    }

    pub fn empty(window: &PageWindow) -> Self {
        Self::new(Vec::new(), 0, window)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
