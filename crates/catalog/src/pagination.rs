//! Page requests and the offset/limit arithmetic behind them.

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ValueObject};

/// A 1-based page request as supplied by a call site.
///
/// Fields are kept raw so that a malformed request can reach the engine and
/// be rejected there; use [`PageRequest::window`] to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Requested page. Values below 1 are clamped to 1.
    pub page: i64,
    /// Items per page; `None` means the whole result on one page.
    pub page_size: Option<i64>,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size: Some(page_size) }
    }

    pub fn first(page_size: i64) -> Self {
        Self::new(1, page_size)
    }

    /// Single page holding every match (search, related items).
    pub fn unbounded() -> Self {
        Self { page: 1, page_size: None }
    }

    /// Validate and convert into an offset/limit window.
    pub fn window(&self) -> DomainResult<PageWindow> {
        let page = u64::try_from(self.page.max(1)).unwrap_or(1);
        let limit = match self.page_size {
            None => None,
            Some(size) if size <= 0 => {
                return Err(DomainError::invalid_argument(format!(
                    "page_size must be positive (got {size})"
                )));
            }
            Some(size) => Some(size.unsigned_abs()),
        };
        let offset = limit.map_or(0, |limit| (page - 1).saturating_mul(limit));
        Ok(PageWindow { page, offset, limit })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl ValueObject for PageRequest {}

/// Validated offset/limit window for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Effective (clamped) 1-based page number.
    pub page: u64,
    pub offset: u64,
    /// `None` when the page is unbounded.
    pub limit: Option<u64>,
}

impl PageWindow {
    /// `ceil(total_count / page_size)`; zero for an empty result. An unbounded
    /// window counts as a single page.
    pub fn total_pages(&self, total_count: u64) -> u64 {
        if total_count == 0 {
            return 0;
        }
        match self.limit {
            None => 1,
            Some(limit) => total_count.div_ceil(limit),
        }
    }

    /// Whether a later page exists.
    pub fn has_more(&self, total_count: u64) -> bool {
        self.page < self.total_pages(total_count)
    }

    /// Cut an already-sorted sequence down to this window.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let iter = items.into_iter().skip(skip);
        match self.limit {
            None => iter.collect(),
            Some(limit) => iter.take(usize::try_from(limit).unwrap_or(usize::MAX)).collect(),
        }
    }
}
