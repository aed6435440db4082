//! Catalog domain module.
//!
//! This crate contains the selection and ranking rules of the storefront
//! catalog, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage): which products qualify for a request, how they are ordered,
//! and how an ordered set is cut into pages.

pub mod category;
pub mod filter;
pub mod pagination;
pub mod product;
pub mod result;
pub mod search;
pub mod sort;

pub use category::{Category, Slug};
pub use filter::{FilterSpecification, PriceRange};
pub use pagination::{PageRequest, PageWindow};
pub use product::{Price, Product};
pub use result::ResultSet;
pub use search::SearchQuery;
pub use sort::{Direction, SortField, SortKey, SortMode, SortPolicy};
