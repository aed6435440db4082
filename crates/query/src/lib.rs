//! Catalog query engine: one place where every storefront listing is
//! filtered, ranked and paged.
//!
//! Call sites (home feed, category page, search page, detail page) go through
//! [`Storefront`], which only decides the filter, sort and page for each view
//! and delegates the rest to [`CatalogQueryEngine`].

pub mod config;
pub mod engine;
pub mod error;
pub mod related;
pub mod resolver;
pub mod storefront;

pub use config::ListingConfig;
pub use engine::CatalogQueryEngine;
pub use error::QueryError;
pub use related::related_filter;
pub use resolver::{CategoryRef, RawFilter, ResolvedFilter, resolve};
pub use storefront::{CategoryListing, CategoryListingParams, ProductDetail, Storefront};
