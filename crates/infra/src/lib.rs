//! Infrastructure layer: catalog store adapters and their configuration.

pub mod config;
pub mod store;

pub use config::StoreConfig;
pub use store::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore, StoreCalls, StoreError};
