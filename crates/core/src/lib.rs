//! Identifiers, errors and marker traits shared by every storefront crate.
//!
//! Nothing here touches a store or a runtime.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ProductId};
pub use value_object::ValueObject;
