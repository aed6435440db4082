//! Errors raised while building catalog values.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failure to construct or interpret a catalog value.
///
/// Every variant is a property of the input alone; retrying with the same
/// input fails the same way. Store outages are reported by the store layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Stored or supplied data is not a legal value (negative price, slug with
    /// spaces, unknown sort token).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A programmatic request parameter is out of range (page size ≤ 0).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The named kind of record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    /// Whether the caller, not the data, is at fault.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
