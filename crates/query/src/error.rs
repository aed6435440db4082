use thiserror::Error;

use storefront_core::DomainError;
use storefront_infra::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A referenced category or product does not exist (or is not public).
    #[error("not found")]
    NotFound,

    /// Malformed request parameters supplied programmatically.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The store failed; propagated unchanged, never retried here.
    #[error("catalog store unavailable: {0}")]
    StoreUnavailable(StoreError),
}

impl QueryError {
    /// Whether presentation code should render this as "no results".
    ///
    /// `InvalidArgument` is a caller bug and is the only error that should
    /// surface as such.
    pub fn is_empty_state(&self) -> bool {
        !matches!(self, QueryError::InvalidArgument(_))
    }
}

impl From<StoreError> for QueryError {
    fn from(value: StoreError) -> Self {
        QueryError::StoreUnavailable(value)
    }
}

impl From<DomainError> for QueryError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidArgument(msg) | DomainError::Validation(msg) => {
                QueryError::InvalidArgument(msg)
            }
            // A malformed id can't name anything that exists.
            DomainError::InvalidId(_) | DomainError::NotFound(_) => QueryError::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_argument_is_a_hard_failure() {
        assert!(QueryError::NotFound.is_empty_state());
        assert!(QueryError::StoreUnavailable(StoreError::Unavailable("down".into())).is_empty_state());
        assert!(!QueryError::InvalidArgument("page_size".into()).is_empty_state());
    }

    #[test]
    fn domain_errors_map_onto_query_errors() {
        assert_eq!(
            QueryError::from(DomainError::invalid_argument("page_size must be positive")),
            QueryError::InvalidArgument("page_size must be positive".into())
        );
        assert_eq!(QueryError::from(DomainError::invalid_id("ProductId: bad")), QueryError::NotFound);
        assert_eq!(QueryError::from(DomainError::not_found("product")), QueryError::NotFound);
    }
}
