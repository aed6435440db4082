use tracing::{debug, instrument, warn};

use storefront_catalog::{FilterSpecification, PageRequest, ResultSet, SortMode, SortPolicy};
use storefront_infra::{CatalogStore, StoreError};

use crate::error::QueryError;

/// Filters, ranks and pages products from a [`CatalogStore`].
///
/// Holds nothing but the store handle, so one engine can serve any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct CatalogQueryEngine<S> {
    store: S,
}

impl<S> CatalogQueryEngine<S>
where
    S: CatalogStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one listing query.
    ///
    /// Search filters ignore `sort` and use [`SortPolicy::search`]. A blank
    /// search returns an empty set without reaching the store.
    #[instrument(skip_all, fields(sort = %sort, page = page.page), err)]
    pub async fn query(
        &self,
        filter: &FilterSpecification,
        sort: SortMode,
        page: PageRequest,
    ) -> Result<ResultSet, QueryError> {
        let policy = if filter.is_search() {
            SortPolicy::search()
        } else {
            SortPolicy::for_mode(sort)
        };
        self.query_with_policy(filter, policy, page).await
    }

    /// [`CatalogQueryEngine::query`] with an explicit policy.
    pub async fn query_with_policy(
        &self,
        filter: &FilterSpecification,
        policy: SortPolicy,
        page: PageRequest,
    ) -> Result<ResultSet, QueryError> {
        let window = page.window()?;

        if filter.is_blank_search() {
            debug!("blank search; skipping store");
            return Ok(ResultSet::empty(&window));
        }

        let (total_count, items) = tokio::try_join!(
            self.store.count(filter),
            self.store.fetch(filter, policy, window.offset, window.limit),
        )
        .map_err(store_failure)?;

        debug!(
            policy = policy.name(),
            total_count,
            returned = items.len(),
            "catalog query served"
        );
        Ok(ResultSet::new(items, total_count, &window))
    }
}

pub(crate) fn store_failure(err: StoreError) -> QueryError {
    warn!(error = %err, "catalog store call failed");
    QueryError::StoreUnavailable(err)
}
