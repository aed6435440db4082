use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use storefront_catalog::{Category, FilterSpecification, PageWindow, Product, Slug, SortPolicy};
use storefront_core::{CategoryId, Entity, ProductId};

use super::{CatalogStore, StoreError};

/// Number of store round trips observed, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub count: u64,
    pub fetch: u64,
    pub lookup: u64,
}

/// In-memory catalog store for tests/dev.
///
/// Applies the domain predicate and comparator directly, so it is also the
/// reference behaviour other adapters are checked against.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<HashMap<ProductId, Product>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    unavailable: AtomicBool,
    count_calls: AtomicU64,
    fetch_calls: AtomicU64,
    lookup_calls: AtomicU64,
}

fn upsert<E: Entity>(records: &RwLock<HashMap<E::Id, E>>, record: E) -> Result<(), StoreError> {
    let mut map = records.write().map_err(|_| poisoned())?;
    map.insert(record.id(), record);
    Ok(())
}

fn keyed<E: Entity>(records: impl IntoIterator<Item = E>) -> RwLock<HashMap<E::Id, E>> {
    RwLock::new(records.into_iter().map(|r| (r.id(), r)).collect())
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(
        categories: impl IntoIterator<Item = Category>,
        products: impl IntoIterator<Item = Product>,
    ) -> Self {
        Self {
            products: keyed(products),
            categories: keyed(categories),
            ..Self::default()
        }
    }

    pub fn upsert_product(&self, product: Product) -> Result<(), StoreError> {
        upsert(&self.products, product)
    }

    pub fn remove_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.products.write().map_err(|_| poisoned())?.remove(&id))
    }

    pub fn upsert_category(&self, category: Category) -> Result<(), StoreError> {
        upsert(&self.categories, category)
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            count: self.count_calls.load(Ordering::SeqCst),
            fetch: self.fetch_calls.load(Ordering::SeqCst),
            lookup: self.lookup_calls.load(Ordering::SeqCst),
        }
    }

    fn check_available(&self, counter: &AtomicU64) -> Result<(), StoreError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".to_string()));
        }
        Ok(())
    }

    fn matching(&self, filter: &FilterSpecification) -> Result<Vec<Product>, StoreError> {
        let map = self.products.read().map_err(|_| poisoned())?;
        Ok(map.values().filter(|p| filter.matches(p)).cloned().collect())
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn count(&self, filter: &FilterSpecification) -> Result<u64, StoreError> {
        self.check_available(&self.count_calls)?;
        let map = self.products.read().map_err(|_| poisoned())?;
        Ok(map.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn fetch(
        &self,
        filter: &FilterSpecification,
        sort: SortPolicy,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Product>, StoreError> {
        self.check_available(&self.fetch_calls)?;
        let mut products = self.matching(filter)?;
        sort.sort(&mut products);
        let window = PageWindow { page: 1, offset, limit };
        Ok(window.slice(products))
    }

    async fn find_category_by_slug(&self, slug: &Slug) -> Result<Option<Category>, StoreError> {
        self.check_available(&self.lookup_calls)?;
        let map = self.categories.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|c| &c.slug == slug).cloned())
    }

    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        self.check_available(&self.lookup_calls)?;
        let map = self.categories.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.check_available(&self.lookup_calls)?;
        let map = self.products.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.check_available(&self.lookup_calls)?;
        let map = self.categories.read().map_err(|_| poisoned())?;
        let mut categories: Vec<_> = map.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use storefront_catalog::SortMode;
    use uuid::Uuid;

    fn category(id: i64, name: &str, slug: &str) -> Category {
        Category::new(CategoryId::new(id), name, slug.parse().unwrap())
    }

    fn product(n: u128, price: &str) -> Product {
        Product::new(
            ProductId::from_uuid(Uuid::from_u128(n)),
            format!("Product {n}"),
            price.parse().unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(n as i64),
        )
        .in_category(CategoryId::new(1))
    }

    fn store() -> InMemoryCatalogStore {
        InMemoryCatalogStore::with_catalog(
            [category(1, "Tecnologia", "tecnologia"), category(2, "Hogar", "hogar")],
            [
                product(1, "10"),
                product(2, "20"),
                product(3, "30").active(false),
                product(4, "40"),
            ],
        )
    }

    #[tokio::test]
    async fn count_matches_full_fetch() {
        let store = store();
        let filter = FilterSpecification::public();
        let count = store.count(&filter).await.unwrap();
        let all = store
            .fetch(&filter, SortPolicy::for_mode(SortMode::Newest), 0, None)
            .await
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(all.len() as u64, count);
    }

    #[tokio::test]
    async fn fetch_applies_sort_offset_and_limit() {
        let store = store();
        let page = store
            .fetch(
                &FilterSpecification::public(),
                SortPolicy::for_mode(SortMode::PriceDescending),
                1,
                Some(1),
            )
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, ProductId::from_uuid(Uuid::from_u128(2)));
    }

    #[tokio::test]
    async fn category_lookup_by_slug_and_id() {
        let store = store();
        let slug: Slug = "hogar".parse().unwrap();
        let found = store.find_category_by_slug(&slug).await.unwrap().unwrap();
        assert_eq!(found.id, CategoryId::new(2));
        assert!(store.find_category(CategoryId::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn categories_are_listed_by_name() {
        let names: Vec<_> = store()
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Hogar", "Tecnologia"]);
    }

    #[tokio::test]
    async fn find_product_ignores_active_flag() {
        let store = store();
        let inactive = store
            .find_product(ProductId::from_uuid(Uuid::from_u128(3)))
            .await
            .unwrap();
        assert!(inactive.is_some_and(|p| !p.is_active));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = store();
        store.set_unavailable(true);
        match store.count(&FilterSpecification::public()).await {
            Err(StoreError::Unavailable(_)) => {}
            other => panic!("Expected Unavailable, got {other:?}"),
        }
        assert!(store.list_categories().await.is_err());
        store.set_unavailable(false);
        assert!(store.list_categories().await.is_ok());
    }

    #[tokio::test]
    async fn writes_replace_and_remove_records() {
        let store = store();
        store.upsert_product(product(2, "25")).unwrap();
        let filter = FilterSpecification::public();
        assert_eq!(store.count(&filter).await.unwrap(), 3);
        let removed = store.remove_product(ProductId::from_uuid(Uuid::from_u128(2))).unwrap();
        assert!(removed.is_some_and(|p| p.price == "25".parse().unwrap()));
        assert_eq!(store.count(&filter).await.unwrap(), 2);
        store.upsert_category(category(3, "Juguetes", "juguetes")).unwrap();
        assert_eq!(store.list_categories().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn poisoned_lock_fails_writes_and_reads() {
        let store = std::sync::Arc::new(store());
        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.products.write().unwrap();
            panic!("poison the product map");
        })
        .join();

        match store.upsert_product(product(5, "50")) {
            Err(StoreError::Unavailable(_)) => {}
            other => panic!("Expected Unavailable, got {other:?}"),
        }
        assert!(store.remove_product(ProductId::from_uuid(Uuid::from_u128(1))).is_err());
        assert!(store.count(&FilterSpecification::public()).await.is_err());
        // The category map is untouched.
        assert!(store.upsert_category(category(3, "Juguetes", "juguetes")).is_ok());
    }

    #[tokio::test]
    async fn calls_are_counted_by_kind() {
        let store = store();
        let filter = FilterSpecification::public();
        store.count(&filter).await.unwrap();
        store.fetch(&filter, SortPolicy::search(), 0, None).await.unwrap();
        store.fetch(&filter, SortPolicy::search(), 0, Some(1)).await.unwrap();
        store.find_category(CategoryId::new(1)).await.unwrap();
        assert_eq!(store.calls(), StoreCalls { count: 1, fetch: 2, lookup: 1 });
    }
}
