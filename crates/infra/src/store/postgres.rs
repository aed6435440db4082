//! Postgres-backed catalog store.
//!
//! Reads the `products` and `categories` tables (see
//! `migrations/0001_catalog.sql`). Filters are bound as parameters using the
//! `($n IS NULL OR ...)` form so every request runs one fixed statement shape;
//! only the `ORDER BY` clause varies, and it is generated from the
//! [`SortPolicy`] keys rather than from caller input.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | ColumnDecode / Decode / ColumnNotFound | `Decode` |
//! | anything else (pool timeout, IO, database) | `Unavailable` |

use std::time::Duration;

use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use storefront_catalog::{Category, FilterSpecification, Price, Product, Slug, SortPolicy};
use storefront_core::{CategoryId, ProductId};

use super::{CatalogStore, StoreError};
use crate::config::StoreConfig;

const PRODUCT_COLUMNS: &str = "id, name, variant, price, description, category_id, images, \
     buy_link, featured, is_pinned, is_active, created_at, updated_at";

const PRODUCT_FILTER: &str = r#"
    WHERE ($1::bool IS NOT TRUE OR is_active = TRUE)
        AND ($2::int8 IS NULL OR category_id = $2)
        AND ($3::numeric IS NULL OR price >= $3)
        AND ($4::numeric IS NULL OR price <= $4)
        AND ($5::uuid IS NULL OR id <> $5)
        AND ($6::text IS NULL
            OR name ILIKE $6
            OR COALESCE(variant, '') ILIKE $6
            OR COALESCE(description, '') ILIKE $6)
        AND NOT $7::bool
"#;

/// Postgres catalog store.
///
/// `PgPool` is internally reference counted; cloning the store shares the pool.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized and timed out according to `config`.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .connect(&config.database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Bind values for [`PRODUCT_FILTER`], in placeholder order.
#[derive(Debug, Clone, PartialEq)]
struct FilterBinds {
    active_only: bool,
    category_id: Option<i64>,
    price_min: Option<Decimal>,
    price_max: Option<Decimal>,
    exclude_id: Option<Uuid>,
    like_pattern: Option<String>,
    blank_search: bool,
}

impl FilterBinds {
    fn from_filter(filter: &FilterSpecification) -> Self {
        Self {
            active_only: filter.active_only,
            category_id: filter.category_id.map(|id| id.get()),
            price_min: filter.price_min.map(|p| p.amount()),
            price_max: filter.price_max.map(|p| p.amount()),
            exclude_id: filter.exclude_id.map(|id| *id.as_uuid()),
            like_pattern: filter.search_query().map(|q| q.like_pattern()),
            blank_search: filter.is_blank_search(),
        }
    }
}

macro_rules! bind_filter {
    ($query:expr, $binds:expr) => {
        $query
            .bind($binds.active_only)
            .bind($binds.category_id)
            .bind($binds.price_min)
            .bind($binds.price_max)
            .bind($binds.exclude_id)
            .bind($binds.like_pattern.as_deref())
            .bind($binds.blank_search)
    };
}

fn order_by_clause(sort: SortPolicy) -> String {
    let keys: Vec<String> = sort
        .keys()
        .iter()
        .map(|key| format!("{} {}", key.field.column(), key.direction.as_sql()))
        .collect();
    format!("ORDER BY {}", keys.join(", "))
}

fn count_sql() -> String {
    format!("SELECT COUNT(*) AS total FROM products {PRODUCT_FILTER}")
}

/// `LIMIT NULL` means no limit in Postgres.
fn fetch_sql(sort: SortPolicy) -> String {
    format!(
        "SELECT {PRODUCT_COLUMNS} FROM products {PRODUCT_FILTER} {} LIMIT $8 OFFSET $9",
        order_by_clause(sort)
    )
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_product", e);

    let price: Decimal = row.try_get("price").map_err(decode)?;
    let price = Price::new(price).map_err(|e| StoreError::Decode(e.to_string()))?;

    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        variant: row.try_get("variant").map_err(decode)?,
        price,
        description: row.try_get("description").map_err(decode)?,
        category_id: row
            .try_get::<Option<i64>, _>("category_id")
            .map_err(decode)?
            .map(CategoryId::new),
        images: row
            .try_get::<Option<Vec<String>>, _>("images")
            .map_err(decode)?
            .unwrap_or_default(),
        buy_link: row.try_get("buy_link").map_err(decode)?,
        featured: row
            .try_get::<Option<bool>, _>("featured")
            .map_err(decode)?
            .unwrap_or(false),
        is_pinned: row
            .try_get::<Option<bool>, _>("is_pinned")
            .map_err(decode)?
            .unwrap_or(false),
        is_active: row
            .try_get::<Option<bool>, _>("is_active")
            .map_err(decode)?
            .unwrap_or(true),
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn category_from_row(row: &PgRow) -> Result<Category, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_category", e);

    let slug: String = row.try_get("slug").map_err(decode)?;
    let slug: Slug = slug
        .parse()
        .map_err(|e: storefront_core::DomainError| StoreError::Decode(e.to_string()))?;

    Ok(Category {
        id: CategoryId::new(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        slug,
        created_at: row.try_get("created_at").map_err(decode)?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            StoreError::Decode(format!("{operation}: {err}"))
        }
        sqlx::Error::PoolTimedOut => {
            tracing::warn!(operation, "catalog store pool timed out");
            StoreError::Unavailable(format!("connection pool timed out in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        _ => {
            tracing::warn!(operation, error = %err, "catalog store query failed");
            StoreError::Unavailable(format!("sqlx error in {operation}: {err}"))
        }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self, filter), err)]
    async fn count(&self, filter: &FilterSpecification) -> Result<u64, StoreError> {
        let binds = FilterBinds::from_filter(filter);
        let sql = count_sql();
        let row = bind_filter!(sqlx::query(&sql), binds)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_products", e))?;
        let total: i64 = row
            .try_get("total")
            .map_err(|e| map_sqlx_error("count_products", e))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    #[instrument(skip(self, filter, sort), fields(sort = sort.name()), err)]
    async fn fetch(
        &self,
        filter: &FilterSpecification,
        sort: SortPolicy,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Product>, StoreError> {
        let binds = FilterBinds::from_filter(filter);
        let sql = fetch_sql(sort);
        let rows = bind_filter!(sqlx::query(&sql), binds)
            .bind(limit.map(to_i64))
            .bind(to_i64(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch_products", e))?;
        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self, slug), fields(slug = %slug), err)]
    async fn find_category_by_slug(&self, slug: &Slug) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query("SELECT id, name, slug, created_at FROM categories WHERE slug = $1")
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_category_by_slug", e))?;
        row.as_ref().map(category_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query("SELECT id, name, slug, created_at FROM categories WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_category", e))?;
        row.as_ref().map(category_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, name, slug, created_at FROM categories ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_categories", e))?;
        rows.iter().map(category_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_catalog::{PriceRange, SortMode};

    #[test]
    fn order_by_follows_policy_keys() {
        assert_eq!(
            order_by_clause(SortPolicy::for_mode(SortMode::Relevance)),
            "ORDER BY is_pinned DESC, featured DESC, created_at DESC, id ASC"
        );
        assert_eq!(
            order_by_clause(SortPolicy::for_mode(SortMode::PriceAscending)),
            "ORDER BY is_pinned DESC, price ASC, id ASC"
        );
    }

    #[test]
    fn fetch_sql_binds_limit_and_offset_after_filter() {
        let sql = fetch_sql(SortPolicy::search());
        assert!(sql.starts_with("SELECT id, name, variant, price"));
        assert!(sql.contains("FROM products"));
        assert!(sql.ends_with("LIMIT $8 OFFSET $9"));
    }

    #[test]
    fn count_sql_shares_the_filter() {
        assert!(count_sql().contains(PRODUCT_FILTER));
        assert!(fetch_sql(SortPolicy::search()).contains(PRODUCT_FILTER));
    }

    #[test]
    fn binds_mirror_the_filter() {
        let filter = FilterSpecification::public()
            .in_category(CategoryId::new(3))
            .with_price_range(PriceRange::parse_lenient(Some("60"), Some("oops")))
            .with_search(" 50%off ");
        let binds = FilterBinds::from_filter(&filter);
        assert!(binds.active_only);
        assert_eq!(binds.category_id, Some(3));
        assert_eq!(binds.price_min, Some(Decimal::new(60, 0)));
        assert_eq!(binds.price_max, None);
        assert_eq!(binds.like_pattern.as_deref(), Some("%50\\%off%"));
        assert!(!binds.blank_search);
    }

    #[test]
    fn blank_search_binds_match_nothing_flag() {
        let binds = FilterBinds::from_filter(&FilterSpecification::public().with_search("  "));
        assert_eq!(binds.like_pattern, None);
        assert!(binds.blank_search);
    }

    #[test]
    fn large_offsets_saturate() {
        assert_eq!(to_i64(u64::MAX), i64::MAX);
        assert_eq!(to_i64(48), 48);
    }
}
