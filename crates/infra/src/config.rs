//! Store configuration loading and representation.

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

/// Connection settings for [`crate::PostgresCatalogStore`].
///
/// The acquire timeout is the only timeout policy in the query path; the
/// engine itself never times out or retries.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_acquire_timeout_ms() -> u64 {
    DEFAULT_ACQUIRE_TIMEOUT_MS
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_ms: DEFAULT_ACQUIRE_TIMEOUT_MS,
        }
    }

    /// Read `DATABASE_URL` (required), `STOREFRONT_DB_MAX_CONNECTIONS` and
    /// `STOREFRONT_DB_ACQUIRE_TIMEOUT_MS` from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let mut config = Self::new(database_url);

        if let Some(raw) = lookup("STOREFRONT_DB_MAX_CONNECTIONS") {
            config.max_connections = raw
                .trim()
                .parse()
                .with_context(|| format!("STOREFRONT_DB_MAX_CONNECTIONS is not a number: {raw:?}"))?;
        }
        if let Some(raw) = lookup("STOREFRONT_DB_ACQUIRE_TIMEOUT_MS") {
            config.acquire_timeout_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("STOREFRONT_DB_ACQUIRE_TIMEOUT_MS is not a number: {raw:?}"))?;
        }
        Ok(config)
    }
}

// The URL usually embeds credentials.
impl core::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database_url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_ms", &self.acquire_timeout_ms)
            .finish()
    }
}
