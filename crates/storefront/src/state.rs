//! Application state shared across handlers.

use std::sync::Arc;

use focaccia_plus_core::Product;

use crate::cache::CatalogCache;
use crate::config::{ConfigError, StorefrontConfig};
use crate::supabase::{SupabaseClient, SupabaseError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers access to the configuration,
/// the Supabase client, and the catalog snapshot cache. The per-visitor
/// cart lives in the session, not here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    supabase: SupabaseClient,
    catalog_cache: CatalogCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Supabase client cannot be constructed from
    /// the configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self, ConfigError> {
        let supabase = SupabaseClient::new(&config.supabase)?;
        let catalog_cache = CatalogCache::new(config.catalog_cache_path.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                supabase,
                catalog_cache,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Supabase client.
    #[must_use]
    pub fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    /// Get a reference to the catalog snapshot cache.
    #[must_use]
    pub fn catalog_cache(&self) -> &CatalogCache {
        &self.inner.catalog_cache
    }

    /// The catalog: a fresh snapshot if one exists, otherwise a live fetch
    /// (which refreshes the snapshot).
    ///
    /// # Errors
    ///
    /// Propagates [`SupabaseError`] from the live fetch.
    pub async fn catalog(&self) -> Result<Vec<Product>, SupabaseError> {
        if let Some(products) = self.catalog_cache().read() {
            return Ok(products);
        }

        let products = self.supabase().fetch_catalog().await?;
        self.catalog_cache().write(&products);
        Ok(products)
    }
}
