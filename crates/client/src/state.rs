//! Application state shared by everything that talks to the backend.

use std::sync::Arc;

use crate::api::ShopxApi;
use crate::cache::QueryCache;
use crate::config::ShopxConfig;
use crate::error::Result;
use crate::store::{KeyValueStorage, Store};
use crate::transport::{HttpTransport, MockFallback};

/// Transport stack used by [`AppState`].
pub type ClientTransport = MockFallback<HttpTransport>;

/// Application state built once at startup.
///
/// Cheaply cloneable via `Arc`. Owns the configuration, the store and the
/// API client; consumers receive it by injection.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopxConfig,
    api: ShopxApi<ClientTransport>,
}

impl AppState {
    /// Create the application state and restore persisted slices.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ShopxConfig, storage: impl KeyValueStorage + 'static) -> Result<Self> {
        let store = Store::new(storage);
        store.rehydrate();

        let http = HttpTransport::new(&config, store.clone())?;
        let transport = MockFallback::new(http, config.mock_fallback);
        let cache = QueryCache::new(config.cache_capacity, config.cache_ttl);
        let api = ShopxApi::new(transport, store, cache);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ShopxConfig {
        &self.inner.config
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ShopxApi<ClientTransport> {
        &self.inner.api
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        self.inner.api.store()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
