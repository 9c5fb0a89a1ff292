//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::DucktasticClient;
use crate::config::StorefrontConfig;
use crate::content::ContentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything in it is read-only
/// after startup; per-customer state lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: DucktasticClient,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, api: DucktasticClient, content: ContentStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                content,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Ducktastic API client.
    #[must_use]
    pub fn api(&self) -> &DucktasticClient {
        &self.inner.api
    }

    /// Get a reference to the loaded markdown pages.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
