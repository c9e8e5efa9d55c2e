//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{RepositoryError, SeedData, Store};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`; every clone sees the same
/// repositories.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    store: Store,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the seed repeats identifiers.
    pub fn new(config: AppConfig, seed: SeedData) -> Result<Self, RepositoryError> {
        let store = Store::from_seed(seed)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, store }),
        })
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the repositories.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }
}
