//! Composition root.
//!
//! [`Hub`] owns the storage handle and the token issuer for the lifetime of
//! the process; the HTTP layer and the CLI receive clones of it.

use anyhow::{Context, Result};

use crate::{
    auth::TokenIssuer,
    config::{Backend, HubConfig},
    store::Store,
};

#[derive(Clone)]
pub struct Hub {
    store: Store,
    tokens: TokenIssuer,
}

impl Hub {
    pub fn new(store: Store, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// Opens the configured backend.
    pub async fn connect(config: &HubConfig) -> Result<Self> {
        let store = match config.storage.backend {
            Backend::Redis => Store::connect(&config.storage.url, config.storage.prefix.clone())
                .await
                .context("Failed to connect to Redis")?,
            Backend::Memory => Store::memory(),
        };
        log::info!("storage backend: {}", store.backend_name());
        let tokens = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_days);
        Ok(Self::new(store, tokens))
    }

    /// In-memory hub, mostly for tests and local runs.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self::new(Store::memory(), TokenIssuer::new(jwt_secret, 30))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}
