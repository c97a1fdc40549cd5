use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::oracle::{HttpIdentityOracle, IdentityOracle};
use crate::services::store::{ContentStore, HttpContentStore};

/// The application's state.
///
/// Collaborator clients are process-lifetime singletons: built once here and
/// shared by every request through `Arc`. Nothing else is shared between
/// requests — the playback session lives entirely in the signed cookie.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The identity & entitlement oracle.
    pub oracle: Arc<dyn IdentityOracle>,
    /// The upstream content store.
    pub store: Arc<dyn ContentStore>,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client init failed: {}", e)))?;

        let oracle = Arc::new(HttpIdentityOracle::new(
            client.clone(),
            config.identity_oracle_url.clone(),
        ));
        tracing::info!(
            "✅ Identity oracle client initialized: {}",
            config.identity_oracle_url
        );

        let store = Arc::new(HttpContentStore::new(
            client,
            config.content_store_url.clone(),
            config.content_store_token.clone(),
        ));
        tracing::info!(
            "✅ Content store client initialized: {}",
            config.content_store_url
        );

        Ok(AppState {
            config: config.clone(),
            oracle,
            store,
        })
    }

    /// Builds a state around externally supplied collaborators.
    ///
    /// Used by tests to substitute the oracle and store.
    pub fn with_collaborators(
        config: Config,
        oracle: Arc<dyn IdentityOracle>,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            config,
            oracle,
            store,
        }
    }
}
