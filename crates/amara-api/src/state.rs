//! Application state.

use std::sync::Arc;

use amara_storage::StorageClient;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub storage: Arc<StorageClient>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let storage = StorageClient::from_env()?;

        Ok(Self {
            config,
            storage: Arc::new(storage),
        })
    }

    /// Create state with an existing storage client (used in tests).
    pub fn with_storage(config: ApiConfig, storage: StorageClient) -> Self {
        Self {
            config,
            storage: Arc::new(storage),
        }
    }
}
