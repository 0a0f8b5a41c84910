//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::rate_limiter::RateLimitGate;
use crate::storage::StorageLayer;
use std::sync::Arc;

/// HTTP server state shared across handlers and middleware
#[derive(Clone)]
pub struct AppState {
    /// Portal configuration (shared read-only)
    pub config: Arc<Config>,
    /// Global request gate
    pub gate: Arc<RateLimitGate>,
    /// Storage layer
    pub storage: Arc<StorageLayer>,
}

impl AppState {
    pub fn new(config: Config, gate: RateLimitGate, storage: StorageLayer) -> Self {
        Self {
            config: Arc::new(config),
            gate: Arc::new(gate),
            storage: Arc::new(storage),
        }
    }

    /// Get portal configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
