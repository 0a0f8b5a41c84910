//! Storage layer for the portal
//!
//! This module provides persistence for rate limit counters, the rate limit
//! log and audit events, backed by a SQL database or process memory.

/// Database storage module
pub mod database;
/// In-memory storage module
pub mod memory;

use crate::config::StorageConfig;
use crate::core::audit::AuditSink;
use crate::core::rate_limiter::{CounterStore, RateLimitLogStore};
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage handles shared by the gate and the alert notifier
#[derive(Debug, Clone)]
pub struct StorageLayer {
    /// Database connection pool, absent when running in memory
    pub database: Option<Arc<database::Database>>,
    pub counters: Arc<dyn CounterStore>,
    pub logs: Arc<dyn RateLimitLogStore>,
    pub audit: Arc<dyn AuditSink>,
}

/// Storage health summary
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageHealthStatus {
    pub backend: &'static str,
    pub healthy: bool,
}

impl StorageLayer {
    /// Create a new storage layer
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("Initializing storage layer");

        if !config.database.enabled {
            warn!(
                "Database disabled, rate limit state is kept in memory (last {} log entries)",
                config.memory.log_capacity
            );
            return Ok(Self::from_memory(Arc::new(memory::MemoryStore::with_capacity(
                config.memory.log_capacity,
            ))));
        }

        debug!("Connecting to database");
        let database = database::Database::new(&config.database).await?;
        if config.database.auto_migrate {
            database.migrate().await?;
        }

        info!("Storage layer initialized successfully");
        Ok(Self::from_database(Arc::new(database)))
    }

    /// Storage backed by a connected database
    pub fn from_database(database: Arc<database::Database>) -> Self {
        Self {
            counters: database.clone(),
            logs: database.clone(),
            audit: database.clone(),
            database: Some(database),
        }
    }

    /// Storage kept in process memory
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(memory::MemoryStore::new()))
    }

    /// Storage kept in the given memory store
    pub fn from_memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            database: None,
            counters: store.clone(),
            logs: store.clone(),
            audit: store,
        }
    }

    /// Health check for the storage backend
    pub async fn health_check(&self) -> StorageHealthStatus {
        match &self.database {
            Some(db) => {
                let healthy = match db.health_check().await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Database health check failed: {}", e);
                        false
                    }
                };
                StorageHealthStatus {
                    backend: "database",
                    healthy,
                }
            }
            None => StorageHealthStatus {
                backend: "memory",
                healthy: true,
            },
        }
    }

    /// Get database pool
    pub fn db(&self) -> Option<&database::Database> {
        self.database.as_deref()
    }
}
