//! Storage configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// In-memory backend limits, used when the database is disabled
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl StorageConfig {
    /// Merge storage configurations
    pub fn merge(mut self, other: Self) -> Self {
        self.database = self.database.merge(other.database);
        self.memory = self.memory.merge(other.memory);
        self
    }
}

/// In-memory storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Most recent rate limit log entries and audit events kept; older ones are dropped
    #[serde(default = "default_memory_log_capacity")]
    pub log_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_memory_log_capacity(),
        }
    }
}

impl MemoryConfig {
    pub fn merge(mut self, other: Self) -> Self {
        if other.log_capacity != default_memory_log_capacity() {
            self.log_capacity = other.log_capacity;
        }
        self
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Enable database (if false, counters and audit events live in memory)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Run migrations on startup
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
            enabled: true,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Merge database configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.url.is_empty() && other.url != default_database_url() {
            self.url = other.url;
        }
        if other.max_connections != default_max_connections() {
            self.max_connections = other.max_connections;
        }
        if other.connection_timeout != default_connection_timeout() {
            self.connection_timeout = other.connection_timeout;
        }
        if !other.enabled {
            self.enabled = false;
        }
        if !other.auto_migrate {
            self.auto_migrate = false;
        }
        self
    }

    /// In-memory SQLite config, one connection
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}
