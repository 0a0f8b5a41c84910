//! Configuration data models
//!
//! This module defines all configuration structures used throughout the portal.

#![allow(missing_docs)]

pub mod alerting;
pub mod logging;
pub mod portal;
pub mod rate_limit;
pub mod server;
pub mod storage;

pub use alerting::*;
pub use logging::*;
pub use portal::*;
pub use rate_limit::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_database_url() -> String {
    "sqlite://data/portal.db?mode=rwc".to_string()
}

pub fn default_memory_log_capacity() -> usize {
    10_000
}

pub fn default_limit() -> u32 {
    1000
}

/// One hour
pub fn default_window_secs() -> u64 {
    3600
}

pub fn default_alert_threshold() -> u32 {
    500
}

/// One hour
pub fn default_alert_cooldown_secs() -> u64 {
    3600
}

pub fn default_counter_key() -> String {
    "global".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_notification_timeout() -> u64 {
    10
}

pub fn default_true() -> bool {
    true
}
