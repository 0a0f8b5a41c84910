//! Persistence contracts used by the request gate

use super::types::{CounterUpdate, NewLogEntry, RateLimitCounter, RateLimitLogEntry};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Counter persistence. Pure data access, no admission logic.
#[async_trait]
pub trait CounterStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, identifier: &str, endpoint: &str) -> Result<Option<RateLimitCounter>>;

    /// Insert a counter whose timestamps are set to `now`
    async fn create(
        &self,
        identifier: &str,
        endpoint: &str,
        initial_count: i32,
        reset_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<RateLimitCounter>;

    /// Apply a partial update. Updating a missing key is a no-op.
    async fn update(&self, identifier: &str, endpoint: &str, update: CounterUpdate) -> Result<()>;

    /// Delete counters whose window ended before `before`; returns rows removed
    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64>;
}

/// Append-only rate limit log
#[async_trait]
pub trait RateLimitLogStore: Send + Sync + std::fmt::Debug {
    async fn append(&self, entry: NewLogEntry) -> Result<()>;

    /// Most recent entries, newest first
    async fn recent(&self, limit: u64) -> Result<Vec<RateLimitLogEntry>>;
}
