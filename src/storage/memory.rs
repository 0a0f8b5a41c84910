//! In-memory storage backend
//!
//! Used when the database is disabled and by tests. Contents are lost on
//! restart. The rate limit log and audit events are ring buffers holding the
//! most recent `capacity` entries.

use crate::config::default_memory_log_capacity;
use crate::core::audit::{AuditEvent, AuditSink, StoredAuditEvent};
use crate::core::rate_limiter::{
    CounterStore, CounterUpdate, NewLogEntry, RateLimitCounter, RateLimitLogEntry,
    RateLimitLogStore,
};
use crate::utils::error::{PortalError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use std::collections::VecDeque;

/// Bounded append-only buffer with monotonically increasing ids
#[derive(Debug)]
struct Ring<T> {
    entries: VecDeque<T>,
    next_id: i64,
}

impl<T> Ring<T> {
    fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Push the entry built from the next id, evicting the oldest past `capacity`
    fn push_with(&mut self, capacity: usize, build: impl FnOnce(i64) -> T) {
        let id = self.next_id;
        self.next_id += 1;
        while self.entries.len() >= capacity.max(1) {
            self.entries.pop_front();
        }
        self.entries.push_back(build(id));
    }
}

/// Process-local store for counters, the rate limit log and audit events
#[derive(Debug)]
pub struct MemoryStore {
    counters: DashMap<(String, String), RateLimitCounter>,
    logs: RwLock<Ring<RateLimitLogEntry>>,
    audit_events: RwLock<Ring<StoredAuditEvent>>,
    capacity: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_capacity(default_memory_log_capacity())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` log entries and `capacity` audit events
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counters: DashMap::new(),
            logs: RwLock::new(Ring::new()),
            audit_events: RwLock::new(Ring::new()),
            capacity,
        }
    }

    pub fn counter_count(&self) -> usize {
        self.counters.len()
    }

    pub fn log_len(&self) -> usize {
        self.logs.read().entries.len()
    }
}

fn key(identifier: &str, endpoint: &str) -> (String, String) {
    (identifier.to_string(), endpoint.to_string())
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn get(&self, identifier: &str, endpoint: &str) -> Result<Option<RateLimitCounter>> {
        Ok(self
            .counters
            .get(&key(identifier, endpoint))
            .map(|c| c.value().clone()))
    }

    async fn create(
        &self,
        identifier: &str,
        endpoint: &str,
        initial_count: i32,
        reset_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<RateLimitCounter> {
        match self.counters.entry(key(identifier, endpoint)) {
            Entry::Occupied(_) => Err(PortalError::storage(format!(
                "Counter {}/{} already exists",
                identifier, endpoint
            ))),
            Entry::Vacant(slot) => {
                let counter = RateLimitCounter {
                    identifier: identifier.to_string(),
                    endpoint: endpoint.to_string(),
                    request_count: initial_count,
                    window_reset_at: reset_at,
                    is_over_threshold: false,
                    last_alert_sent_at: None,
                    alert_count: 0,
                    updated_at: now,
                };
                slot.insert(counter.clone());
                Ok(counter)
            }
        }
    }

    async fn update(&self, identifier: &str, endpoint: &str, update: CounterUpdate) -> Result<()> {
        if let Some(mut counter) = self.counters.get_mut(&key(identifier, endpoint)) {
            let updated_at = update.updated_at.unwrap_or_else(Utc::now);
            update.apply_to(counter.value_mut());
            counter.updated_at = updated_at;
        }
        Ok(())
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64> {
        let initial = self.counters.len();
        self.counters.retain(|_, c| c.window_reset_at >= before);
        Ok(initial.saturating_sub(self.counters.len()) as u64)
    }
}

#[async_trait]
impl RateLimitLogStore for MemoryStore {
    async fn append(&self, entry: NewLogEntry) -> Result<()> {
        self.logs.write().push_with(self.capacity, |id| RateLimitLogEntry {
            id,
            identifier: entry.identifier,
            endpoint: entry.endpoint,
            action: entry.action,
            global_count: entry.global_count,
            ip_count: entry.ip_count,
            user_agent: entry.user_agent,
            country: entry.country,
            created_at: entry.created_at,
        });
        Ok(())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<RateLimitLogEntry>> {
        let logs = self.logs.read();
        Ok(logs
            .entries
            .iter()
            .rev()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuditSink for MemoryStore {
    async fn record(&self, event: AuditEvent) -> Result<()> {
        self.audit_events
            .write()
            .push_with(self.capacity, |id| StoredAuditEvent {
                id,
                event: event.event,
                log: event.log,
                user_id: event.user_id,
                created_at: Utc::now(),
            });
        Ok(())
    }

    async fn events_named(&self, event: &str) -> Result<Vec<StoredAuditEvent>> {
        Ok(self
            .audit_events
            .read()
            .entries
            .iter()
            .filter(|e| e.event == event)
            .cloned()
            .collect())
    }
}
