//! Test database utilities
//!
//! Provides in-memory SQLite databases for testing without external
//! dependencies. Each test gets an isolated database instance using SeaORM.

use chrono::{Duration, SubsecRound, Utc};
use driver_portal::config::DatabaseConfig;
use driver_portal::core::rate_limiter::{GateSettings, RateLimitGate};
use driver_portal::monitoring::alerts::AlertNotifier;
use driver_portal::storage::database::Database;
use driver_portal::utils::clock::ManualClock;
use std::sync::Arc;

/// Helper to create a simple test database config
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // In-memory DB only supports 1 connection
        max_connections: 1,
        connection_timeout: 5,
        enabled: true,
        auto_migrate: true,
    }
}

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<Database>,
}

impl TestDatabase {
    /// Create a new migrated in-memory test database
    pub async fn new() -> Self {
        let db = Database::new(&test_db_config())
            .await
            .expect("Failed to create in-memory test database");

        db.migrate()
            .await
            .expect("Failed to run database migrations");

        Self {
            inner: Arc::new(db),
        }
    }

    /// Get reference to the underlying database
    pub fn db(&self) -> &Database {
        &self.inner
    }

    /// Get Arc to the underlying database
    pub fn db_arc(&self) -> Arc<Database> {
        Arc::clone(&self.inner)
    }
}

/// A gate persisted in SQLite and driven by a manual clock
pub struct GateHarness {
    pub gate: Arc<RateLimitGate>,
    pub db: TestDatabase,
    pub clock: Arc<ManualClock>,
}

impl GateHarness {
    pub async fn new(limit: u32, window_ms: i64, threshold: u32, cooldown_ms: i64) -> Self {
        let db = TestDatabase::new().await;
        // Whole seconds keep timestamps exact across the SQLite round trip.
        let clock = Arc::new(ManualClock::new(Utc::now().trunc_subsecs(0)));
        let notifier = Arc::new(AlertNotifier::new(db.db_arc(), Vec::new()));
        let settings = GateSettings {
            limit,
            window: Duration::milliseconds(window_ms),
            alert_threshold: threshold,
            alert_cooldown: Duration::milliseconds(cooldown_ms),
            identifier: "global".to_string(),
            endpoint: "global".to_string(),
            stale_after: Duration::milliseconds(window_ms),
        };
        let gate = RateLimitGate::new(settings, db.db_arc(), db.db_arc(), notifier)
            .with_clock(clock.clone());

        Self {
            gate: Arc::new(gate),
            db,
            clock,
        }
    }
}
