//! Counter and log persistence tests
//!
//! Exercise the SeaORM store against a migrated in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use crate::{assert_err, assert_ok};
    use chrono::{Duration, SubsecRound, Utc};
    use driver_portal::core::audit::{AuditEvent, AuditSink};
    use driver_portal::core::rate_limiter::{
        CounterStore, CounterUpdate, LogAction, NewLogEntry, RateLimitLogStore,
    };
    use driver_portal::storage::database::DatabaseBackendType;

    fn log_entry(action: LogAction, global_count: i32) -> NewLogEntry {
        NewLogEntry {
            identifier: "global".to_string(),
            endpoint: "/drivers".to_string(),
            action,
            global_count,
            ip_count: None,
            user_agent: Some("DriverApp/2.1".to_string()),
            country: Some("NL".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_database_health_check() {
        let db = TestDatabase::new().await;
        assert_eq!(db.db().backend_type(), DatabaseBackendType::SQLite);
        assert_ok!(db.db().health_check().await);
    }

    #[tokio::test]
    async fn test_migration_is_idempotent() {
        let db = TestDatabase::new().await;
        assert_ok!(db.db().migrate().await);
    }

    #[tokio::test]
    async fn test_counter_create_get_update() {
        let db = TestDatabase::new().await;
        let store = db.db();
        let reset_at = Utc::now().trunc_subsecs(0) + Duration::hours(1);

        assert!(assert_ok!(store.get("global", "global").await).is_none());

        let created = assert_ok!(
            store
                .create("global", "global", 0, reset_at, Utc::now())
                .await
        );
        assert_eq!(created.request_count, 0);
        assert_eq!(created.alert_count, 0);
        assert!(!created.is_over_threshold);
        assert!(created.last_alert_sent_at.is_none());

        let sent_at = Utc::now().trunc_subsecs(0);
        assert_ok!(
            store
                .update(
                    "global",
                    "global",
                    CounterUpdate {
                        request_count: Some(7),
                        is_over_threshold: Some(true),
                        last_alert_sent_at: Some(sent_at),
                        alert_count: Some(1),
                        ..Default::default()
                    },
                )
                .await
        );

        let loaded = assert_ok!(store.get("global", "global").await).unwrap();
        assert_eq!(loaded.request_count, 7);
        assert!(loaded.is_over_threshold);
        assert_eq!(loaded.alert_count, 1);
        assert_eq!(loaded.last_alert_sent_at, Some(sent_at));
        assert_eq!(loaded.window_reset_at, reset_at);
    }

    #[tokio::test]
    async fn test_counter_timestamps_come_from_caller() {
        let db = TestDatabase::new().await;
        let store = db.db();
        let created_at = Utc::now().trunc_subsecs(0) - Duration::days(2);
        let reset_at = created_at + Duration::hours(1);

        let created = assert_ok!(
            store
                .create("global", "global", 0, reset_at, created_at)
                .await
        );
        assert_eq!(created.updated_at, created_at);

        let touched_at = created_at + Duration::minutes(5);
        assert_ok!(
            store
                .update("global", "global", CounterUpdate::count(1).at(touched_at))
                .await
        );
        let loaded = assert_ok!(store.get("global", "global").await).unwrap();
        assert_eq!(loaded.updated_at, touched_at);
    }

    #[tokio::test]
    async fn test_counter_key_is_unique() {
        let db = TestDatabase::new().await;
        let store = db.db();
        let reset_at = Utc::now() + Duration::minutes(1);

        let now = Utc::now();
        assert_ok!(store.create("global", "global", 0, reset_at, now).await);
        let err = assert_err!(store.create("global", "global", 0, reset_at, now).await);
        assert!(err.is_storage_failure());

        // A different endpoint is a different key.
        assert_ok!(store.create("global", "/documents", 0, reset_at, now).await);
    }

    #[tokio::test]
    async fn test_update_missing_key_is_noop() {
        let db = TestDatabase::new().await;
        assert_ok!(
            db.db()
                .update("global", "global", CounterUpdate::count(3))
                .await
        );
        assert!(assert_ok!(db.db().get("global", "global").await).is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_only_removes_old_windows() {
        let db = TestDatabase::new().await;
        let store = db.db();
        let now = Utc::now();

        assert_ok!(
            store
                .create("stale", "global", 3, now - Duration::hours(2), now)
                .await
        );
        assert_ok!(
            store
                .create("live", "global", 3, now + Duration::hours(1), now)
                .await
        );

        let removed = assert_ok!(store.delete_expired(now - Duration::hours(1)).await);
        assert_eq!(removed, 1);
        assert!(assert_ok!(store.get("stale", "global").await).is_none());
        assert!(assert_ok!(store.get("live", "global").await).is_some());
    }

    #[tokio::test]
    async fn test_log_entries_round_trip_newest_first() {
        let db = TestDatabase::new().await;
        let store = db.db();

        assert_ok!(store.append(log_entry(LogAction::Allowed, 1)).await);
        assert_ok!(store.append(log_entry(LogAction::Allowed, 2)).await);
        assert_ok!(store.append(log_entry(LogAction::BlockedGlobal, 3)).await);

        let recent = assert_ok!(store.recent(2).await);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].action, LogAction::BlockedGlobal);
        assert_eq!(recent[0].global_count, 3);
        assert_eq!(recent[1].global_count, 2);
        assert_eq!(recent[0].country.as_deref(), Some("NL"));
        assert_eq!(recent[0].user_agent.as_deref(), Some("DriverApp/2.1"));
        assert!(recent[0].ip_count.is_none());
    }

    #[tokio::test]
    async fn test_audit_events_are_stored_as_json() {
        let db = TestDatabase::new().await;
        let store = db.db();

        assert_ok!(
            store
                .record(AuditEvent::system(
                    "rate_limit_threshold_exceeded",
                    serde_json::json!({ "currentCount": 3, "percentage": "60.0%" }),
                ))
                .await
        );
        assert_ok!(
            store
                .record(AuditEvent::system("other", serde_json::json!({})))
                .await
        );

        let events = assert_ok!(store.events_named("rate_limit_threshold_exceeded").await);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].log["currentCount"], 3);
        assert_eq!(events[0].log["percentage"], "60.0%");
        assert!(events[0].user_id.is_none());
    }
}
