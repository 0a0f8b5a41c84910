//! Request gate tests on SQLite

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::GateHarness;
    use chrono::Duration;
    use driver_portal::core::audit::AuditSink;
    use driver_portal::core::rate_limiter::{
        CounterStore, LogAction, RATE_LIMIT_EXCEEDED, RateLimitLogStore, RequestInfo, Verdict,
    };
    use driver_portal::monitoring::alerts::THRESHOLD_EXCEEDED_EVENT;
    use driver_portal::utils::clock::Clock;

    fn request() -> RequestInfo {
        RequestInfo::new("/drivers").with_country("NL")
    }

    async fn alerts(h: &GateHarness) -> usize {
        assert_ok!(h.db.db().events_named(THRESHOLD_EXCEEDED_EVENT).await).len()
    }

    /// limit 5, window 1s, threshold 3, cooldown 2s
    #[tokio::test]
    async fn test_small_window_scenario() {
        let h = GateHarness::new(5, 1_000, 3, 2_000).await;

        for expected in 1..=5 {
            let verdict = assert_ok!(h.gate.check(&request()).await);
            assert_eq!(verdict, Verdict::Allowed { count: expected });
        }
        // Third request crossed the threshold; the next two stayed quiet.
        assert_eq!(alerts(&h).await, 1);

        h.clock.advance(Duration::milliseconds(400));
        let verdict = assert_ok!(h.gate.check(&request()).await);
        assert_eq!(
            verdict,
            Verdict::Blocked {
                retry_after: 1,
                reason: RATE_LIMIT_EXCEEDED
            }
        );

        let counter = assert_ok!(h.db.db().get("global", "global").await).unwrap();
        assert_eq!(counter.request_count, 5);
        assert!(counter.is_over_threshold);
        assert_eq!(counter.alert_count, 1);

        // Next window starts from zero and may alert again.
        h.clock.advance(Duration::milliseconds(700));
        for expected in 1..=3 {
            let verdict = assert_ok!(h.gate.check(&request()).await);
            assert_eq!(verdict, Verdict::Allowed { count: expected });
        }
        assert_eq!(alerts(&h).await, 2);

        let counter = assert_ok!(h.db.db().get("global", "global").await).unwrap();
        assert_eq!(counter.request_count, 3);
        assert_eq!(counter.alert_count, 2);
        assert_eq!(
            counter.window_reset_at,
            h.clock.now() + Duration::milliseconds(1_000)
        );
    }

    #[tokio::test]
    async fn test_every_decision_is_logged() {
        let h = GateHarness::new(2, 60_000, 2, 60_000).await;
        for _ in 0..4 {
            assert_ok!(h.gate.check(&request()).await);
        }

        let logs = assert_ok!(h.db.db().recent(10).await);
        assert_eq!(logs.len(), 4);
        let actions: Vec<LogAction> = logs.iter().rev().map(|l| l.action).collect();
        assert_eq!(
            actions,
            vec![
                LogAction::Allowed,
                LogAction::Allowed,
                LogAction::BlockedGlobal,
                LogAction::BlockedGlobal
            ]
        );
        assert!(logs.iter().all(|l| l.country.as_deref() == Some("NL")));
        assert!(
            logs.iter()
                .filter(|l| l.action == LogAction::BlockedGlobal)
                .all(|l| l.global_count == 3)
        );
    }

    #[tokio::test]
    async fn test_repeat_alert_needs_cooldown_to_pass() {
        let h = GateHarness::new(100, 60_000, 2, 2_000).await;
        assert_ok!(h.gate.check(&request()).await);
        assert_ok!(h.gate.check(&request()).await);
        assert_eq!(alerts(&h).await, 1);

        h.clock.advance(Duration::milliseconds(1_000));
        assert_ok!(h.gate.check(&request()).await);
        assert_eq!(alerts(&h).await, 1);

        h.clock.advance(Duration::milliseconds(1_500));
        assert_ok!(h.gate.check(&request()).await);
        assert_eq!(alerts(&h).await, 2);

        let counter = assert_ok!(h.db.db().get("global", "global").await).unwrap();
        assert_eq!(counter.alert_count, 2);
        assert_eq!(counter.last_alert_sent_at, Some(h.clock.now()));
    }

    #[tokio::test]
    async fn test_stale_counter_is_collected_and_recreated() {
        let h = GateHarness::new(5, 1_000, 5, 60_000).await;
        assert_ok!(h.gate.check(&request()).await);
        assert_ok!(h.gate.check(&request()).await);

        h.clock.advance(Duration::seconds(10));
        let verdict = assert_ok!(h.gate.check(&request()).await);
        assert_eq!(verdict, Verdict::Allowed { count: 1 });

        let counter = assert_ok!(h.db.db().get("global", "global").await).unwrap();
        assert_eq!(counter.request_count, 1);
        assert_eq!(counter.alert_count, 0);
    }

    #[tokio::test]
    async fn test_concurrent_checks_admit_exactly_limit() {
        let h = GateHarness::new(10, 60_000, 10, 60_000).await;

        let mut handles = Vec::new();
        for _ in 0..25 {
            let gate = h.gate.clone();
            handles.push(tokio::spawn(async move {
                gate.check(&RequestInfo::new("/drivers")).await
            }));
        }

        let mut allowed = 0;
        for handle in handles {
            if assert_ok!(handle.await.unwrap()).is_allowed() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 10);

        let counter = assert_ok!(h.db.db().get("global", "global").await).unwrap();
        assert_eq!(counter.request_count, 10);
    }

    #[tokio::test]
    async fn test_counter_survives_a_new_gate_over_the_same_database() {
        let h = GateHarness::new(3, 60_000, 3, 60_000).await;
        assert_ok!(h.gate.check(&request()).await);
        assert_ok!(h.gate.check(&request()).await);

        // Rebuild the gate as a restart would, pointing at the same rows.
        let restarted = driver_portal::RateLimitGate::new(
            h.gate.settings().clone(),
            h.db.db_arc(),
            h.db.db_arc(),
            h.gate.notifier().clone(),
        )
        .with_clock(h.clock.clone());

        let verdict = assert_ok!(restarted.check(&request()).await);
        assert_eq!(verdict, Verdict::Allowed { count: 3 });
        assert!(!assert_ok!(restarted.check(&request()).await).is_allowed());
    }
}
