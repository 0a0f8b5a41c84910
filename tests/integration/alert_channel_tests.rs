//! Alert delivery tests against mock HTTP endpoints

#[cfg(test)]
mod tests {
    use driver_portal::config::{AlertingConfig, EmailConfig};
    use driver_portal::core::audit::AuditSink;
    use driver_portal::monitoring::alerts::{
        AlertNotifier, EmailChannel, NotificationChannel, SlackChannel, THRESHOLD_EXCEEDED_EVENT,
        ThresholdBreach,
    };
    use driver_portal::monitoring::types::AlertSeverity;
    use driver_portal::storage::memory::MemoryStore;
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn breach(current_count: i32) -> ThresholdBreach {
        ThresholdBreach {
            identifier: "global".to_string(),
            endpoint: "global".to_string(),
            current_count,
            limit: 1000,
            threshold: 500,
        }
    }

    fn email_config(server: &MockServer) -> EmailConfig {
        EmailConfig {
            api_url: format!("{}/send", server.uri()),
            api_key: Some("relay-key".to_string()),
            from_address: "alerts@portal.example".to_string(),
            to_addresses: vec!["ops@portal.example".to_string()],
        }
    }

    #[tokio::test]
    async fn test_slack_webhook_receives_attachment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_partial_json(serde_json::json!({
                "username": "Portal Alert",
                "attachments": [{ "title": "Rate limit threshold exceeded", "color": "#ff9500" }]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let channel = SlackChannel::new(
            reqwest::Client::new(),
            format!("{}/hook", server.uri()),
            None,
            None,
            AlertSeverity::Info,
        );
        channel.send(&breach(600).to_alert()).await.unwrap();
    }

    #[tokio::test]
    async fn test_email_relay_uses_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(header("authorization", "Bearer relay-key"))
            .and(body_partial_json(serde_json::json!({
                "from": "alerts@portal.example",
                "to": ["ops@portal.example"],
                "subject": "[CRITICAL] Rate limit threshold exceeded"
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let channel = EmailChannel::new(
            reqwest::Client::new(),
            email_config(&server),
            AlertSeverity::Info,
        );
        channel.send(&breach(1000).to_alert()).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_delivery_is_counted_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = AlertingConfig {
            log_channel: false,
            slack_webhook: Some(format!("{}/hook", server.uri())),
            email: Some(email_config(&server)),
            timeout_secs: 2,
            ..Default::default()
        };
        let store = Arc::new(MemoryStore::new());
        let notifier = AlertNotifier::from_config(&config, store.clone()).unwrap();
        assert_eq!(notifier.channel_names(), vec!["slack", "email"]);

        notifier.notify(&breach(500)).await;

        let stats = notifier.stats();
        assert_eq!(stats.total_alerts, 1);
        assert_eq!(stats.failed_notifications, 1);
        assert_eq!(
            store
                .events_named(THRESHOLD_EXCEEDED_EVENT)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_disabled_alerting_skips_external_channels() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = AlertingConfig {
            enabled: false,
            log_channel: false,
            slack_webhook: Some(format!("{}/hook", server.uri())),
            ..Default::default()
        };
        let store = Arc::new(MemoryStore::new());
        let notifier = AlertNotifier::from_config(&config, store.clone()).unwrap();
        assert!(notifier.channel_names().is_empty());

        notifier.notify(&breach(700)).await;
        assert_eq!(notifier.stats().failed_notifications, 0);
        // The audit trail is written regardless of channels.
        assert_eq!(
            store
                .events_named(THRESHOLD_EXCEEDED_EVENT)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
