//! Middleware tests against the full application

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use driver_portal::config::Config;
    use driver_portal::core::rate_limiter::{
        CounterStore, CounterUpdate, GateSettings, RateLimitCounter, RateLimitGate,
        RateLimitLogStore,
    };
    use driver_portal::monitoring::alerts::AlertNotifier;
    use driver_portal::server::server::HttpServer;
    use driver_portal::server::state::AppState;
    use driver_portal::storage::StorageLayer;
    use driver_portal::utils::error::{PortalError, Result};
    use mockall::mock;
    use std::sync::Arc;

    mock! {
        #[derive(Debug)]
        pub Counters {}

        #[async_trait]
        impl CounterStore for Counters {
            async fn get(&self, identifier: &str, endpoint: &str) -> Result<Option<RateLimitCounter>>;
            async fn create(
                &self,
                identifier: &str,
                endpoint: &str,
                initial_count: i32,
                reset_at: DateTime<Utc>,
                now: DateTime<Utc>,
            ) -> Result<RateLimitCounter>;
            async fn update(&self, identifier: &str, endpoint: &str, update: CounterUpdate) -> Result<()>;
            async fn delete_expired(&self, before: DateTime<Utc>) -> Result<u64>;
        }
    }

    fn state_with_counters(counters: Arc<dyn CounterStore>, limit: u32) -> AppState {
        let mut config = Config::default();
        config.portal.rate_limit.limit = limit;
        config.portal.rate_limit.alert_threshold = limit;

        let storage = StorageLayer::in_memory();
        let notifier = Arc::new(AlertNotifier::new(storage.audit.clone(), Vec::new()));
        let gate = RateLimitGate::new(
            GateSettings::from_config(config.rate_limit()),
            counters,
            storage.logs.clone(),
            notifier,
        );
        AppState::new(config, gate, storage)
    }

    fn memory_state(limit: u32) -> AppState {
        let storage = StorageLayer::in_memory();
        state_with_counters(storage.counters.clone(), limit)
    }

    #[actix_web::test]
    async fn test_rejection_carries_retry_after_and_request_id() {
        let app = test::init_service(HttpServer::create_app(web::Data::new(memory_state(1)))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("x-request-id", "trip-42"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers().get("x-request-id").unwrap(), "trip-42");
        assert!(res.headers().contains_key("retry-after"));

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Too many requests");
        assert!(body["retryAfter"].is_u64());
    }

    #[actix_web::test]
    async fn test_storage_failure_fails_closed() {
        let mut counters = MockCounters::new();
        counters.expect_delete_expired().returning(|_| {
            Err(PortalError::Database(sea_orm::DbErr::Custom(
                "connection refused by counters-db:5432".to_string(),
            )))
        });
        counters.expect_get().never();
        counters.expect_update().never();

        let state = state_with_counters(Arc::new(counters), 10);
        let logs = state.storage.logs.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("x-request-id", "req-500"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!res.headers().contains_key("retry-after"));

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(body["error"]["message"], "Database operation failed");
        assert_eq!(body["error"]["request_id"], "req-500");
        assert!(body.get("retryAfter").is_none());
        assert!(!body.to_string().contains("counters-db"));

        // Nothing was admitted, so nothing was logged.
        assert!(logs.recent(10).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_failed_counter_write_fails_closed() {
        let mut counters = MockCounters::new();
        counters.expect_delete_expired().returning(|_| Ok(0));
        counters.expect_get().returning(|_, _| Ok(None));
        counters
            .expect_create()
            .returning(|_, _, _, _, _| Err(PortalError::storage("disk full")));

        let state = state_with_counters(Arc::new(counters), 10);
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get().uri("/admin/rate-limit").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"]["code"], "STORAGE_ERROR");
        assert_eq!(body["error"]["message"], "Storage operation failed");
    }

    #[actix_web::test]
    async fn test_country_header_reaches_the_log() {
        let state = memory_state(10);
        let logs = state.storage.logs.clone();
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("cf-ipcountry", "BE"))
            .insert_header(("user-agent", "DriverApp/2.1"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let recent = logs.recent(1).await.unwrap();
        assert_eq!(recent[0].endpoint, "/health");
        assert_eq!(recent[0].country.as_deref(), Some("BE"));
        assert_eq!(recent[0].user_agent.as_deref(), Some("DriverApp/2.1"));
    }
}
