//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::core::rate_limiter::{GateSettings, RateLimitGate};
use crate::monitoring::alerts::AlertNotifier;
use crate::server::handlers::configure_routes;
use crate::server::middleware::{RateLimitMiddleware, RequestIdMiddleware};
use crate::server::state::AppState;
use crate::storage::StorageLayer;
use crate::utils::error::{PortalError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server, connecting storage and building the gate
    pub async fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let storage = StorageLayer::new(config.storage()).await?;
        let notifier = AlertNotifier::from_config(config.alerting(), storage.audit.clone())?;
        let gate = RateLimitGate::new(
            GateSettings::from_config(config.rate_limit()),
            storage.counters.clone(),
            storage.logs.clone(),
            Arc::new(notifier),
        );

        let rate_limit = config.rate_limit();
        info!(
            "Global rate limit: {} requests per {}s, alert at {} (cooldown {}s){}",
            rate_limit.limit,
            rate_limit.window_secs,
            rate_limit.alert_threshold,
            rate_limit.alert_cooldown_secs,
            if rate_limit.enabled { "" } else { " [disabled]" }
        );

        Ok(Self::from_state(AppState::new(config.clone(), gate, storage)))
    }

    /// Create a server around prepared state
    pub fn from_state(state: AppState) -> Self {
        Self {
            config: state.config.server().clone(),
            state,
        }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(RateLimitMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "Driver-Portal")))
            .configure(configure_routes)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .client_request_timeout(Duration::from_secs(self.config.timeout));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| PortalError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn format_bind_error(error: std::io::Error, bind_addr: &str) -> PortalError {
        if error.kind() == std::io::ErrorKind::AddrInUse {
            PortalError::server(format!(
                "Address {} is already in use; stop the other process or pick another --port",
                bind_addr
            ))
        } else {
            PortalError::server(format!("Failed to bind to {}: {}", bind_addr, error))
        }
    }
}
