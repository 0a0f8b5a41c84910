//! HTTP route handlers

use crate::server::state::AppState;
use crate::server::types::{RateLimitStatus, ServerHealth};
use actix_web::{HttpResponse, web};
use tracing::debug;

/// Configure portal routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/admin/rate-limit", web::get().to(rate_limit_status));
}

/// Health check endpoint handler
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let storage = state.storage.health_check().await;
    let health = ServerHealth {
        status: if storage.healthy { "healthy" } else { "degraded" },
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        storage,
    };

    if health.storage.healthy {
        HttpResponse::Ok().json(health)
    } else {
        HttpResponse::ServiceUnavailable().json(health)
    }
}

/// Global counter snapshot and alert statistics
pub async fn rate_limit_status(
    state: web::Data<AppState>,
) -> Result<HttpResponse, crate::utils::error::PortalError> {
    let counter = state.gate.snapshot().await?;
    let status = RateLimitStatus {
        enabled: state.config.rate_limit().enabled,
        counter,
        alerts: state.gate.notifier().stats(),
    };
    Ok(HttpResponse::Ok().json(status))
}
