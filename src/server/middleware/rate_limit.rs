//! Global rate limiting middleware
//!
//! Runs the request gate before any route logic. Rejections are answered
//! with HTTP 429; gate failures are answered with an opaque 500 and the
//! request is not forwarded.

use super::helpers::{extract_request_id, request_info};
use crate::core::rate_limiter::Verdict;
use crate::server::state::AppState;
use crate::server::types::RateLimitExceededBody;
use crate::utils::error::PortalError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::{HttpResponse, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, error};

/// Rate limit middleware for Actix-web
#[derive(Debug, Default, Clone, Copy)]
pub struct RateLimitMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let Some(state) = app_state else {
                error!(
                    "Rate limit state missing for {}, rejecting request",
                    req.path()
                );
                let e = PortalError::internal("rate limit state is not configured");
                let (status, _) = e.status_and_code();
                let body = e.to_error_response(extract_request_id(req.headers()));
                let response = HttpResponse::build(status).json(body);
                return Ok(req.into_response(response).map_into_right_body());
            };

            if !state.config.rate_limit().enabled {
                return service.call(req).await.map(|res| res.map_into_left_body());
            }

            let info = request_info(&req);
            match state.gate.check(&info).await {
                Ok(Verdict::Allowed { count }) => {
                    debug!("Rate limit passed for {} ({})", info.path, count);
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
                Ok(Verdict::Blocked { retry_after, .. }) => {
                    let response = HttpResponse::TooManyRequests()
                        .insert_header((header::RETRY_AFTER, retry_after.to_string()))
                        .json(RateLimitExceededBody::new(retry_after));
                    Ok(req.into_response(response).map_into_right_body())
                }
                Err(e) => {
                    error!("Rate limit check failed for {}: {}", info.path, e);
                    let (status, _) = e.status_and_code();
                    let body = e.to_error_response(extract_request_id(req.headers()));
                    let response = HttpResponse::build(status).json(body);
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
