//! Helper functions for middleware

use super::request_id::REQUEST_ID_HEADER;
use crate::core::rate_limiter::RequestInfo;
use actix_web::dev::ServiceRequest;
use actix_web::http::header::{self, HeaderMap};

/// Edge headers carrying the client's country code, in priority order
const COUNTRY_HEADERS: &[&str] = &["x-vercel-ip-country", "cf-ipcountry"];

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Extract the `User-Agent` header
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    header_str(headers, header::USER_AGENT.as_str())
}

/// Extract the client country from edge proxy headers
pub fn extract_country(headers: &HeaderMap) -> Option<String> {
    COUNTRY_HEADERS
        .iter()
        .find_map(|name| header_str(headers, name))
}

pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    header_str(headers, REQUEST_ID_HEADER)
}

/// Build the gate input for a request
pub fn request_info(req: &ServiceRequest) -> RequestInfo {
    let headers = req.headers();
    RequestInfo {
        path: req.path().to_string(),
        user_agent: extract_user_agent(headers),
        country: extract_country(headers),
    }
}
