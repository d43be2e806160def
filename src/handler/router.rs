//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: conversion endpoints, health
//! probes and the static front-end, plus access logging for all of them.

use crate::api;
use crate::config::{AppState, HttpConfig};
use crate::convert::{Conversion, API_PREFIX};
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Methods accepted outside the API
pub const STATIC_ALLOW: &str = "GET, HEAD, OPTIONS";

/// Request context for static file serving
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| access_log_entry(&req, remote_addr));

    let mut response = route_request(req, &state).await;
    apply_common_headers(&mut response, &state.config.http);

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let enable_cors = state.config.http.enable_cors;

    // 1. Conversion endpoints
    if let Some(conversion) = Conversion::from_path(&path) {
        return match method {
            Method::POST => {
                if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
                    return resp;
                }
                api::handle_conversion(req, conversion, state).await
            }
            Method::OPTIONS => http::build_options_response(api::ALLOW, enable_cors),
            _ => http::build_405_response(api::ALLOW),
        };
    }
    if path.starts_with(API_PREFIX) {
        return api::not_found();
    }

    // 2. Everything else is read-only
    match method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return http::build_options_response(STATIC_ALLOW, enable_cors),
        _ => return http::build_405_response(STATIC_ALLOW),
    }

    // 3. Health check endpoints
    let health = &state.config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    // 4. Static front-end
    let ctx = RequestContext {
        path: &path,
        is_head: method == Method::HEAD,
        if_none_match: header_string(&req, "if-none-match"),
    };
    static_files::serve_asset(&ctx, &state.config.static_files).await
}

/// Reject requests whose declared Content-Length exceeds the limit
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn apply_common_headers(response: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    let headers = response.headers_mut();
    if let Ok(server_name) = HeaderValue::from_str(&http_config.server_name) {
        headers.insert(SERVER, server_name);
    }
    if http_config.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn access_log_entry<B>(req: &Request<B>, remote_addr: Option<SocketAddr>) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.map_or_else(|| "-".to_string(), |addr| addr.ip().to_string()),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry
}
