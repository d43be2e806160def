// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::payload::PayloadError;
use crate::convert::Conversion;
use crate::http;
use crate::logger;

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => http::build_json_response(status.as_u16(), json),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            http::build_json_response(
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                br#"{"error":{"code":500,"message":"Internal server error"}}"#.to_vec(),
            )
        }
    }
}

/// Error response for a rejected payload, 400 or 413
pub fn payload_error(err: &PayloadError) -> Response<Full<Bytes>> {
    let status = err.status();
    let body = serde_json::json!({
        "error": {
            "code": status.as_u16(),
            "message": err.to_string()
        }
    });
    json_response(status, &body)
}

/// 404 Not Found response for unknown API paths
pub fn not_found() -> Response<Full<Bytes>> {
    let endpoints: Vec<String> = Conversion::ALL.iter().map(|c| c.path()).collect();
    let body = serde_json::json!({
        "error": {
            "code": 404,
            "message": "Not Found"
        },
        "available_endpoints": endpoints
    });
    json_response(StatusCode::NOT_FOUND, &body)
}
