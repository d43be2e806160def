// API module entry
// JSON conversion endpoints: POST /api/<Conversion> with {"data": ...}

mod payload;
mod response;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};

use crate::config::AppState;
use crate::convert::Conversion;
use crate::logger;

pub use payload::{parse_payload, ConversionResponse, PayloadError};
pub use response::{json_response, not_found, payload_error};

/// Methods accepted on a conversion route
pub const ALLOW: &str = "POST, OPTIONS";

/// Handle one conversion request
///
/// Reads the body (bounded by `http.max_body_size`), validates the payload,
/// records it, and answers with the converter's output under `out`.
pub async fn handle_conversion<B>(
    req: Request<B>,
    conversion: Conversion,
    state: &AppState,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);

    let data = match read_body(req.into_body(), limit)
        .await
        .and_then(|body| parse_payload(&body))
    {
        Ok(data) => data,
        Err(e) => {
            logger::log_rejected(conversion, e.status().as_u16(), &e.to_string());
            return payload_error(&e);
        }
    };

    logger::log_conversion(conversion, &data);

    let out = state.converters.convert(conversion, data);
    json_response(StatusCode::OK, &ConversionResponse { out })
}

/// Collect the request body, failing once it grows past `limit` bytes
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, PayloadError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(PayloadError::TooLarge { limit }),
        Err(e) => Err(PayloadError::BodyRead(e.to_string())),
    }
}
