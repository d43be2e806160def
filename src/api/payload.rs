// Conversion payload module
// Request body validation and the response shape

use hyper::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Key holding the payload in a request body
const DATA_KEY: &str = "data";

/// Why a conversion request body was rejected
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("request body is missing the \"data\" field")]
    MissingData,
}

impl PayloadError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Response body: `{"out": <converted payload>}`
#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub out: Value,
}

/// Extract the `data` value from a raw request body
pub fn parse_payload(body: &[u8]) -> Result<Value, PayloadError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(mut fields) => fields.remove(DATA_KEY).ok_or(PayloadError::MissingData),
        other => Err(PayloadError::NotAnObject(json_type_name(&other))),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
