use crate::error::EditError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str =
    "Access-Control-Allow-Headers,Access-Control-Allow-Origin,Content-Type,Authorization";
pub const CORS_ALLOW_METHODS: &str = "OPTIONS,POST,GET";

pub fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Access-Control-Allow-Origin".to_string(),
            CORS_ALLOW_ORIGIN.to_string(),
        ),
        (
            "Access-Control-Allow-Headers".to_string(),
            CORS_ALLOW_HEADERS.to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            CORS_ALLOW_METHODS.to_string(),
        ),
    ])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub images: Option<Vec<String>>,
    pub model_used: String,
    pub request_id: String,
    pub generation_time_ms: u64,
}

/// Proxy-style response: status, headers and a JSON-encoded body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HandlerResponse {
    fn with_body(status_code: u16, body: serde_json::Value) -> Self {
        Self {
            status_code,
            headers: cors_headers(),
            body: body.to_string(),
        }
    }

    pub fn success(response: &EditResponse) -> Self {
        Self::with_body(200, json!(response))
    }

    /// Validation failures answer without a request id.
    pub fn client_error(error: &EditError) -> Self {
        Self::with_body(error.status_code(), json!({ "error": error.to_string() }))
    }

    pub fn server_error(error: &EditError, request_id: &str) -> Self {
        Self::with_body(
            500,
            json!({ "error": error.to_string(), "request_id": request_id }),
        )
    }

    pub fn preflight() -> Self {
        Self {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
        }
    }

    pub fn json_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}
