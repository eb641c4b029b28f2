//! Response envelope of the records API

use error_stack::Report;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::constants::{RESPONSE_DATA, RESPONSE_ERROR, RESPONSE_ERROR_MESSAGE, RESPONSE_SUCCESS};
use crate::error::{Error, Result};
use crate::json_object::JsonObjectAccess;

const RESPONSE_ERROR_CODE: &str = "code";

/// Error object inside a response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human readable message
    pub message: String,
    /// Machine readable code, e.g. `NOT_FOUND`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code:    Option<String>,
}

/// `{ success, data, error }` envelope returned by every endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the backend accepted the request
    pub success: bool,
    /// Payload, often the updated record or the saved fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data:    Option<Value>,
    /// Error detail when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:   Option<ApiError>,
}

impl ApiResponse {
    /// Successful response carrying `data`
    pub const fn ok(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    /// Interpret a raw HTTP response
    ///
    /// - an empty 2xx body is a success without data
    /// - a 2xx body with `success: false` is a transport error carrying the envelope's message and
    ///   code
    /// - a non-2xx status is a transport error whose message is the envelope's `error.message`
    ///   when present, otherwise `API Error: <status> <reason>`
    pub fn from_http(status: StatusCode, body: &str) -> Result<Self> {
        let parsed = if body.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(body).ok()
        };
        let envelope_error = parsed.as_ref().and_then(envelope_error);

        if !status.is_success() {
            let fallback = format!(
                "API Error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            );
            let (message, code) = envelope_error.map_or((fallback, None), |error| {
                (error.message, error.code)
            });
            warn!("API request failed with status {status}: {message}");
            return Err(Report::new(Error::transport(message, code))
                .attach(format!("HTTP status: {status}")));
        }

        let Some(envelope) = parsed else {
            if body.trim().is_empty() {
                return Ok(Self::ok(None));
            }
            return Err(Report::new(Error::transport("Invalid JSON response", None))
                .attach(format!(
                    "Response body (first 200 chars): {}",
                    body.chars().take(200).collect::<String>()
                )));
        };

        let success = envelope
            .get_field(RESPONSE_SUCCESS)
            .and_then(Value::as_bool)
            .unwrap_or(true);
        if !success {
            let error = envelope_error.unwrap_or_else(|| ApiError {
                message: "Request failed".to_string(),
                code:    None,
            });
            warn!("API rejected request: {}", error.message);
            return Err(Report::new(Error::transport(error.message, error.code)));
        }

        Ok(Self::ok(envelope.get_present(RESPONSE_DATA).cloned()))
    }
}

/// Extract `error.message`/`error.code`, tolerating a bare string error
fn envelope_error(envelope: &Value) -> Option<ApiError> {
    match envelope.get_present(RESPONSE_ERROR)? {
        Value::String(message) => Some(ApiError {
            message: message.clone(),
            code:    None,
        }),
        error @ Value::Object(_) => {
            let message = error.get_field_str(RESPONSE_ERROR_MESSAGE)?.to_string();
            let code = error.get_present(RESPONSE_ERROR_CODE).map(|code| match code {
                Value::String(code) => code.clone(),
                other => other.to_string(),
            });
            Some(ApiError { message, code })
        }
        _ => None,
    }
}
