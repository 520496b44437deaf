//! Axum-specific error types and the client-facing error envelope.
//!
//! Every error leaves the gateway as `{"error": {"message", "type"}}`.
//! The `type` discriminant tells clients whether the gateway is
//! unconfigured, the upstream rejected the request, or forwarding
//! itself failed.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use modelgate_core::ports::{CompletionError, UpstreamReply};
use serde::Serialize;
use thiserror::Error;

/// Error type reported when the gateway itself is not configured.
pub const ERROR_TYPE_CONFIG: &str = "server_config_error";
/// Error type reported when the upstream rejected a forwarded request.
pub const ERROR_TYPE_API: &str = "api_error";
/// Error type reported for gateway-side request failures.
pub const ERROR_TYPE_PROXY: &str = "proxy_error";

/// Gateway HTTP error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// No API key is available for the resolved configuration.
    #[error("OpenAI API key is not configured on the server")]
    MissingApiKey,

    /// The upstream rejected the forwarded request; its status is relayed.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The inbound request body could not be parsed.
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    /// Forwarding failed inside the gateway.
    #[error("{0}")]
    Proxy(String),
}

impl HttpError {
    /// Build an upstream error from a relayed reply, extracting the
    /// upstream's own message when it sent one.
    #[must_use]
    pub fn upstream(reply: &UpstreamReply) -> Self {
        let message = reply.error_message().map_or_else(
            || format!("upstream returned status {}", reply.status),
            ToString::to_string,
        );
        Self::Upstream {
            status: reply.status,
            message,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::Proxy(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::MissingApiKey => ERROR_TYPE_CONFIG,
            Self::Upstream { .. } => ERROR_TYPE_API,
            Self::BadRequest(_) | Self::Proxy(_) => ERROR_TYPE_PROXY,
        }
    }
}

impl From<CompletionError> for HttpError {
    fn from(err: CompletionError) -> Self {
        Self::Proxy(err.to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = ErrorEnvelope::new(self.to_string(), self.error_type());
        (status, Json(envelope)).into_response()
    }
}

/// JSON error envelope sent to clients.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(message: impl Into<String>, error_type: &str) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                error_type: error_type.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_key_is_a_config_error() {
        let error = HttpError::MissingApiKey;
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_type(), ERROR_TYPE_CONFIG);
    }

    #[test]
    fn upstream_status_is_relayed() {
        let reply = UpstreamReply {
            status: 429,
            body: json!({ "error": { "message": "rate limited" } }),
        };
        let error = HttpError::upstream(&reply);
        assert_eq!(error.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(error.error_type(), ERROR_TYPE_API);
        assert_eq!(error.to_string(), "rate limited");
    }

    #[test]
    fn silent_upstream_reply_gets_a_fallback_message() {
        let reply = UpstreamReply {
            status: 502,
            body: json!({}),
        };
        let error = HttpError::upstream(&reply);
        assert_eq!(error.to_string(), "upstream returned status 502");
    }

    #[test]
    fn bad_request_is_a_proxy_error_with_400() {
        let error = HttpError::BadRequest("expected value at line 1".to_string());
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.error_type(), ERROR_TYPE_PROXY);
    }

    #[test]
    fn envelope_serializes_with_the_type_key() {
        let envelope = ErrorEnvelope::new("boom", ERROR_TYPE_PROXY);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["error"]["message"], json!("boom"));
        assert_eq!(value["error"]["type"], json!("proxy_error"));
    }
}
