//! Upstream completion port.
//!
//! One trait covers the two calls the gateway forwards: chat completions
//! and the native model listing.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Raw reply from an upstream OpenAI-compatible endpoint.
///
/// Non-success statuses are data, not errors: the forwarding layer relays
/// them with the upstream status attached. `Err` is reserved for transport
/// and decode failures.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Value,
}

impl UpstreamReply {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Human-readable message from an upstream error envelope, if present.
    ///
    /// Looks at `error.message` first, then a top-level `message`.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .or_else(|| self.body.get("message").and_then(Value::as_str))
    }

    /// Assistant content of the first choice, for stream emulation.
    #[must_use]
    pub fn first_choice_content(&self) -> Option<&str> {
        self.body
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()
    }
}

/// Errors talking to an upstream endpoint.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The endpoint could not be reached.
    #[error("upstream unreachable: {0}")]
    Network(String),
    /// The reply body could not be decoded as JSON.
    #[error("upstream response malformed: {0}")]
    InvalidResponse(String),
    /// The configured endpoint URL could not be parsed.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// Port for forwarding requests to an OpenAI-compatible upstream.
#[async_trait]
pub trait CompletionPort: Send + Sync + fmt::Debug {
    /// POST a chat-completion body to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] on transport or decode failure; HTTP
    /// error statuses come back as an [`UpstreamReply`].
    async fn complete(
        &self,
        endpoint: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<UpstreamReply, CompletionError>;

    /// GET the native model list from `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] on transport or decode failure.
    async fn list_models(
        &self,
        endpoint: &str,
        api_key: &str,
    ) -> Result<UpstreamReply, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_covers_the_2xx_range() {
        let ok = UpstreamReply { status: 201, body: Value::Null };
        let not_ok = UpstreamReply { status: 429, body: Value::Null };
        assert!(ok.is_success());
        assert!(!not_ok.is_success());
    }

    #[test]
    fn error_message_prefers_the_nested_envelope() {
        let reply = UpstreamReply {
            status: 429,
            body: json!({ "error": { "message": "rate limited" }, "message": "outer" }),
        };
        assert_eq!(reply.error_message(), Some("rate limited"));

        let flat = UpstreamReply {
            status: 500,
            body: json!({ "message": "boom" }),
        };
        assert_eq!(flat.error_message(), Some("boom"));

        let silent = UpstreamReply { status: 502, body: json!({}) };
        assert_eq!(silent.error_message(), None);
    }

    #[test]
    fn first_choice_content_reads_the_chat_shape() {
        let reply = UpstreamReply {
            status: 200,
            body: json!({
                "choices": [{ "message": { "role": "assistant", "content": "hi there" } }]
            }),
        };
        assert_eq!(reply.first_choice_content(), Some("hi there"));

        let empty = UpstreamReply { status: 200, body: json!({ "choices": [] }) };
        assert_eq!(empty.first_choice_content(), None);
    }
}
