//! Chat completion forwarding.
//!
//! Resolves the requested (possibly composite) model to a concrete
//! service, shapes the outbound body, and forwards one upstream call.
//! Streaming responses are emulated from that single call; the gateway
//! never streams from upstream.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use modelgate_core::endpoint::build_chat_endpoint;
use modelgate_core::resolver::{ResolvedConfig, resolve};
use modelgate_core::service::{Service, split_composite};
use modelgate_core::snapshot::EnvSnapshot;

use super::request_view;
use crate::error::HttpError;
use crate::state::AppState;
use crate::stream::stream_emulated_completion;

/// Token limit applied when the request does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Sampling temperature applied when the request does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Inbound chat-completion request.
///
/// Only the fields named here reach the upstream; everything else in
/// the inbound body is dropped. `maxTokens` and `serviceId` also accept
/// their snake_case OpenAI spellings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Value>,
    #[serde(default, alias = "max_tokens")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default, alias = "service_id")]
    pub service_id: Option<String>,
}

/// Forward a chat completion.
///
/// POST /v1/chat/completions
///
/// Relays the upstream JSON body and status on the non-streaming path;
/// fabricates an SSE stream from one non-streaming upstream call when
/// `stream` is set.
pub async fn chat_completions(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ChatCompletionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            warn!(%error, "Rejecting unparseable chat completion body");
            return HttpError::BadRequest(error.to_string()).into_response();
        }
    };

    let view = request_view(&state).await;
    let config = resolve(&view.snapshot, &view.services, request.service_id.as_deref());
    let (config, model) = select_model(&view.snapshot, &view.services, config, &request.model);

    let Some(api_key) = config.api_key.clone() else {
        return HttpError::MissingApiKey.into_response();
    };

    let endpoint = build_chat_endpoint(&config.base_url);
    let outbound = json!({
        "model": model,
        "messages": request.messages,
        "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
    });

    info!(
        model = %model,
        service = config.service_name.as_deref().unwrap_or("environment"),
        streaming = request.stream,
        "Forwarding chat completion"
    );

    if request.stream {
        return stream_emulated_completion(
            state.completions.clone(),
            endpoint,
            api_key,
            outbound,
            model,
        )
        .into_response();
    }

    match state.completions.complete(&endpoint, &api_key, &outbound).await {
        Ok(reply) if reply.is_success() => {
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
            (status, Json(reply.body)).into_response()
        }
        Ok(reply) => HttpError::upstream(&reply).into_response(),
        Err(error) => HttpError::from(error).into_response(),
    }
}

/// Resolve the model actually sent upstream, switching services for a
/// usable composite name.
///
/// A composite name only switches the active config when its service
/// exists, offers the model, and resolves to a usable API key; anything
/// else falls back to the already-resolved config.
fn select_model(
    snapshot: &EnvSnapshot,
    services: &[Service],
    fallback_config: ResolvedConfig,
    requested: &str,
) -> (ResolvedConfig, String) {
    let Some((service_id, original)) = split_composite(requested) else {
        return fallback_model(fallback_config, requested);
    };

    let known = services
        .iter()
        .find(|service| service.id == service_id)
        .is_some_and(|service| {
            service
                .models
                .iter()
                .any(|model| model.original_name == original)
        });
    if known {
        let candidate = resolve(snapshot, services, Some(service_id));
        let usable = candidate.api_key.is_some()
            && candidate.available_models.iter().any(|name| name == original);
        if usable {
            debug!(service = %service_id, model = %original, "Switching to the requested service");
            return (candidate, original.to_string());
        }
    }

    warn!(
        model = %requested,
        "Requested composite model is not usable, falling back to the default service"
    );
    fallback_model(fallback_config, original)
}

/// Pick the model for the already-resolved service: the requested name
/// when available, else the service default, else the request verbatim.
fn fallback_model(config: ResolvedConfig, requested: &str) -> (ResolvedConfig, String) {
    let model = if config.available_models.iter().any(|name| name == requested) {
        requested.to_string()
    } else {
        config
            .default_model
            .clone()
            .unwrap_or_else(|| requested.to_string())
    };
    (config, model)
}
