//! Native model-list passthrough.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use modelgate_core::endpoint::{build_models_endpoint, fallback_models_endpoint};
use modelgate_core::ports::{CompletionError, CompletionPort, UpstreamReply};
use modelgate_core::resolver::resolve;

use super::request_view;
use crate::error::HttpError;
use crate::state::AppState;

/// Fetch the upstream's native model list.
///
/// Tries the conventional endpoint for the base URL first; when that
/// attempt does not succeed, retries once on the plain `/v1/models`
/// variant. No further retries.
pub(crate) async fn fetch_model_list(
    completions: &dyn CompletionPort,
    base_url: &str,
    api_key: &str,
) -> Result<UpstreamReply, CompletionError> {
    let primary = build_models_endpoint(base_url);
    let first = completions.list_models(&primary, api_key).await;
    if matches!(&first, Ok(reply) if reply.is_success()) {
        return first;
    }
    match &first {
        Ok(reply) => {
            debug!(endpoint = %primary, status = reply.status, "Primary model listing did not succeed");
        }
        Err(error) => {
            debug!(endpoint = %primary, %error, "Primary model listing did not succeed");
        }
    }

    let fallback = fallback_models_endpoint(base_url);
    if fallback == primary {
        return first;
    }
    debug!(endpoint = %fallback, "Retrying model listing on the /v1/models variant");
    completions.list_models(&fallback, api_key).await
}

/// List upstream models.
///
/// GET /v1/models
///
/// Relays the default service's native model-list JSON unchanged.
pub async fn list_models(State(state): State<AppState>) -> Result<Response, HttpError> {
    let view = request_view(&state).await;
    let config = resolve(&view.snapshot, &view.services, None);

    let Some(api_key) = config.api_key.as_deref() else {
        return Err(HttpError::MissingApiKey);
    };

    let reply = fetch_model_list(state.completions.as_ref(), &config.base_url, api_key).await?;
    if reply.is_success() {
        Ok(Json(reply.body).into_response())
    } else {
        Err(HttpError::upstream(&reply))
    }
}
