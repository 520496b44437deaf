//! Liveness endpoint.

use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use serde_json::{Value, json};

use modelgate_core::resolver::resolve;

use super::{ModelQuery, request_view, service_selector};
use crate::state::AppState;

/// Health check endpoint.
///
/// GET /health?model=
///
/// Always HTTP 200: configuration problems show up in `api_configured`,
/// never in the status code, so liveness probes keep passing on a
/// misconfigured gateway.
pub async fn health(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
) -> Json<Value> {
    let view = request_view(&state).await;
    let selector = service_selector(query.model.as_deref());
    let config = resolve(&view.snapshot, &view.services, selector);

    Json(json!({
        "status": "ok",
        "api_configured": config.api_key.is_some(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
