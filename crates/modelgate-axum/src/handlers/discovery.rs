//! Discovery and configuration handlers.
//!
//! These endpoints feed the bundled web client: the service/model
//! listing for its picker, the effective configuration for a selection,
//! and a connectivity probe. All of them answer 200 even when the
//! gateway is unconfigured; problems surface in the payload.

use axum::Json;
use axum::extract::{Query, State};
use serde_json::{Value, json};
use tracing::error;

use modelgate_core::resolver::resolve;
use modelgate_core::service::split_composite;

use super::{ModelQuery, request_view, service_selector};
use crate::handlers::models::fetch_model_list;
use crate::state::AppState;

/// List discovered services and their models.
///
/// GET /api/models-config
pub async fn models_config(State(state): State<AppState>) -> Json<Value> {
    let view = request_view(&state).await;
    Json(json!({ "services": view.services }))
}

/// Resolve the effective configuration for a model selector.
///
/// GET /api/config?model=
///
/// `model` may be a composite name, a plain model name, or absent. The
/// reported model is the requested one when the resolved service offers
/// it, else that service's default.
pub async fn active_config(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
) -> Json<Value> {
    let view = request_view(&state).await;
    let selector = service_selector(query.model.as_deref());
    let config = resolve(&view.snapshot, &view.services, selector);

    let requested = query
        .model
        .as_deref()
        .map(|model| split_composite(model).map_or(model, |(_, original)| original));
    let model = requested
        .filter(|name| config.available_models.iter().any(|available| available == name))
        .map(ToString::to_string)
        .or_else(|| config.default_model.clone());

    Json(json!({
        "configured": config.api_key.is_some(),
        "baseUrl": config.base_url,
        "serviceType": config.service_kind,
        "service": config.service_name,
        "model": model,
    }))
}

/// Probe connectivity to the default upstream.
///
/// GET /api/test-openai
///
/// Always answers 200; the probe result is the `success` flag.
pub async fn test_upstream(State(state): State<AppState>) -> Json<Value> {
    let view = request_view(&state).await;
    let config = resolve(&view.snapshot, &view.services, None);

    let Some(api_key) = config.api_key.as_deref() else {
        return Json(probe_result(
            false,
            "API key is not configured".to_string(),
            None,
            &config.default_model,
            &config.available_models,
        ));
    };

    match fetch_model_list(state.completions.as_ref(), &config.base_url, api_key).await {
        Ok(reply) if reply.is_success() => {
            let models_count = reply
                .body
                .get("data")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            Json(probe_result(
                true,
                "Successfully connected to the upstream API".to_string(),
                Some(models_count),
                &config.default_model,
                &config.available_models,
            ))
        }
        Ok(reply) => {
            let message = reply.error_message().map_or_else(
                || format!("upstream returned status {}", reply.status),
                ToString::to_string,
            );
            Json(probe_result(
                false,
                message,
                None,
                &config.default_model,
                &config.available_models,
            ))
        }
        Err(err) => {
            error!(error = %err, "Upstream connectivity test failed");
            Json(probe_result(
                false,
                err.to_string(),
                None,
                &config.default_model,
                &config.available_models,
            ))
        }
    }
}

fn probe_result(
    success: bool,
    message: String,
    models_count: Option<usize>,
    default_model: &Option<String>,
    available_models: &[String],
) -> Value {
    let mut result = json!({
        "success": success,
        "message": message,
        "default_model": default_model,
        "available_models": available_models,
    });
    if let Some(count) = models_count {
        result["models_count"] = json!(count);
    }
    result
}
