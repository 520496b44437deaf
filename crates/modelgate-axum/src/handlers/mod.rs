//! HTTP request handlers for the gateway.
//!
//! Each submodule covers one API area. Every handler captures a fresh
//! environment snapshot and rediscovers services; nothing is cached
//! between requests, so rebinding a service takes effect immediately.

pub mod chat;
pub mod discovery;
pub mod health;
pub mod models;

use serde::Deserialize;

use modelgate_core::service::{Service, split_composite};
use modelgate_core::snapshot::EnvSnapshot;

use crate::state::AppState;

/// Query string carrying an optional model or service selector.
#[derive(Debug, Deserialize)]
pub struct ModelQuery {
    pub model: Option<String>,
}

/// Snapshot plus discovered services for one request.
pub(crate) struct RequestView {
    pub snapshot: EnvSnapshot,
    pub services: Vec<Service>,
}

/// Capture the environment and discover services for one request.
pub(crate) async fn request_view(state: &AppState) -> RequestView {
    let snapshot = state.snapshot.capture();
    let services = state.directory.list_services(&snapshot).await;
    RequestView { snapshot, services }
}

/// Derive a service selector from a model query parameter.
///
/// Composite names select by their service part; plain names pass
/// through as selectors (they may name a service, or match nothing and
/// fall back to the first service).
pub(crate) fn service_selector(model_param: Option<&str>) -> Option<&str> {
    model_param.map(|model| split_composite(model).map_or(model, |(service, _)| service))
}
