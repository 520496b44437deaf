//! Effective upstream configuration for a single request.
//!
//! Resolution walks a fixed chain: a service picked by selector, the
//! first discovered service, then the process environment. A missing
//! API key is represented in the result rather than reported as an
//! error, so callers decide how unconfigured setups surface.

use crate::endpoint::{OPENAI_PUBLIC_BASE, OPENAI_PUBLIC_V1};
use crate::service::{DEFAULT_MODELS, Service};
use crate::snapshot::EnvSnapshot;

/// Upstream settings a request should run with.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Key to authenticate with. `None` means the gateway is not
    /// configured for this selection.
    pub api_key: Option<String>,
    /// Normalized base URL requests are built from.
    pub base_url: String,
    /// Original model names the selected upstream accepts.
    pub available_models: Vec<String>,
    /// Model used when a request names none, or names an unknown one.
    pub default_model: Option<String>,
    pub service_id: Option<String>,
    pub service_name: Option<String>,
    pub service_kind: Option<String>,
}

/// Resolve the configuration for `selector` against the discovered
/// services, falling back to the plain environment when none match.
#[must_use]
pub fn resolve(
    snapshot: &EnvSnapshot,
    services: &[Service],
    selector: Option<&str>,
) -> ResolvedConfig {
    match select_service(services, selector) {
        Some(service) => from_service(snapshot, service),
        None => direct_environment(snapshot),
    }
}

/// Pick the service a selector refers to.
///
/// An unmatched or absent selector falls back to the first discovered
/// service; `None` only when no services exist at all.
#[must_use]
pub fn select_service<'a>(services: &'a [Service], selector: Option<&str>) -> Option<&'a Service> {
    selector
        .and_then(|wanted| services.iter().find(|service| service.matches_selector(wanted)))
        .or_else(|| services.first())
}

fn from_service(snapshot: &EnvSnapshot, service: &Service) -> ResolvedConfig {
    let api_key = service
        .api_key
        .clone()
        .or_else(|| snapshot.api_key.clone());
    let base_url = if service.base_url.is_empty() {
        snapshot
            .base_url
            .as_deref()
            .map_or_else(|| OPENAI_PUBLIC_V1.to_string(), normalize_base_url)
    } else {
        normalize_base_url(&service.base_url)
    };
    let available_models = service
        .models
        .iter()
        .map(|model| model.original_name.clone())
        .collect();
    let default_model = service.default_model().map(|model| model.original_name.clone());

    ResolvedConfig {
        api_key,
        base_url,
        available_models,
        default_model,
        service_id: Some(service.id.clone()),
        service_name: Some(service.name.clone()),
        service_kind: Some(service.kind.clone()),
    }
}

fn direct_environment(snapshot: &EnvSnapshot) -> ResolvedConfig {
    let base_url = snapshot
        .base_url
        .as_deref()
        .map_or_else(|| OPENAI_PUBLIC_V1.to_string(), normalize_base_url);
    let available_models: Vec<String> =
        DEFAULT_MODELS.iter().map(ToString::to_string).collect();
    let default_model = available_models.first().cloned();

    ResolvedConfig {
        api_key: snapshot.api_key.clone(),
        base_url,
        available_models,
        default_model,
        service_id: None,
        service_name: None,
        service_kind: None,
    }
}

/// Normalize a configured base URL.
///
/// Trailing slashes are stripped, and the bare public OpenAI origin
/// gains its `/v1` suffix. Any other URL is taken verbatim, so bases
/// that already carry a version segment are never doubled.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed == OPENAI_PUBLIC_BASE {
        return format!("{trimmed}/v1");
    }
    trimmed.to_string()
}
