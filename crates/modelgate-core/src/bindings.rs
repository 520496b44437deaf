//! Platform service-binding snapshot parsing.
//!
//! The snapshot is a JSON object keyed by binding group label, each label
//! holding an array of bound instances (the Cloud Foundry `VCAP_SERVICES`
//! layout). Credentials are classified exactly once here into the
//! [`Credentials`] union; nothing downstream re-inspects raw JSON.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Snapshot parse failure. Callers log it and degrade to "no services".
#[derive(Debug, Error)]
pub enum BindingsError {
    /// The snapshot document is not the expected JSON layout.
    #[error("service binding snapshot is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One bound instance with classified credentials.
#[derive(Debug, Clone)]
pub struct BoundService {
    /// Instance guid, else a synthesized `<label>-<index>` id.
    pub id: String,
    /// Display name: instance name, else binding name, else the id.
    pub name: String,
    /// Raw binding `name` field; the resolver also matches on it.
    pub binding_name: Option<String>,
    /// Binding group label this instance came from.
    pub label: String,
    /// Plan name from the binding.
    pub plan: String,
    pub credentials: Credentials,
}

/// Credential shapes, dispatched once at parse time.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Nested `endpoint` descriptor; models come from the remote catalog.
    MultiPlan(MultiPlanCredentials),
    /// Flat credentials carrying the model metadata inline.
    Legacy(LegacyCredentials),
}

#[derive(Debug, Clone)]
pub struct MultiPlanCredentials {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    /// Remote model-catalog manifest URL.
    pub config_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LegacyCredentials {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    /// Primary model name; the service default.
    pub model_name: Option<String>,
    pub model_aliases: Vec<String>,
    pub model_capabilities: Vec<String>,
}

// ============================================================================
// Raw snapshot shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawInstance {
    instance_guid: Option<String>,
    instance_name: Option<String>,
    name: Option<String>,
    plan: Option<String>,
    #[serde(default)]
    credentials: RawCredentials,
}

#[derive(Debug, Default, Deserialize)]
struct RawCredentials {
    api_key: Option<String>,
    api_base: Option<String>,
    model_name: Option<String>,
    #[serde(default)]
    model_aliases: Vec<String>,
    #[serde(default)]
    model_capabilities: Vec<String>,
    endpoint: Option<RawEndpoint>,
}

#[derive(Debug, Deserialize)]
struct RawEndpoint {
    api_key: Option<String>,
    api_base: Option<String>,
    config_url: Option<String>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a binding snapshot into classified bound services.
///
/// Instances whose credentials match neither plan shape are skipped; they
/// are bound services of some other kind, not chat backends. Group labels
/// are walked in deterministic (sorted) order, instances in document order.
///
/// # Errors
///
/// Returns [`BindingsError`] when the document itself cannot be parsed.
pub fn parse_bindings(raw: &str) -> Result<Vec<BoundService>, BindingsError> {
    let groups: BTreeMap<String, Vec<RawInstance>> = serde_json::from_str(raw)?;
    let mut bound = Vec::new();
    for (label, instances) in groups {
        for (index, instance) in instances.into_iter().enumerate() {
            if let Some(service) = classify(&label, index, instance) {
                bound.push(service);
            }
        }
    }
    Ok(bound)
}

fn classify(label: &str, index: usize, raw: RawInstance) -> Option<BoundService> {
    let credentials = raw.credentials;
    let classified = if let Some(endpoint) = credentials.endpoint {
        Credentials::MultiPlan(MultiPlanCredentials {
            // The nested descriptor wins; tolerate older bindings that only
            // set the flat fields.
            api_key: endpoint.api_key.or(credentials.api_key),
            api_base: endpoint.api_base.or(credentials.api_base),
            config_url: endpoint.config_url,
        })
    } else if credentials.api_key.is_some() || credentials.model_name.is_some() {
        Credentials::Legacy(LegacyCredentials {
            api_key: credentials.api_key,
            api_base: credentials.api_base,
            model_name: credentials.model_name,
            model_aliases: credentials.model_aliases,
            model_capabilities: credentials.model_capabilities,
        })
    } else {
        debug!(label, "Skipping bound instance without chat credentials");
        return None;
    };

    let id = raw
        .instance_guid
        .unwrap_or_else(|| format!("{label}-{index}"));
    let name = raw
        .instance_name
        .or_else(|| raw.name.clone())
        .unwrap_or_else(|| id.clone());
    Some(BoundService {
        id,
        name,
        binding_name: raw.name,
        label: label.to_string(),
        plan: raw.plan.unwrap_or_default(),
        credentials: classified,
    })
}
