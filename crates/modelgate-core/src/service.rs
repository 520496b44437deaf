//! Service and model domain types.
//!
//! A `Service` is one discovered chat backend; a `Model` is one chat model
//! it offers. Models are globally unique across the gateway through the
//! composite name `serviceId|originalName`.

use serde::Serialize;

/// Separator between the service id and the original model name.
pub const MODEL_NAME_SEPARATOR: char = '|';

/// Capability tag applied when a model advertises none.
pub const CHAT_CAPABILITY: &str = "chat";

/// Identity of the synthesized direct-configuration service.
pub const LOCAL_SERVICE_ID: &str = "local";
/// Display name of the synthesized direct-configuration service.
pub const LOCAL_SERVICE_NAME: &str = "Local";
/// Service type reported for the synthesized service.
pub const LOCAL_SERVICE_KIND: &str = "openai";
/// Plan reported for the synthesized service.
pub const LOCAL_SERVICE_PLAN: &str = "direct";

/// Default model catalog for the synthesized service. The first entry is
/// the default model.
pub const DEFAULT_MODELS: [&str; 2] = ["gpt-4o-mini", "gpt-4o"];

/// One discovered chat backend.
///
/// The serialized shape is the browser client's contract; the API key and
/// binding name stay server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Platform instance guid, or a synthesized `<label>-<index>` fallback.
    pub id: String,
    /// Display name (instance name, falling back to the binding name).
    pub name: String,
    /// Binding group label ("genai", ...), `openai` for the local service.
    #[serde(rename = "type")]
    pub kind: String,
    /// Plan name from the binding, `direct` for the local service.
    pub plan: String,
    /// Base URL from the credentials; may be empty for multi-plan bindings
    /// whose endpoint only carries a catalog URL.
    pub base_url: String,
    /// Models offered by this service, default first.
    pub models: Vec<Model>,
    /// Whether the credentials carry a usable API key.
    pub has_api_key: bool,
    /// Binding `name` field, matched by the config resolver.
    #[serde(skip)]
    pub binding_name: Option<String>,
    /// The credential itself; never serialized.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Service {
    /// Whether a resolver selector refers to this service.
    ///
    /// Matches the service id, the display name, or the binding name.
    #[must_use]
    pub fn matches_selector(&self, selector: &str) -> bool {
        self.id == selector
            || self.name == selector
            || self.binding_name.as_deref() == Some(selector)
    }

    /// The default model of this service, falling back to the first one.
    #[must_use]
    pub fn default_model(&self) -> Option<&Model> {
        self.models
            .iter()
            .find(|model| model.is_default)
            .or_else(|| self.models.first())
    }
}

/// One chat model offered by a service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Same as `name`; kept so OpenAI-style clients can address models by id.
    pub id: String,
    /// Composite `serviceId|originalName`, unique across the gateway.
    pub name: String,
    /// Name the owning service knows this model by.
    pub original_name: String,
    /// Human-readable label for pickers.
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub capabilities: Vec<String>,
    /// Whether this is the owning service's default model.
    pub is_default: bool,
    pub service_id: String,
    pub service_name: String,
}

impl Model {
    /// Build a model entry for a service, deriving the composite name.
    #[must_use]
    pub fn new(
        service_id: &str,
        service_name: &str,
        original_name: String,
        description: Option<String>,
        capabilities: Vec<String>,
        is_default: bool,
    ) -> Self {
        let name = composite_model_name(service_id, &original_name);
        Self {
            id: name.clone(),
            name,
            display_name: format!("{original_name} ({service_name})"),
            original_name,
            description,
            capabilities,
            is_default,
            service_id: service_id.to_string(),
            service_name: service_name.to_string(),
        }
    }
}

/// Join a service id and an original model name into the composite name.
#[must_use]
pub fn composite_model_name(service_id: &str, original_name: &str) -> String {
    format!("{service_id}{MODEL_NAME_SEPARATOR}{original_name}")
}

/// Split a composite model name at the FIRST separator.
///
/// Returns `None` for plain model names. Original names may themselves
/// contain the separator, so only the first occurrence splits.
#[must_use]
pub fn split_composite(name: &str) -> Option<(&str, &str)> {
    name.split_once(MODEL_NAME_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_models(models: Vec<Model>) -> Service {
        Service {
            id: "svc-1".to_string(),
            name: "Primary".to_string(),
            kind: "genai".to_string(),
            plan: "shared".to_string(),
            base_url: String::new(),
            models,
            has_api_key: true,
            binding_name: Some("primary-binding".to_string()),
            api_key: Some("key".to_string()),
        }
    }

    #[test]
    fn composite_name_joins_with_separator() {
        assert_eq!(composite_model_name("svc-1", "llama-3"), "svc-1|llama-3");
    }

    #[test]
    fn split_composite_splits_at_first_separator_only() {
        assert_eq!(split_composite("svc-1|a|b"), Some(("svc-1", "a|b")));
        assert_eq!(split_composite("plain-model"), None);
    }

    #[test]
    fn model_new_derives_composite_identity() {
        let model = Model::new("svc-1", "Primary", "llama-3".to_string(), None, vec![], true);
        assert_eq!(model.id, "svc-1|llama-3");
        assert_eq!(model.name, "svc-1|llama-3");
        assert_eq!(model.original_name, "llama-3");
        assert_eq!(model.display_name, "llama-3 (Primary)");
    }

    #[test]
    fn matches_selector_accepts_id_name_and_binding() {
        let service = service_with_models(vec![]);
        assert!(service.matches_selector("svc-1"));
        assert!(service.matches_selector("Primary"));
        assert!(service.matches_selector("primary-binding"));
        assert!(!service.matches_selector("other"));
    }

    #[test]
    fn default_model_falls_back_to_first() {
        let models = vec![
            Model::new("svc-1", "Primary", "a".to_string(), None, vec![], false),
            Model::new("svc-1", "Primary", "b".to_string(), None, vec![], false),
        ];
        let service = service_with_models(models);
        let default = service.default_model().map(|m| m.original_name.clone());
        assert_eq!(default, Some("a".to_string()));
    }

    #[test]
    fn serialized_service_hides_credentials() {
        let service = service_with_models(vec![]);
        let value = serde_json::to_value(&service).unwrap();
        assert!(value.get("apiKey").is_none());
        assert!(value.get("bindingName").is_none());
        assert_eq!(value["hasApiKey"], serde_json::json!(true));
        assert_eq!(value["type"], serde_json::json!("genai"));
    }
}
