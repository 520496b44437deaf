//! Service discovery.
//!
//! Builds the gateway's service list from the platform binding snapshot,
//! pulling multi-plan model catalogs through the catalog port. When no
//! binding yields a chat service and a direct API key is configured, a
//! synthesized local service stands in.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::bindings::{self, BoundService, Credentials, LegacyCredentials, MultiPlanCredentials};
use crate::endpoint::OPENAI_PUBLIC_V1;
use crate::ports::{AdvertisedModel, ModelCatalogPort};
use crate::resolver::normalize_base_url;
use crate::service::{
    CHAT_CAPABILITY, DEFAULT_MODELS, LOCAL_SERVICE_ID, LOCAL_SERVICE_KIND, LOCAL_SERVICE_NAME,
    LOCAL_SERVICE_PLAN, Model, Service,
};
use crate::snapshot::EnvSnapshot;

/// Discovers the chat services visible in an environment snapshot.
#[derive(Debug, Clone)]
pub struct ServiceDirectory {
    catalog: Arc<dyn ModelCatalogPort>,
}

impl ServiceDirectory {
    #[must_use]
    pub fn new(catalog: Arc<dyn ModelCatalogPort>) -> Self {
        Self { catalog }
    }

    /// List the services bound in `snapshot`, default models first.
    ///
    /// Discovery degrades instead of failing: an unparseable binding
    /// document yields an empty list, and a service whose catalog cannot
    /// be fetched still appears, with no models.
    pub async fn list_services(&self, snapshot: &EnvSnapshot) -> Vec<Service> {
        let mut services = Vec::new();
        if let Some(raw) = snapshot.services_json.as_deref() {
            match bindings::parse_bindings(raw) {
                Ok(bound) => {
                    for binding in bound {
                        services.push(self.service_from_binding(binding).await);
                    }
                }
                Err(error) => {
                    warn!(%error, "Ignoring unparseable service binding snapshot");
                }
            }
        }

        if services.is_empty() && snapshot.has_api_key() {
            services.push(local_service(snapshot));
        }
        services
    }

    async fn service_from_binding(&self, binding: BoundService) -> Service {
        match &binding.credentials {
            Credentials::MultiPlan(creds) => {
                let models = self.fetch_catalog(&binding, creds).await;
                service_shell(&binding, creds.api_base.clone(), creds.api_key.clone(), models)
            }
            Credentials::Legacy(creds) => {
                let models = legacy_models(&binding, creds);
                service_shell(&binding, creds.api_base.clone(), creds.api_key.clone(), models)
            }
        }
    }

    async fn fetch_catalog(
        &self,
        binding: &BoundService,
        creds: &MultiPlanCredentials,
    ) -> Vec<Model> {
        let Some(config_url) = creds.config_url.as_deref() else {
            warn!(
                service = %binding.id,
                "Binding carries no model catalog URL, exposing the service without models"
            );
            return Vec::new();
        };
        let api_key = creds.api_key.as_deref().unwrap_or_default();
        match self.catalog.fetch_models(config_url, api_key).await {
            Ok(advertised) => advertised_models(binding, advertised),
            Err(error) => {
                warn!(
                    service = %binding.id,
                    %error,
                    "Model catalog fetch failed, exposing the service without models"
                );
                Vec::new()
            }
        }
    }
}

/// Turn a catalog manifest into model entries, first entry as default.
///
/// Repeated names are dropped so each original name maps to exactly one
/// composite name per service.
fn advertised_models(binding: &BoundService, advertised: Vec<AdvertisedModel>) -> Vec<Model> {
    let mut seen = HashSet::new();
    let mut models = Vec::new();
    for entry in advertised {
        if !seen.insert(entry.name.clone()) {
            debug!(service = %binding.id, model = %entry.name, "Dropping repeated advertised model");
            continue;
        }
        let capabilities = entry
            .capabilities
            .unwrap_or_else(|| vec![CHAT_CAPABILITY.to_string()]);
        let is_default = models.is_empty();
        models.push(Model::new(
            &binding.id,
            &binding.name,
            entry.name,
            entry.description,
            capabilities,
            is_default,
        ));
    }
    models
}

/// Model entries for a legacy binding: the primary model plus any aliases
/// that do not repeat an already listed name.
fn legacy_models(binding: &BoundService, creds: &LegacyCredentials) -> Vec<Model> {
    let mut seen = HashSet::new();
    let mut models = Vec::new();

    if let Some(primary) = creds.model_name.as_deref() {
        let capabilities = if creds.model_capabilities.is_empty() {
            vec![CHAT_CAPABILITY.to_string()]
        } else {
            creds.model_capabilities.clone()
        };
        seen.insert(primary.to_string());
        models.push(Model::new(
            &binding.id,
            &binding.name,
            primary.to_string(),
            None,
            capabilities,
            true,
        ));
    }

    for alias in &creds.model_aliases {
        if !seen.insert(alias.clone()) {
            debug!(service = %binding.id, model = %alias, "Dropping alias that repeats a listed model");
            continue;
        }
        models.push(Model::new(
            &binding.id,
            &binding.name,
            alias.clone(),
            None,
            vec![CHAT_CAPABILITY.to_string()],
            false,
        ));
    }
    models
}

fn service_shell(
    binding: &BoundService,
    api_base: Option<String>,
    api_key: Option<String>,
    models: Vec<Model>,
) -> Service {
    let base_url = api_base.as_deref().map(normalize_base_url).unwrap_or_default();
    Service {
        id: binding.id.clone(),
        name: binding.name.clone(),
        kind: binding.label.clone(),
        plan: binding.plan.clone(),
        base_url,
        models,
        has_api_key: api_key.as_deref().is_some_and(|key| !key.is_empty()),
        binding_name: binding.binding_name.clone(),
        api_key,
    }
}

fn local_service(snapshot: &EnvSnapshot) -> Service {
    let base_url = snapshot
        .base_url
        .as_deref()
        .map_or_else(|| OPENAI_PUBLIC_V1.to_string(), normalize_base_url);
    let models = DEFAULT_MODELS
        .iter()
        .enumerate()
        .map(|(index, name)| {
            Model::new(
                LOCAL_SERVICE_ID,
                LOCAL_SERVICE_NAME,
                (*name).to_string(),
                None,
                vec![CHAT_CAPABILITY.to_string()],
                index == 0,
            )
        })
        .collect();

    Service {
        id: LOCAL_SERVICE_ID.to_string(),
        name: LOCAL_SERVICE_NAME.to_string(),
        kind: LOCAL_SERVICE_KIND.to_string(),
        plan: LOCAL_SERVICE_PLAN.to_string(),
        base_url,
        models,
        has_api_key: snapshot.has_api_key(),
        binding_name: None,
        api_key: snapshot.api_key.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::ports::CatalogError;

    #[derive(Debug, Default)]
    struct FakeCatalog {
        catalogs: HashMap<String, Vec<AdvertisedModel>>,
        failing: Vec<String>,
    }

    impl FakeCatalog {
        fn with_catalog(mut self, url: &str, names: &[&str]) -> Self {
            let advertised = names
                .iter()
                .map(|name| AdvertisedModel {
                    name: (*name).to_string(),
                    description: None,
                    capabilities: None,
                })
                .collect();
            self.catalogs.insert(url.to_string(), advertised);
            self
        }

        fn failing_for(mut self, url: &str) -> Self {
            self.failing.push(url.to_string());
            self
        }
    }

    #[async_trait]
    impl ModelCatalogPort for FakeCatalog {
        async fn fetch_models(
            &self,
            config_url: &str,
            _api_key: &str,
        ) -> Result<Vec<AdvertisedModel>, CatalogError> {
            if self.failing.iter().any(|url| url == config_url) {
                return Err(CatalogError::Network("connection refused".to_string()));
            }
            Ok(self.catalogs.get(config_url).cloned().unwrap_or_default())
        }
    }

    fn directory(catalog: FakeCatalog) -> ServiceDirectory {
        ServiceDirectory::new(Arc::new(catalog))
    }

    fn multi_plan_binding(id: &str, config_url: &str) -> serde_json::Value {
        json!({
            "instance_guid": id,
            "instance_name": format!("{id}-name"),
            "name": format!("{id}-binding"),
            "plan": "multi",
            "credentials": {
                "endpoint": {
                    "api_key": format!("key-{id}"),
                    "api_base": format!("https://{id}.example/openai"),
                    "config_url": config_url
                }
            }
        })
    }

    fn snapshot_with_bindings(bindings: serde_json::Value) -> EnvSnapshot {
        EnvSnapshot {
            api_key: None,
            base_url: None,
            services_json: Some(bindings.to_string()),
        }
    }

    #[tokio::test]
    async fn same_model_name_on_two_services_stays_distinct() {
        let catalog = FakeCatalog::default()
            .with_catalog("https://a.example/config", &["llama-3"])
            .with_catalog("https://b.example/config", &["llama-3"]);
        let snapshot = snapshot_with_bindings(json!({
            "genai": [
                multi_plan_binding("svc-a", "https://a.example/config"),
                multi_plan_binding("svc-b", "https://b.example/config"),
            ]
        }));

        let services = directory(catalog).list_services(&snapshot).await;
        assert_eq!(services.len(), 2);
        let names: Vec<&str> = services
            .iter()
            .flat_map(|service| service.models.iter().map(|model| model.name.as_str()))
            .collect();
        assert_eq!(names, vec!["svc-a|llama-3", "svc-b|llama-3"]);
    }

    #[tokio::test]
    async fn legacy_alias_repeating_the_primary_is_dropped() {
        let snapshot = snapshot_with_bindings(json!({
            "genai": [{
                "instance_guid": "svc-legacy",
                "instance_name": "Legacy",
                "plan": "standard",
                "credentials": {
                    "api_key": "sk-legacy",
                    "api_base": "https://legacy.example/api",
                    "model_name": "mistral-7b",
                    "model_aliases": ["mistral-7b", "mistral"],
                    "model_capabilities": ["chat", "tools"]
                }
            }]
        }));

        let services = directory(FakeCatalog::default()).list_services(&snapshot).await;
        assert_eq!(services.len(), 1);
        let models = &services[0].models;
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].original_name, "mistral-7b");
        assert!(models[0].is_default);
        assert_eq!(models[0].capabilities, vec!["chat", "tools"]);
        assert_eq!(models[1].original_name, "mistral");
        assert!(!models[1].is_default);
    }

    #[tokio::test]
    async fn failing_catalog_degrades_only_its_service() {
        let catalog = FakeCatalog::default()
            .with_catalog("https://a.example/config", &["llama-3", "phi-4"])
            .failing_for("https://b.example/config");
        let snapshot = snapshot_with_bindings(json!({
            "genai": [
                multi_plan_binding("svc-a", "https://a.example/config"),
                multi_plan_binding("svc-b", "https://b.example/config"),
            ]
        }));

        let services = directory(catalog).list_services(&snapshot).await;
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].models.len(), 2);
        assert!(services[0].models[0].is_default);
        assert!(services[1].models.is_empty());
        assert!(services[1].has_api_key);
    }

    #[tokio::test]
    async fn direct_key_synthesizes_the_local_service() {
        let snapshot = EnvSnapshot {
            api_key: Some("sk-direct".to_string()),
            base_url: None,
            services_json: None,
        };

        let services = directory(FakeCatalog::default()).list_services(&snapshot).await;
        assert_eq!(services.len(), 1);
        let local = &services[0];
        assert_eq!(local.id, LOCAL_SERVICE_ID);
        assert_eq!(local.kind, LOCAL_SERVICE_KIND);
        assert_eq!(local.plan, LOCAL_SERVICE_PLAN);
        assert_eq!(local.base_url, OPENAI_PUBLIC_V1);
        assert_eq!(local.models.len(), DEFAULT_MODELS.len());
        assert!(local.models[0].is_default);
        assert_eq!(local.models[0].original_name, DEFAULT_MODELS[0]);
    }

    #[tokio::test]
    async fn bindings_suppress_the_local_service() {
        let catalog = FakeCatalog::default().with_catalog("https://a.example/config", &["llama-3"]);
        let mut snapshot = snapshot_with_bindings(json!({
            "genai": [multi_plan_binding("svc-a", "https://a.example/config")]
        }));
        snapshot.api_key = Some("sk-direct".to_string());

        let services = directory(catalog).list_services(&snapshot).await;
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].id, "svc-a");
    }

    #[tokio::test]
    async fn unparseable_bindings_degrade_to_no_services() {
        let snapshot = EnvSnapshot {
            api_key: None,
            base_url: None,
            services_json: Some("{not json".to_string()),
        };

        let services = directory(FakeCatalog::default()).list_services(&snapshot).await;
        assert!(services.is_empty());
    }

    #[tokio::test]
    async fn duplicate_advertised_names_collapse_to_one_model() {
        let catalog = FakeCatalog::default()
            .with_catalog("https://a.example/config", &["llama-3", "llama-3", "phi-4"]);
        let snapshot = snapshot_with_bindings(json!({
            "genai": [multi_plan_binding("svc-a", "https://a.example/config")]
        }));

        let services = directory(catalog).list_services(&snapshot).await;
        let originals: Vec<&str> = services[0]
            .models
            .iter()
            .map(|model| model.original_name.as_str())
            .collect();
        assert_eq!(originals, vec!["llama-3", "phi-4"]);
    }
}
