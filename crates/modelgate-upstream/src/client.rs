//! Reqwest-backed implementation of the gateway's upstream ports.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use modelgate_core::ports::{
    AdvertisedModel, CatalogError, CompletionError, CompletionPort, ModelCatalogPort,
    UpstreamReply,
};

use crate::config::UpstreamConfig;
use crate::error::{UpstreamError, UpstreamResult};

/// HTTP client behind both upstream ports.
///
/// One shared connection pool serves catalog fetches, completions, and
/// model listings. The client holds no per-service state; endpoints and
/// keys arrive with each call.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for upstream requests");
        }
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self { client })
    }

    async fn get_json(&self, endpoint: &str, api_key: &str) -> UpstreamResult<UpstreamReply> {
        let url = Url::parse(endpoint)?;
        let mut request = self.client.get(url);
        if !api_key.is_empty() {
            request = request.bearer_auth(api_key);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await?;
        Ok(UpstreamReply { status, body })
    }

    async fn post_json(
        &self,
        endpoint: &str,
        api_key: &str,
        body: &Value,
    ) -> UpstreamResult<UpstreamReply> {
        let url = Url::parse(endpoint)?;
        let mut request = self.client.post(url).json(body);
        if !api_key.is_empty() {
            request = request.bearer_auth(api_key);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await?;
        Ok(UpstreamReply { status, body })
    }
}

#[async_trait]
impl ModelCatalogPort for UpstreamClient {
    async fn fetch_models(
        &self,
        config_url: &str,
        api_key: &str,
    ) -> Result<Vec<AdvertisedModel>, CatalogError> {
        debug!(url = %config_url, "Fetching model catalog manifest");
        let reply = self
            .get_json(config_url, api_key)
            .await
            .map_err(UpstreamError::into_catalog_error)?;
        if !reply.is_success() {
            return Err(CatalogError::RequestFailed {
                status: reply.status,
                url: config_url.to_string(),
            });
        }
        parse_catalog(&reply.body)
    }
}

#[async_trait]
impl CompletionPort for UpstreamClient {
    async fn complete(
        &self,
        endpoint: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<UpstreamReply, CompletionError> {
        debug!(url = %endpoint, "Forwarding chat completion upstream");
        self.post_json(endpoint, api_key, body)
            .await
            .map_err(UpstreamError::into_completion_error)
    }

    async fn list_models(
        &self,
        endpoint: &str,
        api_key: &str,
    ) -> Result<UpstreamReply, CompletionError> {
        debug!(url = %endpoint, "Fetching upstream model list");
        self.get_json(endpoint, api_key)
            .await
            .map_err(UpstreamError::into_completion_error)
    }
}

/// Read the advertised-model array out of a catalog manifest.
///
/// Manifests name the array `advertisedModels`; older brokers used plain
/// `models`. Entries that do not deserialize are skipped rather than
/// failing the whole catalog.
fn parse_catalog(body: &Value) -> Result<Vec<AdvertisedModel>, CatalogError> {
    let entries = body
        .get("advertisedModels")
        .or_else(|| body.get("models"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            CatalogError::InvalidResponse("no advertised model array in manifest".to_string())
        })?;

    let models = entries
        .iter()
        .filter_map(|entry| match serde_json::from_value::<AdvertisedModel>(entry.clone()) {
            Ok(model) => Some(model),
            Err(error) => {
                warn!(%error, "Skipping malformed catalog entry");
                None
            }
        })
        .collect();
    Ok(models)
}
