//! Model catalog port for multi-plan services.
//!
//! Multi-plan bindings do not carry model metadata inline; their credentials
//! point at a remote manifest (`config_url`) that advertises the models the
//! plan currently offers.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// One advertised model entry from a service's catalog manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvertisedModel {
    /// Name the owning service knows this model by.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capabilities: Option<Vec<String>>,
}

/// Errors from fetching a service's model catalog.
///
/// The directory swallows these: a failing catalog degrades its service to
/// an empty model list and never fails the request.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog endpoint answered with a non-success status.
    #[error("catalog request failed with status {status}: {url}")]
    RequestFailed { status: u16, url: String },
    /// The catalog endpoint could not be reached.
    #[error("catalog endpoint unreachable: {0}")]
    Network(String),
    /// The manifest body was not the expected shape.
    #[error("catalog response malformed: {0}")]
    InvalidResponse(String),
    /// The configured catalog URL could not be parsed.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// Port for fetching the advertised model catalog of a multi-plan service.
#[async_trait]
pub trait ModelCatalogPort: Send + Sync + fmt::Debug {
    /// Fetch the advertised models behind `config_url`.
    ///
    /// One GET with bearer auth; no retries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the manifest cannot be fetched or read.
    async fn fetch_models(
        &self,
        config_url: &str,
        api_key: &str,
    ) -> Result<Vec<AdvertisedModel>, CatalogError>;
}
