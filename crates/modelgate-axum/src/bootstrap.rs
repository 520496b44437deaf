//! Gateway bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum adapter: the reqwest-backed upstream client is
//! constructed here and handed to the core directory and the handlers
//! through their port traits.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use modelgate_core::directory::ServiceDirectory;
use modelgate_core::ports::CompletionPort;
use modelgate_core::snapshot::{EnvSnapshotSource, SnapshotSource};
use modelgate_upstream::{UpstreamClient, UpstreamConfig};

/// Default HTTP port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "PORT";

/// Environment variable disabling upstream TLS verification.
pub const ENV_INSECURE_TLS: &str = "MODELGATE_INSECURE_TLS";

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Optional path to static assets for SPA serving.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Skip TLS certificate verification on upstream requests.
    pub insecure_tls: bool,
}

impl ServerConfig {
    /// Create config from environment defaults.
    ///
    /// Reads `PORT` for the listen port and `MODELGATE_INSECURE_TLS` for
    /// the TLS opt-out.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            port: port_from_env().unwrap_or(DEFAULT_PORT),
            static_dir: None,
            cors: CorsConfig::default(),
            insecure_tls: insecure_tls_from_env(),
        }
    }

    /// Set the listen port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// Control TLS certificate verification on upstream requests.
    #[must_use]
    pub const fn with_insecure_tls(mut self, insecure: bool) -> Self {
        self.insecure_tls = insecure;
        self
    }
}

fn port_from_env() -> Option<u16> {
    std::env::var(ENV_PORT).ok()?.trim().parse().ok()
}

/// Whether the insecure-TLS override is set in the environment.
#[must_use]
pub fn insecure_tls_from_env() -> bool {
    std::env::var(ENV_INSECURE_TLS)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Application context for the Axum adapter.
///
/// Holds the three seams every handler works through: the snapshot
/// source, the service directory, and the completion port.
pub struct GatewayContext {
    /// Source of per-request environment snapshots.
    pub snapshot: Arc<dyn SnapshotSource>,
    /// Service discovery over the catalog port.
    pub directory: ServiceDirectory,
    /// Upstream forwarding port.
    pub completions: Arc<dyn CompletionPort>,
}

impl GatewayContext {
    #[must_use]
    pub fn new(
        snapshot: Arc<dyn SnapshotSource>,
        directory: ServiceDirectory,
        completions: Arc<dyn CompletionPort>,
    ) -> Self {
        Self {
            snapshot,
            directory,
            completions,
        }
    }
}

/// Bootstrap the gateway context.
///
/// One upstream client backs both the catalog and completion ports so
/// all upstream traffic shares a connection pool.
///
/// # Errors
///
/// Returns an error when the upstream HTTP client cannot be built.
pub fn bootstrap(config: &ServerConfig) -> Result<GatewayContext> {
    let upstream = UpstreamConfig::new().with_insecure_tls(config.insecure_tls);
    let client = Arc::new(UpstreamClient::new(&upstream)?);

    Ok(GatewayContext::new(
        Arc::new(EnvSnapshotSource),
        ServiceDirectory::new(client.clone()),
        client,
    ))
}

/// Start the gateway server on the configured port.
///
/// If `config.static_dir` is set, serves static assets with SPA fallback.
/// Otherwise, serves only the API endpoints. Runs until Ctrl-C.
///
/// # Errors
///
/// Returns an error when bootstrap, binding, or serving fails.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(&config)?;

    // Choose router based on whether static serving is configured
    let app = if let Some(ref static_dir) = config.static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    if config.insecure_tls {
        warn!("Upstream TLS certificate verification is disabled");
    }
    info!("modelgate listening on http://{addr}");
    info!("OpenAI-compatible base: http://{addr}/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("modelgate shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(err) => {
            error!("Failed to install shutdown signal handler: {err}");
            // Returning would begin graceful shutdown; park the task instead.
            std::future::pending::<()>().await;
        }
    }
}
