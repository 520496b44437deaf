#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for the integration test crates
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

mod stream;

// Re-export primary types
pub use bootstrap::{
    CorsConfig, DEFAULT_PORT, GatewayContext, ServerConfig, bootstrap, insecure_tls_from_env,
    start_server,
};
pub use error::{ERROR_TYPE_API, ERROR_TYPE_CONFIG, ERROR_TYPE_PROXY, ErrorEnvelope, HttpError};
pub use routes::{create_router, create_spa_router};
pub use state::AppState;
