#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;

// ============================================================================
// Public API
// ============================================================================

pub use client::UpstreamClient;
pub use config::UpstreamConfig;
pub use error::{UpstreamError, UpstreamResult};
