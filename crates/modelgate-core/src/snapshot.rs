//! Per-request environment snapshot.
//!
//! Resolution is request-scoped: every request captures a fresh snapshot so
//! rebinding a service or rotating a key takes effect without a restart.

use std::fmt;

/// Direct API key variable.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Optional direct base URL variable.
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Structured service-binding snapshot variable.
pub const ENV_SERVICE_BINDINGS: &str = "VCAP_SERVICES";

/// Configuration inputs captured at one point in time.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    /// Direct API key, if configured.
    pub api_key: Option<String>,
    /// Direct base URL override, if configured.
    pub base_url: Option<String>,
    /// Raw service-binding document, if present.
    pub services_json: Option<String>,
}

impl EnvSnapshot {
    /// Capture the current process environment. Empty values count as unset.
    #[must_use]
    pub fn capture_from_env() -> Self {
        Self {
            api_key: non_empty_var(ENV_API_KEY),
            base_url: non_empty_var(ENV_BASE_URL),
            services_json: non_empty_var(ENV_SERVICE_BINDINGS),
        }
    }

    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Source of environment snapshots.
///
/// The server captures through this trait so tests and embedders can pin a
/// fixed snapshot instead of reading the process environment.
pub trait SnapshotSource: Send + Sync + fmt::Debug {
    fn capture(&self) -> EnvSnapshot;
}

/// Reads the process environment on every capture.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSnapshotSource;

impl SnapshotSource for EnvSnapshotSource {
    fn capture(&self) -> EnvSnapshot {
        EnvSnapshot::capture_from_env()
    }
}

/// Returns the same snapshot on every capture.
#[derive(Debug, Clone)]
pub struct StaticSnapshotSource(EnvSnapshot);

impl StaticSnapshotSource {
    #[must_use]
    pub const fn new(snapshot: EnvSnapshot) -> Self {
        Self(snapshot)
    }
}

impl SnapshotSource for StaticSnapshotSource {
    fn capture(&self) -> EnvSnapshot {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_returns_the_pinned_snapshot() {
        let source = StaticSnapshotSource::new(EnvSnapshot {
            api_key: Some("sk-test".to_string()),
            base_url: None,
            services_json: None,
        });
        let snapshot = source.capture();
        assert_eq!(snapshot.api_key.as_deref(), Some("sk-test"));
        assert!(snapshot.has_api_key());
    }

    #[test]
    fn default_snapshot_is_unconfigured() {
        let snapshot = EnvSnapshot::default();
        assert!(!snapshot.has_api_key());
        assert!(snapshot.services_json.is_none());
    }
}
