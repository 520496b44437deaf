//! Public configuration for the upstream client.

/// Configuration for the reqwest-backed upstream client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use modelgate_upstream::UpstreamConfig;
///
/// let config = UpstreamConfig::new().with_user_agent("my-gateway/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Skip TLS certificate verification on upstream requests
    pub(crate) accept_invalid_certs: bool,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            user_agent: concat!("modelgate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Control TLS certificate verification.
    ///
    /// Verification is on by default. Passing `true` disables it for
    /// gateways fronted by self-signed institutional proxies; the client
    /// logs a warning when it runs in that mode.
    #[must_use]
    pub const fn with_insecure_tls(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
