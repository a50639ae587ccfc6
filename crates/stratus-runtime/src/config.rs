//! Client configuration.

use std::time::Duration;

use typed_builder::TypedBuilder;

use stratus_transport::TransportConfig;

/// Default endpoint used when neither the builder nor the environment
/// provides one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:4566";

/// Static configuration for a [`Client`](crate::Client).
///
/// All fields have defaults; [`ClientConfig::from_env`] additionally honors
/// `STRATUS_*` environment overrides.
///
/// # Example
///
/// ```
/// use stratus_runtime::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .service("matches")
///     .region("eu-west-1")
///     .endpoint("https://matches.example.com")
///     .build();
/// assert_eq!(config.region, "eu-west-1");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct ClientConfig {
    /// Service name, used for signing scope.
    #[builder(default = "stratus".to_owned(), setter(into))]
    pub service: String,

    /// Region, used for signing scope.
    #[builder(default = "us-east-1".to_owned(), setter(into))]
    pub region: String,

    /// Base endpoint URL requests are sent to.
    #[builder(default = DEFAULT_ENDPOINT.to_owned(), setter(into))]
    pub endpoint: String,

    /// Maximum time to establish a connection.
    #[builder(default = Duration::from_secs(10))]
    pub connect_timeout: Duration,

    /// Maximum time for the full request/response exchange.
    #[builder(default = Duration::from_secs(30))]
    pub read_timeout: Duration,

    /// Value stamped into the `user-agent` header of every request.
    #[builder(default = default_user_agent(), setter(into))]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientConfig {
    /// Build a configuration from environment variables, falling back to the
    /// defaults for anything unset:
    ///
    /// - `STRATUS_SERVICE`
    /// - `STRATUS_REGION`
    /// - `STRATUS_ENDPOINT`
    /// - `STRATUS_CONNECT_TIMEOUT_MS`
    /// - `STRATUS_READ_TIMEOUT_MS`
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(service) = std::env::var("STRATUS_SERVICE") {
            config.service = service;
        }
        if let Ok(region) = std::env::var("STRATUS_REGION") {
            config.region = region;
        }
        if let Ok(endpoint) = std::env::var("STRATUS_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(ms) = env_millis("STRATUS_CONNECT_TIMEOUT_MS") {
            config.connect_timeout = ms;
        }
        if let Some(ms) = env_millis("STRATUS_READ_TIMEOUT_MS") {
            config.read_timeout = ms;
        }
        config
    }

    /// The transport-level slice of this configuration.
    #[must_use]
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
        }
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn default_user_agent() -> String {
    format!("stratus/{}", env!("CARGO_PKG_VERSION"))
}
