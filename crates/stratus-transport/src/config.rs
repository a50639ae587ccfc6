//! Transport configuration.

use std::time::Duration;

/// Timeouts for the native transport.
///
/// Timeout expiry is a transport fault like any other network failure; it is
/// not a distinct state in the pipeline's error taxonomy.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
    /// Maximum time for the full request/response exchange.
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
        }
    }
}
