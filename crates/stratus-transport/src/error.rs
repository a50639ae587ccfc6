//! Transport error types.

use std::time::Duration;

/// A failure to obtain an HTTP response.
///
/// These are "no response" faults: the service never spoke, or the connection
/// died mid-body. Responses with error statuses are returned successfully and
/// classified by the pipeline's error handler instead.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection establishment or DNS resolution failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The exchange did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),

    /// The response body could not be read to completion.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The request was cancelled before a response arrived.
    #[error("request was cancelled")]
    Cancelled,

    /// The wire request was not in a sendable state.
    #[error("invalid wire request: {0}")]
    InvalidRequest(String),
}
