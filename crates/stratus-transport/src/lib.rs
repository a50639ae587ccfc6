//! HTTP transport seam and implementations for Stratus.
//!
//! The pipeline talks to the network through exactly one interface,
//! [`HttpTransport`]: send a wire request, get back status, headers, and body.
//! Platform-specific implementations live behind it — [`NativeTransport`] for
//! real sockets, [`StaticTransport`] for canned responses in tests and
//! offline use.
//!
//! Cancellation is honored here and only here: a started network operation
//! either completes or is abandoned; no handler rollback is attempted.

mod cancel;
mod config;
mod error;
mod native;
mod r#static;

pub use cancel::CancelToken;
pub use config::TransportConfig;
pub use error::TransportError;
pub use native::NativeTransport;
pub use r#static::StaticTransport;

use async_trait::async_trait;
use stratus_model::{WireRequest, WireResponse};

/// Sends bytes over the network and returns the raw HTTP response.
///
/// The request's endpoint must already be resolved. Implementations read the
/// full body before returning; header lookup on the returned response is
/// case-insensitive.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Transmit `request` and collect the response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] for connect/DNS failures, timeouts, body
    /// read failures, and cancellation. An HTTP error status is *not* a
    /// transport error; classification happens upstream.
    async fn send(
        &self,
        request: &WireRequest,
        cancel: &CancelToken,
    ) -> Result<WireResponse, TransportError>;
}
