//! Authentication and signing error types.

use chrono::{DateTime, Utc};

/// Errors raised while resolving credentials or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The resolver produced credentials that are already expired.
    #[error("credentials expired at {0}")]
    CredentialsExpired(DateTime<Utc>),

    /// The credential refresh round trip failed.
    #[error("credential refresh failed: {0}")]
    RefreshFailed(String),

    /// The request reached the signer before endpoint resolution ran, so no
    /// host header can be derived.
    #[error("cannot sign a request with an unresolved endpoint")]
    EndpointNotResolved,

    /// A computed signing header contained bytes not legal in HTTP.
    #[error("invalid value computed for signing header {0}")]
    InvalidSigningHeader(&'static str),
}
