//! Credential resolution and request signing for Stratus.
//!
//! Two seams of the request pipeline live here:
//!
//! - [`ProvideCredentials`]: supplies access credentials, transparently
//!   refreshing them when expiry is imminent. Concurrent callers during an
//!   in-flight refresh trigger exactly one upstream refresh (single-flight).
//! - [`SignRequest`]: computes a Signature Version 4 signature over the
//!   canonicalized request and writes the `Authorization` header. Signing is
//!   deterministic given identical request bytes, credentials, and timestamp.

mod canonical;
mod credentials;
mod error;
mod sigv4;

pub use credentials::{
    Credentials, ProvideCredentials, RefreshCredentials, RefreshingCredentialsProvider,
    StaticCredentialsProvider,
};
pub use error::AuthError;
pub use sigv4::{NullSigner, SigV4Signer, SignRequest};
