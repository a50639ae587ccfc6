//! Credentials and credential resolvers.
//!
//! [`Credentials`] is an immutable value; a resolver replaces its cached copy
//! with a freshly generated one on refresh, never mutating in place. The
//! [`RefreshingCredentialsProvider`] guarantees that credentials returned are
//! not expired at the moment of return and that concurrent callers during an
//! in-flight refresh share a single upstream round trip.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AuthError;

/// Immutable access credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    expiration: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Create long-lived credentials with no session token or expiration.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            expiration: None,
        }
    }

    /// Attach a session token (temporary credentials).
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Attach an expiration timestamp.
    #[must_use]
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Access key id.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key.
    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Session token, for temporary credentials.
    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Expiration timestamp, if these credentials expire.
    #[must_use]
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// Whether the credentials expire within `window` of `now`.
    /// Credentials without an expiration never expire.
    #[must_use]
    pub fn expires_within_at(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|exp| exp - now <= window)
    }

    /// Whether the credentials expire within `window` of the current time.
    #[must_use]
    pub fn expires_within(&self, window: Duration) -> bool {
        self.expires_within_at(window, Utc::now())
    }
}

/// Supplies access credentials to the signing handler.
///
/// The contract: credentials returned are never expired at the moment of
/// return. A failed refresh surfaces as [`AuthError`]; retrying is the
/// caller's (or an external retry policy's) decision.
#[async_trait]
pub trait ProvideCredentials: Send + Sync {
    /// Resolve credentials, refreshing if required. May perform a network
    /// round trip on first use or upon expiry.
    async fn credentials(&self) -> Result<Credentials, AuthError>;

    /// Drop any cached identity, forcing a fresh fetch on the next call.
    async fn clear(&self) {}
}

/// Fixed credentials known at client construction.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    /// Wrap fixed credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl ProvideCredentials for StaticCredentialsProvider {
    async fn credentials(&self) -> Result<Credentials, AuthError> {
        if let Some(exp) = self.credentials.expiration() {
            if exp <= Utc::now() {
                return Err(AuthError::CredentialsExpired(exp));
            }
        }
        Ok(self.credentials.clone())
    }
}

/// The upstream round trip that generates fresh credentials
/// (identity federation, role assumption). External to this crate.
#[async_trait]
pub trait RefreshCredentials: Send + Sync {
    /// Fetch freshly generated credentials.
    async fn refresh(&self) -> Result<Credentials, AuthError>;
}

/// Caching resolver that refreshes credentials before they expire.
///
/// The cache is guarded by an async mutex held across the refresh round trip,
/// so concurrent callers that all observe expiring credentials perform exactly
/// one upstream refresh and then share its result.
pub struct RefreshingCredentialsProvider<S> {
    source: S,
    refresh_window: Duration,
    cached: Mutex<Option<Credentials>>,
}

impl<S> std::fmt::Debug for RefreshingCredentialsProvider<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshingCredentialsProvider")
            .field("refresh_window", &self.refresh_window)
            .finish_non_exhaustive()
    }
}

impl<S: RefreshCredentials> RefreshingCredentialsProvider<S> {
    /// Default margin before expiry at which a refresh is triggered.
    pub const DEFAULT_REFRESH_WINDOW_SECS: i64 = 300;

    /// Create a resolver over the given refresh source with the default
    /// pre-expiry refresh window.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_refresh_window(source, Duration::seconds(Self::DEFAULT_REFRESH_WINDOW_SECS))
    }

    /// Create a resolver with an explicit pre-expiry refresh window.
    #[must_use]
    pub fn with_refresh_window(source: S, refresh_window: Duration) -> Self {
        Self {
            source,
            refresh_window,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<S: RefreshCredentials> ProvideCredentials for RefreshingCredentialsProvider<S> {
    async fn credentials(&self) -> Result<Credentials, AuthError> {
        let mut cached = self.cached.lock().await;

        // Double-check under the lock: a concurrent caller may have already
        // refreshed while this task waited.
        if let Some(creds) = cached.as_ref() {
            if !creds.expires_within(self.refresh_window) {
                return Ok(creds.clone());
            }
        }

        debug!("credentials missing or expiring, refreshing");
        let fresh = self.source.refresh().await?;
        if let Some(exp) = fresh.expiration() {
            if exp <= Utc::now() {
                return Err(AuthError::CredentialsExpired(exp));
            }
        }
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    async fn clear(&self) {
        self.cached.lock().await.take();
    }
}
