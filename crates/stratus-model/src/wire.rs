//! Wire-level request and response representations.
//!
//! A [`WireRequest`] is created by an operation's marshaller and then mutated
//! by successive pipeline handlers: the endpoint resolver fills in the target
//! URI, the signer adds authentication headers. It lives for exactly one call.
//!
//! A [`WireResponse`] is constructed once by the transport from the raw HTTP
//! response and is never mutated afterwards.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode};

use crate::error::MarshalError;

/// Outbound request under construction by the pipeline.
///
/// Query parameters are stored in their final URL-encoded form; the signer
/// sorts them but never re-encodes, so the signature always covers the exact
/// bytes that go on the wire.
#[derive(Debug, Clone)]
pub struct WireRequest {
    operation: &'static str,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
    endpoint: Option<String>,
}

impl WireRequest {
    /// Create a request for the named operation against a service-relative path.
    #[must_use]
    pub fn new(operation: &'static str, method: Method, path: impl Into<String>) -> Self {
        Self {
            operation,
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            endpoint: None,
        }
    }

    /// Operation name this request was marshalled for.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Service-relative path (always beginning with `/`).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// URL-encoded query parameters in insertion order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Append a query parameter. Key and value must already be URL-encoded.
    pub fn add_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Render the query parameters as a query string (no leading `?`).
    #[must_use]
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k.clone()
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable request headers. Inserting an existing name overwrites it.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Insert a header, overwriting any previous value for the same name.
    ///
    /// # Errors
    ///
    /// Returns [`MarshalError::InvalidHeader`] if the value contains bytes
    /// that are not legal in an HTTP header.
    pub fn set_header(&mut self, name: &'static str, value: &str) -> Result<(), MarshalError> {
        let value = HeaderValue::from_str(value).map_err(|_| MarshalError::InvalidHeader {
            name: name.to_owned(),
        })?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Serialized request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Replace the request body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// The fully resolved target URL, if endpoint resolution has run.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Record the fully resolved target URL (base endpoint + path + query).
    pub fn set_endpoint(&mut self, url: impl Into<String>) {
        self.endpoint = Some(url.into());
    }
}

/// Raw HTTP response as returned by the transport.
#[derive(Debug, Clone)]
pub struct WireResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    content_length: u64,
}

impl WireResponse {
    /// Build a response from its transport-level parts.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let content_length = body.len() as u64;
        Self {
            status,
            headers,
            body,
            content_length,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers. Lookup is case-insensitive.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Look up a header value as a string. Returns `None` for missing headers
    /// and for values that are not valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Response body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Content length copied from the transport-level response.
    #[must_use]
    pub fn content_length(&self) -> u64 {
        self.content_length
    }
}
