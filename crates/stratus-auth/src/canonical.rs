//! Canonical request construction for Signature Version 4.
//!
//! The signature covers a canonicalized rendition of the request:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Every header present on the request at signing time is signed. Query
//! parameters are sorted but never re-encoded: the signature must cover the
//! exact encoding that goes on the wire.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use stratus_model::WireRequest;

/// Characters percent-encoded in URI path segments: everything except the
/// RFC 3986 unreserved set. Forward slashes are preserved.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A canonicalized request ready for hashing, plus the signed-headers list
/// that goes into the `Authorization` header.
#[derive(Debug)]
pub(crate) struct CanonicalRequest {
    pub text: String,
    pub signed_headers: String,
}

impl CanonicalRequest {
    /// Canonicalize `request` with the given payload hash. All headers
    /// currently on the request are included in the signature.
    pub(crate) fn build(request: &WireRequest, payload_hash: &str) -> Self {
        let uri = canonical_uri(request.path());
        let query = canonical_query(request.query());

        // HeaderMap keys are already lowercase; values for repeated names are
        // joined with commas. Values that are not valid UTF-8 cannot be
        // covered by the signature and are skipped.
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in request.headers() {
            let Ok(value) = value.to_str() else { continue };
            let value = collapse_whitespace(value.trim());
            headers
                .entry(name.as_str().to_owned())
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let signed_headers = headers.keys().cloned().collect::<Vec<_>>().join(";");
        let canonical_headers = headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect::<Vec<_>>()
            .join("\n");

        let method = request.method().as_str();
        let text = format!(
            "{method}\n{uri}\n{query}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}"
        );

        Self {
            text,
            signed_headers,
        }
    }
}

/// Normalize a path to its canonical percent-encoded form.
///
/// Each segment is decoded then re-encoded so pre-encoded and raw paths
/// canonicalize identically. Empty paths normalize to `/`.
fn canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, URI_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Sort query parameters by key, then value. Values are already URL-encoded
/// by the marshaller and are preserved byte for byte.
fn canonical_query(params: &[(String, String)]) -> String {
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort_unstable();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Collapse runs of whitespace in a header value to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
