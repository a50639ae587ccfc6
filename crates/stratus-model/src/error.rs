//! Marshalling and unmarshalling error types.

/// Errors raised while converting a typed request into wire bytes.
#[derive(Debug, thiserror::Error)]
pub enum MarshalError {
    /// The request body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A header value contained bytes that are not legal in HTTP.
    #[error("invalid value for header {name}")]
    InvalidHeader {
        /// Name of the offending header.
        name: String,
    },

    /// The typed request failed client-side validation.
    #[error("invalid request: {0}")]
    Invalid(String),
}

/// Errors raised while converting wire bytes back into a typed value.
#[derive(Debug, thiserror::Error)]
pub enum UnmarshalError {
    /// The body was not valid JSON for the expected shape.
    #[error("failed to parse JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The body was not valid XML for the expected shape.
    #[error("failed to parse XML body: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A field the protocol requires was absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The body was present but not intelligible as either wire format.
    #[error("unexpected payload: {0}")]
    Invalid(String),
}
