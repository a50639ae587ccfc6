//! Service error body parsing.
//!
//! Services report errors as JSON (primary) or XML (fallback). The format is
//! auto-detected by sniffing the first non-whitespace byte of the body: `<`
//! means XML, anything else is treated as JSON.
//!
//! JSON bodies carry `code` (or the namespaced `__type` form) and `message`:
//!
//! ```json
//! {"__type":"com.stratus.matches#InvalidParameter","message":"bad input"}
//! ```
//!
//! XML bodies come either wrapped or flat:
//!
//! ```xml
//! <ErrorResponse><Error><Code>InvalidParameter</Code>...</Error></ErrorResponse>
//! <Error><Code>InvalidParameter</Code>...</Error>
//! ```
//!
//! The parsed [`ErrorDetails`] is a transient intermediate: the pipeline's
//! error classifier maps it to a typed error and discards it.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::UnmarshalError;
use crate::wire::WireResponse;

/// Header carrying the error code when a response has no body.
pub const HEADER_ERROR_CODE: &str = "x-stratus-error-code";
/// Header carrying the error type classification when a response has no body.
pub const HEADER_ERROR_TYPE: &str = "x-stratus-error-type";
/// Header carrying the service-assigned request id.
pub const HEADER_REQUEST_ID: &str = "x-stratus-request-id";

/// Which side of the wire a service blames for the fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultKind {
    /// The request was at fault (4xx semantics).
    Client,
    /// The service was at fault (5xx semantics).
    Server,
    /// The service did not say.
    #[default]
    Unknown,
}

impl FaultKind {
    fn from_wire(s: &str) -> Self {
        match s {
            "Sender" | "Client" => Self::Client,
            "Receiver" | "Server" => Self::Server,
            _ => Self::Unknown,
        }
    }
}

/// Wire-level error intermediate parsed from an error body or headers.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    /// Short error code, namespace prefix stripped (`InvalidParameter`).
    pub code: String,
    /// Human-readable message from the service.
    pub message: String,
    /// Service-assigned request id, when reported.
    pub request_id: Option<String>,
    /// Client/server fault classification, when reported.
    pub fault: FaultKind,
}

/// JSON error body shape. Field spellings vary across the provider's JSON
/// protocols, so every field accepts its known aliases.
#[derive(serde::Deserialize)]
struct JsonErrorBody {
    #[serde(alias = "Code", alias = "__type")]
    code: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
    #[serde(alias = "RequestId", alias = "requestId")]
    request_id: Option<String>,
}

impl ErrorDetails {
    /// Parse an error body, auto-detecting JSON vs XML.
    ///
    /// # Errors
    ///
    /// Returns [`UnmarshalError`] if the body is empty, unparseable, or
    /// missing the error code.
    pub fn parse(body: &[u8]) -> Result<Self, UnmarshalError> {
        let first = body.iter().copied().find(|b| !b.is_ascii_whitespace());
        match first {
            None => Err(UnmarshalError::Invalid("empty error body".to_owned())),
            Some(b'<') => Self::parse_xml(body),
            Some(_) => Self::parse_json(body),
        }
    }

    /// Synthesize minimal details from response headers when the body is
    /// absent (pure transport-level error responses).
    #[must_use]
    pub fn from_headers(response: &WireResponse) -> Self {
        let code = response
            .header(HEADER_ERROR_CODE)
            .map_or_else(|| response.status().to_string(), ToOwned::to_owned);
        let fault = response
            .header(HEADER_ERROR_TYPE)
            .map(FaultKind::from_wire)
            .unwrap_or_default();
        Self {
            code,
            message: format!("service returned {} with no error body", response.status()),
            request_id: response.header(HEADER_REQUEST_ID).map(ToOwned::to_owned),
            fault,
        }
    }

    fn parse_json(body: &[u8]) -> Result<Self, UnmarshalError> {
        let parsed: JsonErrorBody = serde_json::from_slice(body)?;
        let code = parsed.code.ok_or(UnmarshalError::MissingField("code"))?;
        Ok(Self {
            code: strip_namespace(&code).to_owned(),
            message: parsed.message.unwrap_or_default(),
            request_id: parsed.request_id,
            fault: FaultKind::Unknown,
        })
    }

    fn parse_xml(body: &[u8]) -> Result<Self, UnmarshalError> {
        let mut reader = Reader::from_reader(body);
        reader.config_mut().trim_text(true);

        let mut code = None;
        let mut message = None;
        let mut request_id = None;
        let mut fault = FaultKind::Unknown;

        // Walk every element; `<Error>` may be the root or nested inside
        // `<ErrorResponse>`, so field names alone are enough to dispatch.
        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"Code" => code = Some(read_text(&mut reader)?),
                    b"Message" => message = Some(read_text(&mut reader)?),
                    b"RequestId" => request_id = Some(read_text(&mut reader)?),
                    b"Type" => fault = FaultKind::from_wire(&read_text(&mut reader)?),
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        let code = code.ok_or(UnmarshalError::MissingField("code"))?;
        Ok(Self {
            code: strip_namespace(&code).to_owned(),
            message: message.unwrap_or_default(),
            request_id,
            fault,
        })
    }
}

/// Strip a `namespace#` prefix from a namespaced error type
/// (`com.stratus.matches#InvalidParameter` → `InvalidParameter`).
fn strip_namespace(code: &str) -> &str {
    code.rsplit_once('#').map_or(code, |(_, short)| short)
}

/// Read the text content of the current element through its end tag.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, UnmarshalError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| UnmarshalError::Invalid(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::End(_) => return Ok(text),
            Event::Eof => {
                return Err(UnmarshalError::Invalid(
                    "unexpected EOF in error body".to_owned(),
                ));
            }
            _ => {}
        }
    }
}
