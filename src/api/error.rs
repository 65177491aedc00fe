use std::{borrow::Cow, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::RequestLine;

/// An error encountered while executing an API operation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The transport failed below the HTTP layer (connection refused, timeout,
    /// TLS failure).
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The API responded with a status other than the one the operation
    /// expects.
    #[error(transparent)]
    UnexpectedResponse(Box<UnexpectedResponse>),
    /// A success response did not have the expected shape.
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
    /// The resource targeted by the request lacks an identifier needed for its
    /// path.
    #[error(transparent)]
    MissingIdentifier(#[from] MissingIdentifier),
    /// The request could not be assembled.
    #[error("Failed to build request")]
    Request(#[from] http::Error),
    /// The request parameters could not be encoded.
    #[error("Failed to encode request parameters")]
    Encode(#[from] serde_qs::Error),
}

impl From<UnexpectedResponse> for ApiError {
    fn from(value: UnexpectedResponse) -> Self {
        ApiError::UnexpectedResponse(Box::new(value))
    }
}

impl ApiError {
    /// The HTTP status of the response, if one was received and rejected.
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            ApiError::UnexpectedResponse(resp) => Some(resp.actual),
            _ => None,
        }
    }

    /// The parsed error body, if the server sent one.
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            ApiError::UnexpectedResponse(resp) => resp.envelope.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn with_request(self, line: RequestLine) -> Self {
        match self {
            ApiError::UnexpectedResponse(mut resp) => {
                resp.request = Some(line);
                ApiError::UnexpectedResponse(resp)
            }
            other => other,
        }
    }
}

/// A response whose status did not match the operation's expected status.
#[derive(Debug, Clone)]
pub struct UnexpectedResponse {
    /// The status the server responded with.
    pub actual: http::StatusCode,
    /// The status the operation expects on success.
    pub expected: http::StatusCode,
    /// The request that produced this response.
    pub request: Option<RequestLine>,
    /// The raw response body.
    pub body: Vec<u8>,
    /// The parsed error body, if the response carried a valid one.
    pub envelope: Option<ErrorEnvelope>,
}

impl UnexpectedResponse {
    pub(crate) fn new(actual: http::StatusCode, expected: http::StatusCode, body: &[u8]) -> Self {
        Self {
            actual,
            expected,
            request: None,
            body: body.to_vec(),
            envelope: serde_json::from_slice(body).ok(),
        }
    }

    /// The response body as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl fmt::Display for UnexpectedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (expected {})", self.actual, self.expected)?;
        if let Some(envelope) = &self.envelope {
            write!(f, ": {}", envelope.message)?;
        }

        if let Some(request) = &self.request {
            write!(f, " [{request}]")?;
        }

        Ok(())
    }
}

impl std::error::Error for UnexpectedResponse {}

/// The error body returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorEnvelope {
    /// A human-readable description of the error.
    pub message: String,
    /// Validation errors, keyed by parameter name.
    #[serde(default)]
    pub errors: Option<BTreeMap<String, serde_json::Value>>,
    /// The status code, as reported in the body.
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Server debug output, when the server runs in debug mode.
    #[serde(default)]
    pub debug: Option<serde_json::Value>,
}

/// A success body that could not be decoded into the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum DeserializationError {
    /// The body was not valid JSON.
    #[error("Malformed response body")]
    Json(#[from] serde_json::Error),
    /// The body was valid JSON, but a value did not match the expected type
    /// (missing field, type mismatch, integer overflow).
    #[error("Invalid response at '{path}'")]
    Shape {
        /// The path of the offending value, e.g. `data.fields.data[2].weight`.
        path: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The body was nested more deeply than allowed.
    #[error("Response nested deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit.
        limit: usize,
    },
}

/// A path could not be built because an identifier was unset, empty, or a
/// dot segment (`.` or `..`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing or unusable identifier for path parameter '{token}'")]
pub struct MissingIdentifier {
    /// The name of the path placeholder that could not be filled.
    pub token: String,
}

/// A failure below the HTTP layer, raised by a [super::Transport].
#[derive(Debug, thiserror::Error)]
#[error("Transport failure")]
pub struct TransportError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    /// Wrap an error raised by the underlying HTTP client.
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }

    /// Unwrap the underlying error.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_envelope_tolerates_missing_optional_fields() -> anyhow::Result<()> {
        let envelope: ErrorEnvelope = serde_json::from_str(r#"{"message":"nope"}"#)?;
        assert_eq!(envelope.message, "nope");
        assert_eq!(envelope.errors, None);
        assert_eq!(envelope.status_code, None);
        assert_eq!(envelope.debug, None);

        Ok(())
    }

    #[test]
    fn error_envelope_with_validation_errors() {
        let body = br#"{
            "message": "The given data was invalid.",
            "errors": {"email": ["The email has already been taken."]},
            "status_code": 422,
            "debug": {"line": 12}
        }"#;

        let resp = UnexpectedResponse::new(
            http::StatusCode::UNPROCESSABLE_ENTITY,
            http::StatusCode::CREATED,
            body,
        );

        let envelope = resp.envelope.expect("envelope should parse");
        assert_eq!(envelope.status_code, Some(422));
        assert_eq!(
            envelope.errors.as_ref().map(|e| e.contains_key("email")),
            Some(true)
        );
        assert!(envelope.debug.is_some());
    }

    #[test]
    fn body_keeps_non_utf8_bytes() {
        let body = b"\xff\xfeboom";
        let resp = UnexpectedResponse::new(
            http::StatusCode::BAD_GATEWAY,
            http::StatusCode::OK,
            body,
        );

        assert_eq!(resp.body, body);
        assert_eq!(resp.envelope, None);
        assert_eq!(resp.body_text(), "\u{fffd}\u{fffd}boom");
    }

    #[test]
    fn display_includes_statuses_and_message() {
        let resp = UnexpectedResponse::new(
            http::StatusCode::NOT_FOUND,
            http::StatusCode::OK,
            br#"{"message":"No query results"}"#,
        );

        assert_eq!(
            resp.to_string(),
            "404 Not Found (expected 200 OK): No query results"
        );
    }
}
