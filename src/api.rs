use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::Profile;

pub mod data_stream;
mod decode;
pub mod decoder;
mod error;
mod paginate;
mod param;
mod path;
pub mod preset;
pub mod project;
pub mod search_use_case;
pub mod sync_item;
pub mod sync_task;
pub mod user;
pub mod widget;

#[cfg(test)]
pub(crate) mod testutil;

pub use decode::MAX_DEPTH;
pub use error::*;
pub use paginate::*;
pub use param::*;
pub use path::resolve_path;

/// A single resource, as returned in the `data` field of a response or of a
/// nested relation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Item<T> {
    /// The resource itself.
    pub data: T,
    /// Response metadata, if the server sent any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> Item<T> {
    /// Discard the envelope and return the resource.
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// A list of resources, in server order, with optional pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Collection<T> {
    /// The resources, in the order the server returned them.
    pub data: Vec<T>,
    /// Response metadata, usually carrying [Pagination].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> Collection<T> {
    /// The pagination metadata, if present.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.meta.as_ref()?.pagination.as_ref()
    }

    /// The page following this one, if the server reported one.
    pub fn next_page(&self) -> Option<u32> {
        self.pagination()?.next_page()
    }

    /// The number of resources in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether this page is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// The response to an operation whose success carries no payload (for
/// example, a delete).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoContent;

/// The method and URI of a dispatched request, kept for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// The HTTP method.
    pub method: http::Method,
    /// The full request URI, including the query string.
    pub uri: http::Uri,
}

impl RequestLine {
    fn of<B>(req: &http::Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
        }
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

/// Implemented by types that can be sent as requests to the Emsearch API.
pub trait ApiRequest: Sized {
    /// The corresponding response type.
    type Response: ApiResponse;

    /// The concrete request path. Identifiers are taken from the resource
    /// the request targets.
    fn path(&self) -> Result<String, MissingIdentifier>;

    /// The method to use.
    fn method(&self) -> http::Method {
        http::Method::GET
    }

    /// The single status code that signals success for this operation. Any
    /// other status is treated as an error.
    fn expected_status(&self) -> http::StatusCode {
        http::StatusCode::OK
    }

    /// The serializable query string.
    fn query(&self) -> Option<impl Serialize> {
        None::<&()>
    }

    /// The serializable form body.
    fn body(&self) -> Option<impl Serialize> {
        None::<&()>
    }

    /// Consume the request and return an [http::Request] suitable for passing
    /// to your favorite HTTP client.
    fn into_request(self, profile: &Profile) -> Result<http::Request<String>, ApiError> {
        let prefix = profile.api_endpoint.path().trim_end_matches('/');
        let mut path = format!("{prefix}{}", self.path()?);

        if let Some(query) = self.query() {
            let qs = serde_qs::to_string(&query)?;
            if !qs.is_empty() {
                path.push('?');
                path.push_str(&qs);
            }
        }

        let mut parts = profile.api_endpoint.clone().into_parts();
        parts.path_and_query = Some(path.parse().map_err(http::Error::from)?);
        let uri = http::Uri::from_parts(parts).map_err(http::Error::from)?;

        let req = http::Request::builder()
            .method(self.method())
            .uri(uri)
            .header(http::header::ACCEPT, "application/json")
            .header(
                http::header::AUTHORIZATION,
                format!("Bearer {}", profile.api_key),
            )
            .header(http::header::USER_AGENT, &profile.user_agent);

        let req = if let Some(body) = self.body() {
            let body = serde_qs::to_string(&body)?;
            req.header(
                http::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .header(http::header::CONTENT_LENGTH, body.len())
            .body(body)?
        } else {
            req.body(String::new())?
        };

        Ok(req)
    }
}

/// Implemented by types that can be read as responses from the Emsearch API.
pub trait ApiResponse: Sized {
    /// Decode a success body.
    fn from_body(body: &[u8]) -> Result<Self, DeserializationError>;

    /// Read the response from an [http::Response] object, checking its status
    /// against the one the operation expects.
    fn from_response(
        resp: http::Response<impl AsRef<[u8]>>,
        expected: http::StatusCode,
    ) -> Result<Self, ApiError> {
        let (parts, body) = resp.into_parts();
        Self::from_response_parts(parts, body.as_ref(), expected)
    }

    /// Read the response from pre-collected parts. Useful for async HTTP
    /// clients where the body must be collected before parsing.
    fn from_response_parts(
        parts: http::response::Parts,
        body: &[u8],
        expected: http::StatusCode,
    ) -> Result<Self, ApiError> {
        if parts.status != expected {
            return Err(UnexpectedResponse::new(parts.status, expected, body).into());
        }

        Ok(Self::from_body(body)?)
    }
}

/// A private trait for the resource types that can appear in the `data` field
/// of a response envelope.
pub(crate) trait Resource: DeserializeOwned {}

impl<T: Resource> ApiResponse for Item<T> {
    fn from_body(body: &[u8]) -> Result<Self, DeserializationError> {
        decode::decode(body)
    }
}

impl<T: Resource> ApiResponse for Collection<T> {
    fn from_body(body: &[u8]) -> Result<Self, DeserializationError> {
        decode::decode(body)
    }
}

impl ApiResponse for NoContent {
    fn from_body(_body: &[u8]) -> Result<Self, DeserializationError> {
        Ok(NoContent)
    }
}

/// The HTTP capability the client dispatches through. Connection reuse,
/// TLS, timeouts and retries are the transport's business.
pub trait Transport {
    /// Execute one request. Error statuses must be returned as responses, not
    /// as errors.
    fn send(&self, req: http::Request<String>) -> Result<http::Response<Vec<u8>>, TransportError>;
}

/// The largest response body the [ureq::Agent] transport reads. Larger
/// bodies fail with [ApiError::Transport].
pub const MAX_RESPONSE_BYTES: u64 = 128 * 1024 * 1024;

impl Transport for ureq::Agent {
    fn send(&self, req: http::Request<String>) -> Result<http::Response<Vec<u8>>, TransportError> {
        let resp = self.run(req).map_err(TransportError::new)?;
        let (parts, mut body) = resp.into_parts();
        let body = body
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_vec()
            .map_err(TransportError::new)?;
        Ok(http::Response::from_parts(parts, body))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, req: http::Request<String>) -> Result<http::Response<Vec<u8>>, TransportError> {
        (**self).send(req)
    }
}

/// A client bound to one [Profile] and one [Transport].
#[derive(Debug, Clone)]
pub struct Client<T = ureq::Agent> {
    profile: Profile,
    transport: T,
}

impl Client {
    /// Create a client that dispatches through a [ureq::Agent], using the
    /// profile's timeout. Response bodies are capped at
    /// [MAX_RESPONSE_BYTES]; use [Client::with_transport] for other limits.
    pub fn new(profile: Profile) -> Self {
        // Allows error responses to be parsed.
        let config = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(profile.timeout)
            .build();

        Self {
            transport: ureq::Agent::new_with_config(config),
            profile,
        }
    }
}

impl<T: Transport> Client<T> {
    /// Create a client that dispatches through the given transport.
    pub fn with_transport(profile: Profile, transport: T) -> Self {
        Self { profile, transport }
    }

    /// The profile requests are built with.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Execute an API request and parse the response.
    pub fn roundtrip<R: ApiRequest>(&self, req: R) -> Result<R::Response, ApiError> {
        let expected = req.expected_status();
        let req = req.into_request(&self.profile)?;
        let line = RequestLine::of(&req);
        debug!(method = %line.method, uri = %line.uri, "dispatching request");

        let resp = self.transport.send(req)?;
        debug!(status = %resp.status(), bytes = resp.body().len(), "received response");

        R::Response::from_response(resp, expected).map_err(|e| e.with_request(line))
    }
}
