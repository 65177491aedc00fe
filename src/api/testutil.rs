//! Test utilities for API unit tests.

use std::{
    cell::{Ref, RefCell},
    collections::{BTreeMap, VecDeque},
};

use crate::{Client, Profile, Transport, TransportError};

/// A request as seen by the [StubTransport].
#[derive(Debug)]
pub(crate) struct Recorded {
    pub(crate) method: http::Method,
    pub(crate) uri: http::Uri,
    pub(crate) headers: http::HeaderMap,
    pub(crate) body: String,
}

impl Recorded {
    pub(crate) fn path(&self) -> &str {
        self.uri.path()
    }

    /// The decoded query string.
    pub(crate) fn query(&self) -> BTreeMap<String, String> {
        serde_qs::from_str(self.uri.query().unwrap_or("")).expect("query should decode")
    }

    /// The decoded form body.
    pub(crate) fn form(&self) -> BTreeMap<String, String> {
        serde_qs::from_str(&self.body).expect("form body should decode")
    }
}

/// A transport that replays canned responses, in order, and records the
/// requests it receives.
#[derive(Debug, Default)]
pub(crate) struct StubTransport {
    responses: RefCell<VecDeque<Result<(u16, String), String>>>,
    requests: RefCell<Vec<Recorded>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub(crate) fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok((status, body.into())));
        self
    }

    /// Queue a transport failure.
    pub(crate) fn fail(self, message: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(message.to_string()));
        self
    }

    pub(crate) fn requests(&self) -> Ref<'_, Vec<Recorded>> {
        self.requests.borrow()
    }

    /// The most recent request.
    pub(crate) fn last(&self) -> Ref<'_, Recorded> {
        Ref::map(self.requests.borrow(), |r| {
            r.last().expect("no request was sent")
        })
    }
}

impl Transport for StubTransport {
    fn send(&self, req: http::Request<String>) -> Result<http::Response<Vec<u8>>, TransportError> {
        let (parts, body) = req.into_parts();
        self.requests.borrow_mut().push(Recorded {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });

        let next = self
            .responses
            .borrow_mut()
            .pop_front()
            .expect("no stubbed response left");

        match next {
            Ok((status, body)) => Ok(http::Response::builder()
                .status(status)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(body.into_bytes())
                .expect("stub response should be valid")),
            Err(message) => Err(TransportError::new(message)),
        }
    }
}

pub(crate) fn test_profile() -> Profile {
    Profile::new("http://emsearch.test", "test-key").expect("test profile should be valid")
}

pub(crate) fn client(stub: &StubTransport) -> Client<&StubTransport> {
    Client::with_transport(test_profile(), stub)
}
