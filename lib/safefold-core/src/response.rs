//! Raw HTTP responses as delivered by a transport.
//!
//! [`Response`] is what an [`HttpClient`](crate::HttpClient) returns. It is
//! turned into an [`Outcome`] with [`Outcome::from_transport`], which decides
//! whether the exchange carries a body and keeps the bytes as raw text.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Error, Method, Outcome, Result};

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }
}

impl Response<Bytes> {
    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }
}

/// Returns `true` if a response to `method` with `status` can carry a body.
///
/// Informational (1xx), 204 No Content, 205 Reset Content, 304 Not Modified
/// and every response to HEAD carry none.
#[must_use]
pub const fn carries_body(method: Method, status: u16) -> bool {
    !matches!(method, Method::Head) && !matches!(status, 100..=199 | 204 | 205 | 304)
}

impl<S, D> Outcome<S, D> {
    /// Build the outcome of an exchange from what the transport delivered.
    ///
    /// - a transport error becomes a transport failure;
    /// - a response becomes a responded outcome whatever its status, error
    ///   statuses included, with `deserializer` attached but not applied;
    /// - the body is absent when the exchange carries none (see
    ///   [`carries_body`]) and present, possibly empty, otherwise;
    /// - a body that is not UTF-8 cannot be read and becomes a transport
    ///   failure.
    pub fn from_transport(method: Method, result: Result<Response<Bytes>>, deserializer: D) -> Self {
        let response = match result {
            Ok(response) => response,
            Err(cause) => return Self::transport_failed(cause),
        };

        let status = response.status();
        if !carries_body(method, status) {
            return Self::responded(status, None, deserializer);
        }

        match response.text() {
            Ok(text) => Self::responded(status, Some(text), deserializer),
            Err(error) => Self::transport_failed(Error::connection(format!(
                "response body for status {status} is not UTF-8: {error}"
            ))),
        }
    }
}
