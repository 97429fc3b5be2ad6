//! Response transport abstraction
//!
//! Handlers write through [`ResponseWriter`], which mirrors a streaming HTTP
//! response: headers are set, the status is committed once, then body bytes
//! are written. [`BufferedResponse`] collects everything and converts into an
//! axum `Response`.
//!
//! Writes into a [`BufferedResponse`] cannot fail: socket errors surface inside
//! hyper after the handler has returned. The transport-failure path in the
//! responder (code 1602) is only reached by writers that stream straight to
//! a connection.

use std::io;

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Sink for one HTTP response
pub trait ResponseWriter {
    /// Set a header; only effective before [`commit`](Self::commit)
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Send the status line and headers
    fn commit(&mut self, status: StatusCode);

    /// Write body bytes after the status is committed
    fn write_body(&mut self, body: &[u8]) -> io::Result<()>;
}

/// In-memory response later handed to axum
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl BufferedResponse {
    /// Create an empty, uncommitted response
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed status, if any
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Headers set so far
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body written so far
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl ResponseWriter for BufferedResponse {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.status.is_none() {
            self.headers.insert(name, value);
        }
    }

    fn commit(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(body);
        Ok(())
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}
