//! Per-request mutable context passed through the handler chain.
//!
//! One context exists per request and is never shared between requests. A
//! handler that claims a request writes the response side before returning
//! true; a handler that declines must leave the response side untouched so
//! later entries in the chain see a clean slate.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Response, StatusCode};
use http_body_util::Full;

pub struct RequestContext {
    method: Method,
    target: String,
    headers: HeaderMap,
    body: Bytes,
    response: ResponseSlot,
}

#[derive(Default)]
struct ResponseSlot {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestContext {
    pub fn new(method: Method, target: String, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            target,
            headers,
            body,
            response: ResponseSlot::default(),
        }
    }

    /// Convenience constructor for a bodyless request.
    pub fn for_request(method: Method, target: &str) -> Self {
        Self::new(method, target.to_string(), HeaderMap::new(), Bytes::new())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.response.status = Some(status);
    }

    pub fn insert_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response.headers.insert(name, value);
    }

    pub fn write_body(&mut self, body: impl Into<Bytes>) {
        self.response.body = body.into();
    }

    /// A response has been committed once a handler set a status.
    pub fn is_committed(&self) -> bool {
        self.response.status.is_some()
    }

    pub fn response_status(&self) -> Option<StatusCode> {
        self.response.status
    }

    pub fn response_body(&self) -> &Bytes {
        &self.response.body
    }

    /// Consume the context and build the HTTP response for the transport.
    ///
    /// Only meaningful after a handler committed a response; an uncommitted
    /// context yields 200 with whatever (usually empty) body was written.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.response.body));
        *response.status_mut() = self.response.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.response.headers;
        response
    }
}
