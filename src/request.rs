//! Incoming HTTP request type.

use bytes::Bytes;
use http::header::AsHeaderName;
use http::request::Parts;
use http::{Extensions, HeaderMap, Method, Uri};

/// An incoming HTTP request with its body already collected.
///
/// The [`Extensions`] map is the request-scoped context: middleware stores
/// values there under its own types and handlers read them back. It lives
/// exactly as long as the request.
pub struct Request {
    head: Parts,
    body: Bytes,
}

impl Request {
    pub(crate) fn from_parts(head: Parts, body: Bytes) -> Self {
        Self { head, body }
    }

    pub fn method(&self) -> &Method { &self.head.method }
    pub fn uri(&self) -> &Uri { &self.head.uri }
    pub fn path(&self) -> &str { self.head.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.head.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header value as a string. `None` when absent or not visible ASCII.
    pub fn header(&self, name: impl AsHeaderName) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn extensions(&self) -> &Extensions { &self.head.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.head.extensions }
}

/// Build a `Request` from an `http::Request` whose body is already in memory.
impl<B: Into<Bytes>> From<http::Request<B>> for Request {
    fn from(req: http::Request<B>) -> Self {
        let (head, body) = req.into_parts();
        Self::from_parts(head, body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req: Request = http::Request::builder()
            .uri("/accounts/12345?verbose=1")
            .header("X-Request-Id", "abc")
            .body("payload")
            .unwrap()
            .into();

        assert_eq!(req.header("x-request-id"), Some("abc"));
        assert_eq!(req.header("X-REQUEST-ID"), Some("abc"));
        assert_eq!(req.header("x-missing"), None);
        assert_eq!(req.path(), "/accounts/12345");
        assert_eq!(req.body(), b"payload");
    }
}
