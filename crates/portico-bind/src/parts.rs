//! Buffered view of an incoming request.
//!
//! [`RequestParts`] is what every binder reads from: method, URI, headers and
//! the fully buffered body.

use bytes::Bytes;
use http::{header, HeaderMap, Method, Request, Uri};

/// Method, URI, headers and body of one request.
///
/// # Example
///
/// ```rust
/// use portico_bind::RequestParts;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let parts = RequestParts::new(
///     Method::GET,
///     Uri::from_static("/users?page=2"),
///     HeaderMap::new(),
///     Bytes::new(),
/// );
///
/// assert_eq!(parts.method(), &Method::GET);
/// assert_eq!(parts.query_string(), Some("page=2"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestParts {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestParts {
    /// Creates request parts from their components.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Splits a buffered `http::Request`.
    ///
    /// Extensions and the HTTP version are discarded.
    #[must_use]
    pub fn from_request(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the raw query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the parts and returns the body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Checks if the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl From<Request<Bytes>> for RequestParts {
    fn from(request: Request<Bytes>) -> Self {
        Self::from_request(request)
    }
}

/// Builder for [`RequestParts`].
///
/// Method defaults to `GET` and URI to `/`.
#[derive(Debug, Default)]
pub struct RequestPartsBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestPartsBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Adds a single header. Values that are not valid header values are
    /// skipped.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the Content-Type header.
    #[must_use]
    pub fn content_type(self, value: &str) -> Self {
        self.header("content-type", value)
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the request parts.
    #[must_use]
    pub fn build(self) -> RequestParts {
        RequestParts {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_else(|| Uri::from_static("/")),
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_creation() {
        let parts = RequestParts::new(
            Method::GET,
            Uri::from_static("/users/42?active=true"),
            HeaderMap::new(),
            Bytes::new(),
        );

        assert_eq!(parts.method(), &Method::GET);
        assert_eq!(parts.path(), "/users/42");
        assert_eq!(parts.query_string(), Some("active=true"));
        assert!(parts.is_body_empty());
    }

    #[test]
    fn test_from_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/orders?dry_run=1")
            .header("Content-Type", "application/json")
            .body(Bytes::from_static(br#"{"sku":"A-1"}"#))
            .unwrap();

        let parts = RequestParts::from(request);
        assert_eq!(parts.method(), &Method::POST);
        assert_eq!(parts.content_type(), Some("application/json"));
        assert_eq!(parts.query_string(), Some("dry_run=1"));
        assert_eq!(parts.into_body(), Bytes::from_static(br#"{"sku":"A-1"}"#));
    }

    #[test]
    fn test_builder_defaults() {
        let parts = RequestPartsBuilder::new().build();
        assert_eq!(parts.method(), &Method::GET);
        assert_eq!(parts.path(), "/");
        assert_eq!(parts.query_string(), None);
        assert_eq!(parts.content_type(), None);
    }

    #[test]
    fn test_builder() {
        let parts = RequestPartsBuilder::new()
            .method(Method::PUT)
            .uri(Uri::from_static("/api/users"))
            .content_type("application/x-www-form-urlencoded")
            .header("x-request-id", "abc-123")
            .body("name=alice")
            .build();

        assert_eq!(parts.method(), &Method::PUT);
        assert_eq!(parts.content_type(), Some("application/x-www-form-urlencoded"));
        assert_eq!(parts.header("x-request-id"), Some("abc-123"));
        assert_eq!(parts.header("missing"), None);
        assert_eq!(parts.body(), &Bytes::from_static(b"name=alice"));
    }

    #[test]
    fn test_builder_skips_invalid_header_value() {
        let parts = RequestPartsBuilder::new()
            .header("x-bad", "line\nbreak")
            .build();
        assert!(parts.headers().is_empty());
    }
}
