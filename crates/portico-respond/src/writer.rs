//! The [`ResponseWriter`] abstraction and an in-memory implementation.
//!
//! A response writer separates header setup from the status line: headers
//! are edited freely until [`ResponseWriter::write_status`] commits them
//! together with the status. Writing body bytes before a status commits
//! `200 OK`.

use std::io;

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use tracing::warn;

/// A response sink with explicit header commit.
///
/// Body bytes go through [`io::Write`].
pub trait ResponseWriter: io::Write {
    /// Headers that will be sent when the status is written.
    fn headers(&self) -> &HeaderMap;

    /// Mutable access to the pending headers. Changes made after the status
    /// is committed are not sent.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commits the status line and the current headers. Only the first call
    /// has an effect.
    fn write_status(&mut self, status: StatusCode);

    /// The committed status, `None` while headers are still open.
    fn status(&self) -> Option<StatusCode>;
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn headers(&self) -> &HeaderMap {
        (**self).headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        (**self).write_status(status);
    }

    fn status(&self) -> Option<StatusCode> {
        (**self).status()
    }
}

/// A [`ResponseWriter`] that buffers the whole response in memory.
///
/// # Example
///
/// ```rust
/// use portico_respond::{BufferedResponse, ResponseWriter};
/// use http::{header, HeaderValue, StatusCode};
/// use std::io::Write;
///
/// let mut w = BufferedResponse::new();
/// w.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
/// w.write_status(StatusCode::ACCEPTED);
/// w.headers_mut().insert("x-late", HeaderValue::from_static("dropped"));
/// w.write_all(b"queued").unwrap();
///
/// let response = w.into_response();
/// assert_eq!(response.status(), StatusCode::ACCEPTED);
/// assert!(response.headers().get("x-late").is_none());
/// assert_eq!(response.body().as_ref(), b"queued");
/// ```
#[derive(Debug, Default)]
pub struct BufferedResponse {
    headers: HeaderMap,
    committed: Option<(StatusCode, HeaderMap)>,
    body: Vec<u8>,
}

impl BufferedResponse {
    /// Creates an empty response with no headers and no status.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers as committed by [`ResponseWriter::write_status`].
    #[must_use]
    pub fn committed_headers(&self) -> Option<&HeaderMap> {
        self.committed.as_ref().map(|(_, headers)| headers)
    }

    /// Body bytes written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into an `http::Response`.
    ///
    /// A response that never committed a status is sent as `200 OK` with
    /// its pending headers.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let (status, headers) = self
            .committed
            .unwrap_or((StatusCode::OK, self.headers));

        let mut response = Response::new(Bytes::from(self.body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl ResponseWriter for BufferedResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        if let Some((committed, _)) = &self.committed {
            warn!(
                committed = committed.as_u16(),
                ignored = status.as_u16(),
                "superfluous write_status call"
            );
            return;
        }
        self.committed = Some((status, self.headers.clone()));
    }

    fn status(&self) -> Option<StatusCode> {
        self.committed.as_ref().map(|(status, _)| *status)
    }
}

impl io::Write for BufferedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.committed.is_none() {
            self.write_status(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{header, HeaderValue};
    use std::io::Write;

    #[test]
    fn test_empty_response() {
        let w = BufferedResponse::new();
        assert_eq!(w.status(), None);

        let response = w.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_headers_committed_with_status() {
        let mut w = BufferedResponse::new();
        w.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        w.write_status(StatusCode::CREATED);
        w.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        assert_eq!(w.status(), Some(StatusCode::CREATED));
        assert_eq!(
            w.committed_headers().unwrap()[header::CONTENT_TYPE],
            "application/json"
        );

        let response = w.into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_first_status_wins() {
        let mut w = BufferedResponse::new();
        w.write_status(StatusCode::NOT_FOUND);
        w.write_status(StatusCode::OK);
        assert_eq!(w.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_body_write_commits_ok() {
        let mut w = BufferedResponse::new();
        w.headers_mut()
            .insert("x-trace", HeaderValue::from_static("1"));
        w.write_all(b"hello").unwrap();
        w.write_status(StatusCode::BAD_REQUEST);

        assert_eq!(w.status(), Some(StatusCode::OK));
        assert_eq!(w.body(), b"hello");
        assert_eq!(w.into_response().headers()["x-trace"], "1");
    }

    #[test]
    fn test_uncommitted_headers_still_sent() {
        let mut w = BufferedResponse::new();
        w.headers_mut()
            .insert("x-pending", HeaderValue::from_static("yes"));
        let response = w.into_response();
        assert_eq!(response.headers()["x-pending"], "yes");
    }

    #[test]
    fn test_mut_ref_is_a_writer() {
        fn commit<W: ResponseWriter>(mut w: W) {
            w.write_status(StatusCode::NO_CONTENT);
        }

        let mut w = BufferedResponse::new();
        commit(&mut w);
        assert_eq!(w.status(), Some(StatusCode::NO_CONTENT));
    }
}
