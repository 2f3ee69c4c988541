//! Handler replies and their dispatch to an encoder.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use portico_config::CsvConfig;
use portico_core::mime;
use serde::Serialize;

use crate::{write_csv, write_json, ResponseWriter, WriteError};

/// The body of a successful reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<R> {
    /// Any serializable value, written as JSON unless the reply is marked
    /// `text/csv`.
    Json(R),
    /// String rows, written as CSV when the reply is marked `text/csv` and
    /// as a JSON array of arrays otherwise.
    Table(Vec<Vec<String>>),
}

/// A successful handler result: status, extra headers and body.
///
/// The reply's headers are applied to the response before the body is
/// encoded. A `Content-Type` containing `text/csv` selects CSV encoding.
///
/// # Example
///
/// ```rust
/// use portico_respond::{Body, Reply};
/// use http::StatusCode;
///
/// let reply = Reply::created(serde_json::json!({ "id": 1 }));
/// assert_eq!(reply.status(), StatusCode::CREATED);
///
/// let export: Reply = Reply::table(
///     StatusCode::OK,
///     vec![vec!["a".into(), "b".into()], vec!["1".into(), "2".into()]],
/// );
/// assert!(export.is_csv());
/// assert!(matches!(export.body(), Body::Table(rows) if rows.len() == 2));
/// ```
#[derive(Debug, Clone)]
pub struct Reply<R = ()> {
    status: StatusCode,
    headers: HeaderMap,
    body: Body<R>,
}

impl<R> Reply<R> {
    /// A JSON reply with the given status.
    #[must_use]
    pub fn new(status: StatusCode, value: R) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Body::Json(value),
        }
    }

    /// A `200 OK` JSON reply.
    #[must_use]
    pub fn ok(value: R) -> Self {
        Self::new(StatusCode::OK, value)
    }

    /// A `201 Created` JSON reply.
    #[must_use]
    pub fn created(value: R) -> Self {
        Self::new(StatusCode::CREATED, value)
    }

    /// A CSV reply: the rows plus a `text/csv` Content-Type.
    #[must_use]
    pub fn table(status: StatusCode, rows: Vec<Vec<String>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Body::Table(rows),
        }
        .with_content_type(HeaderValue::from_static(mime::TEXT_CSV))
    }

    /// Replaces the status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets a response header, replacing earlier values of the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the Content-Type hint.
    #[must_use]
    pub fn with_content_type(self, value: HeaderValue) -> Self {
        self.with_header(CONTENT_TYPE, value)
    }

    /// Returns the status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers set on the reply.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &Body<R> {
        &self.body
    }

    /// Returns `true` if the Content-Type hint asks for CSV.
    #[must_use]
    pub fn is_csv(&self) -> bool {
        is_csv_hint(&self.headers)
    }

    /// Splits the reply into status, headers and body.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Body<R>) {
        (self.status, self.headers, self.body)
    }
}

fn is_csv_hint(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(mime::is_csv)
}

/// Writes a reply: its headers first, then the body through the encoder the
/// Content-Type hint selects.
///
/// The hint is read from the writer after the reply's headers are applied,
/// so a `text/csv` Content-Type set directly on the writer counts too.
///
/// | Hint | Body | Result |
/// |------|------|--------|
/// | `text/csv` | [`Body::Table`] | [`write_csv`] |
/// | `text/csv` | [`Body::Json`] | [`WriteError::NotTabular`], nothing written |
/// | other or none | [`Body::Json`] | [`write_json`] |
/// | other or none | [`Body::Table`] | [`write_json`] of the rows |
///
/// # Errors
///
/// Returns the encoder's [`WriteError`], or [`WriteError::NotTabular`].
pub fn write_reply<W, R>(w: &mut W, reply: Reply<R>, csv: &CsvConfig) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
    R: Serialize,
{
    let (status, headers, body) = reply.into_parts();
    w.headers_mut().extend(headers);

    match (is_csv_hint(w.headers()), body) {
        (true, Body::Table(rows)) => write_csv(w, status, &rows, csv),
        (true, Body::Json(_)) => Err(WriteError::NotTabular),
        (false, Body::Json(value)) => write_json(w, status, &value),
        (false, Body::Table(rows)) => write_json(w, status, &rows),
    }
}
