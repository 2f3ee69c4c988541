//! JSON response encoding.

use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use portico_core::{mime, ErrorEnvelope};
use serde::Serialize;

use crate::{ResponseWriter, WriteError};

/// Writes `value` as a JSON response.
///
/// Sets `Content-Type: application/json`, commits `status`, then encodes
/// `value` compactly with no trailing newline.
///
/// # Errors
///
/// Returns [`WriteError::Json`] if encoding fails. The status and any bytes
/// already produced stay written.
///
/// # Example
///
/// ```rust
/// use portico_respond::{write_json, BufferedResponse};
/// use http::StatusCode;
/// use serde_json::json;
///
/// let mut w = BufferedResponse::new();
/// write_json(&mut w, StatusCode::CREATED, &json!({ "id": 1 })).unwrap();
///
/// let response = w.into_response();
/// assert_eq!(response.status(), StatusCode::CREATED);
/// assert_eq!(response.headers()["content-type"], "application/json");
/// assert_eq!(response.body().as_ref(), br#"{"id":1}"#);
/// ```
pub fn write_json<W, T>(w: &mut W, status: StatusCode, value: &T) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
    T: Serialize + ?Sized,
{
    w.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(mime::APPLICATION_JSON));
    w.write_status(status);
    serde_json::to_writer(&mut *w, value)?;
    Ok(())
}

/// Writes an error envelope as a JSON response.
///
/// # Errors
///
/// Same as [`write_json`].
pub fn write_error<W>(w: &mut W, status: StatusCode, envelope: &ErrorEnvelope) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
{
    write_json(w, status, envelope)
}
