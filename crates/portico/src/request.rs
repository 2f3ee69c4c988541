//! Buffering streaming request bodies.

use bytes::Bytes;
use http::Request;
use http_body::Body;
use http_body_util::BodyExt;

/// Collects a streaming request body so the request can be bound.
///
/// # Errors
///
/// Returns the body's own error if reading it fails.
///
/// # Example
///
/// ```rust
/// use http::Request;
/// use http_body_util::Full;
/// use bytes::Bytes;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let request = Request::post("/users").body(Full::new(Bytes::from_static(b"{}"))).unwrap();
/// let request = portico::buffer_request(request).await.unwrap();
/// assert_eq!(request.body().as_ref(), b"{}");
/// # });
/// ```
pub async fn buffer_request<B>(request: Request<B>) -> Result<Request<Bytes>, B::Error>
where
    B: Body,
{
    let (head, body) = request.into_parts();
    let bytes = body.collect().await?.to_bytes();
    Ok(Request::from_parts(head, bytes))
}
