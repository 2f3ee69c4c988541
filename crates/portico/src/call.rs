//! The bind, call, write cycle.

use std::future::Future;

use bytes::Bytes;
use http::{Response, StatusCode};
use portico_bind::{Bind, RequestParts};
use portico_config::PorticoConfig;
use portico_core::{ErrorEnvelope, HandlerError};
use portico_respond::{write_error, write_reply, BufferedResponse, Reply, ResponseWriter, WriteError};
use serde::Serialize;
use tracing::{debug, debug_span, warn, Instrument};

/// Binds `target` from the request, calls `handler` with it, and writes the
/// outcome to `w`.
///
/// | Outcome | Response |
/// |---------|----------|
/// | unsupported Content-Type | 406 with an error envelope |
/// | any other binding or validation failure | 400 with an error envelope |
/// | handler returns `Err(HandlerError)` | the error's status and envelope |
/// | handler returns `Ok(Reply)` | [`write_reply`] |
///
/// The handler is never called when binding fails.
///
/// # Errors
///
/// Returns the [`WriteError`] of the final write, untranslated. It is also
/// logged at `warn`.
///
/// # Example
///
/// ```rust
/// use portico::{handle_call, BufferedResponse, HandlerError, Input, PorticoConfig, Reply, RequestPartsBuilder};
/// use http::{Method, Uri};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize, portico::Validate)]
/// struct Greet {
///     #[validate(required)]
///     name: String,
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let parts = RequestPartsBuilder::new()
///     .method(Method::GET)
///     .uri(Uri::from_static("/greet?name=ada"))
///     .build();
///
/// let mut w = BufferedResponse::new();
/// handle_call(&mut w, parts, Input(Greet::default()), &PorticoConfig::default(), |_, input: Input<Greet>| async move {
///     Ok::<_, HandlerError>(Reply::ok(format!("hello {}", input.name)))
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(w.into_response().body().as_ref(), br#""hello ada""#);
/// # });
/// ```
pub async fn handle_call<W, T, R, F, Fut>(
    w: &mut W,
    parts: RequestParts,
    target: T,
    config: &PorticoConfig,
    handler: F,
) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
    T: Bind,
    R: Serialize,
    F: FnOnce(RequestParts, T) -> Fut,
    Fut: Future<Output = Result<Reply<R>, HandlerError>>,
{
    let span = debug_span!("handle_call", method = %parts.method(), path = %parts.path());

    async move {
        let written = match target.bind(&parts, &config.bind).await {
            Ok(target) => match handler(parts, target).await {
                Ok(reply) => write_reply(w, reply, &config.csv),
                Err(err) => {
                    debug!(status = err.status().as_u16(), code = err.code(), "handler returned an error");
                    write_error(w, err.status(), &err.to_envelope())
                }
            },
            Err(err) => {
                debug!(status = err.status_code().as_u16(), error = %err, "binding failed");
                write_error(w, err.status_code(), &err.to_envelope())
            }
        };

        if let Err(err) = &written {
            warn!(error = %err, committed = !err.is_uncommitted(), "failed to write response");
        }
        written
    }
    .instrument(span)
    .await
}

/// Runs [`handle_call`] against an in-memory response with the default
/// configuration.
///
/// See [`respond_with`].
pub async fn respond<T, R, F, Fut>(
    request: impl Into<RequestParts>,
    target: T,
    handler: F,
) -> Response<Bytes>
where
    T: Bind,
    R: Serialize,
    F: FnOnce(RequestParts, T) -> Fut,
    Fut: Future<Output = Result<Reply<R>, HandlerError>>,
{
    respond_with(&PorticoConfig::default(), request, target, handler).await
}

/// Runs [`handle_call`] against an in-memory response.
///
/// A write failure that happened before the status was committed becomes a
/// 500 with a `RESPONSE_ENCODING` envelope. Once the status is committed the
/// response is returned as written.
pub async fn respond_with<T, R, F, Fut>(
    config: &PorticoConfig,
    request: impl Into<RequestParts>,
    target: T,
    handler: F,
) -> Response<Bytes>
where
    T: Bind,
    R: Serialize,
    F: FnOnce(RequestParts, T) -> Fut,
    Fut: Future<Output = Result<Reply<R>, HandlerError>>,
{
    let mut w = BufferedResponse::new();
    if let Err(err) = handle_call(&mut w, request.into(), target, config, handler).await {
        if err.is_uncommitted() {
            w = BufferedResponse::new();
            let envelope = ErrorEnvelope::new("RESPONSE_ENCODING", err.to_string(), None);
            if let Err(err) = write_error(&mut w, StatusCode::INTERNAL_SERVER_ERROR, &envelope) {
                warn!(error = %err, "failed to write fallback error response");
            }
        }
    }
    w.into_response()
}
