//! # Portico
//!
//! **Request binding, validation and response encoding for handler functions**
//!
//! Portico sits between an HTTP server and the functions that do the work.
//! For each call it:
//!
//! 1. binds the request into a typed target (query string, JSON, URL-encoded
//!    or multipart form, picked from the method and Content-Type),
//! 2. validates the target with its `#[derive(Validate)]` rules,
//! 3. calls the handler,
//! 4. writes the handler's [`Reply`] as JSON, or as CSV when the reply is
//!    marked `text/csv`.
//!
//! Binding failures never reach the handler: an unsupported Content-Type is a
//! 406, every other binding or validation failure a 400.
//!
//! ## Quick Start
//!
//! ```rust
//! use portico::prelude::*;
//! use http::{Method, Request, StatusCode};
//! use bytes::Bytes;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize, Validate)]
//! struct CreateUser {
//!     #[validate(required, length(max = 64))]
//!     name: String,
//!     #[validate(range(min = 0, max = 150))]
//!     age: i64,
//! }
//!
//! #[derive(Serialize)]
//! struct Created {
//!     id: u64,
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let request = Request::post("/users")
//!     .header("content-type", "application/json")
//!     .body(Bytes::from_static(br#"{"name":"ada","age":36}"#))
//!     .unwrap();
//!
//! let response = portico::respond(request, Input(CreateUser::default()), |_, user| async move {
//!     assert_eq!(user.name, "ada");
//!     Ok::<_, HandlerError>(Reply::created(Created { id: 1 }))
//! })
//! .await;
//!
//! assert_eq!(response.status(), StatusCode::CREATED);
//! assert_eq!(response.body().as_ref(), br#"{"id":1}"#);
//! # });
//! ```
//!
//! ## Crates
//!
//! | Crate | Re-exported as | Contents |
//! |-------|----------------|----------|
//! | `portico-core` | [`core`] | errors, content types, [`validation`] |
//! | `portico-bind` | [`binding`] | [`RequestParts`], [`Bind`], the decoders |
//! | `portico-respond` | [`response`] | [`ResponseWriter`], [`write_json`], [`write_csv`], [`Reply`] |
//! | `portico-config` | [`config`] | [`PorticoConfig`], [`ConfigLoader`] |
//! | `portico-telemetry` | [`telemetry`] | [`init_logging`] |

#![doc(html_root_url = "https://docs.rs/portico/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate self as portico;

mod call;
mod request;

pub use call::{handle_call, respond, respond_with};
pub use request::buffer_request;

pub use portico_bind as binding;
pub use portico_config as config;
pub use portico_core as core;
pub use portico_respond as response;
pub use portico_telemetry as telemetry;

pub use portico_core::validation;

pub use portico_bind::{Bind, Input, RequestParts, RequestPartsBuilder};
pub use portico_config::{ConfigLoader, PorticoConfig};
pub use portico_core::{BindError, ErrorEnvelope, HandlerError, Validate, ValidationErrors};
pub use portico_respond::{
    write_csv, write_error, write_json, write_reply, Body, BufferedResponse, Reply,
    ResponseWriter, WriteError,
};
pub use portico_telemetry::{init_logging, LogConfig};

/// Derives [`Validate`](trait@Validate) from `#[validate(...)]` field attributes.
pub use portico_macros::Validate;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use portico::prelude::*;
/// ```
pub mod prelude {
    pub use portico_bind::{Bind, Input, RequestParts};
    pub use portico_config::PorticoConfig;
    pub use portico_core::{BindError, HandlerError, Validate, ValidationErrors};
    pub use portico_macros::Validate;
    pub use portico_respond::{Body, Reply, WriteError};

    pub use crate::{handle_call, respond};
}
