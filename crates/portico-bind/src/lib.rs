//! # Portico Bind
//!
//! Request binding for Portico: turns a buffered request into a typed,
//! validated target.
//!
//! ## Binders
//!
//! | Function | Source | Used for |
//! |----------|--------|----------|
//! | [`decode_query`] | query string | `GET`, `DELETE`, `HEAD` |
//! | [`decode_json`] | body | `application/json` |
//! | [`decode_form`] | body, then query | `application/x-www-form-urlencoded` |
//! | [`decode_multipart`] | text parts, then query | `multipart/form-data` |
//!
//! [`Strategy::select`] picks one from the method and Content-Type, and the
//! [`Bind`] implementation of [`Input<T>`] runs it followed by
//! [`Validate::validate`](portico_core::Validate::validate).
//!
//! Every binder decodes over an existing value, so fields the request does
//! not carry keep what the caller put there. Repeated query and form keys
//! fill sequence fields; a scalar field takes the first value.
//!
//! ## Example
//!
//! ```rust
//! use portico_bind::{Bind, BindConfig, Input, RequestParts};
//! use portico_core::{Validate, ValidationErrors};
//! use bytes::Bytes;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct CreateUser {
//!     name: String,
//! }
//!
//! impl Validate for CreateUser {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         if self.name.is_empty() {
//!             errors.add("name", "required", "is required");
//!         }
//!         errors.into_result()
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let request = http::Request::post("/users")
//!     .header("content-type", "application/json")
//!     .body(Bytes::from_static(br#"{"name":""}"#))
//!     .unwrap();
//! let parts = RequestParts::from_request(request);
//!
//! let err = Input(CreateUser::default())
//!     .bind(&parts, &BindConfig::default())
//!     .await
//!     .unwrap_err();
//! assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
//! # });
//! ```
//!
//! ## Error Handling
//!
//! Every binder returns [`BindError`](portico_core::BindError). Only an
//! unsupported Content-Type maps to 406; everything else is a 400.

#![doc(html_root_url = "https://docs.rs/portico-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bind;
mod form;
mod json;
mod multipart;
mod pairs;
mod parts;
mod query;
mod target;

pub use bind::{reads_query, Bind, Input, Strategy};
pub use form::decode_form;
pub use json::decode_json;
pub use multipart::decode_multipart;
pub use parts::{RequestParts, RequestPartsBuilder};
pub use query::decode_query;

pub use portico_config::BindConfig;
