//! # Portico Respond
//!
//! Response writing for Portico.
//!
//! A [`ResponseWriter`] keeps headers open until the status is written.
//! The encoders set their Content-Type, commit the status, then stream the
//! body:
//!
//! | Function | Content-Type | Body |
//! |----------|--------------|------|
//! | [`write_json`] | `application/json` | any `Serialize` value |
//! | [`write_csv`] | `text/csv` | string rows, one record each |
//! | [`write_error`] | `application/json` | an [`ErrorEnvelope`](portico_core::ErrorEnvelope) |
//!
//! [`write_reply`] picks between them from a handler's [`Reply`].
//!
//! ## Example
//!
//! ```rust
//! use portico_config::CsvConfig;
//! use portico_respond::{write_reply, BufferedResponse, Reply};
//! use http::StatusCode;
//!
//! let mut w = BufferedResponse::new();
//! let reply: Reply = Reply::table(
//!     StatusCode::OK,
//!     vec![vec!["sku".into(), "qty".into()], vec!["A-1".into(), "3".into()]],
//! );
//! write_reply(&mut w, reply, &CsvConfig::default()).unwrap();
//!
//! assert_eq!(w.into_response().body().as_ref(), b"sku,qty\nA-1,3\n");
//! ```

#![doc(html_root_url = "https://docs.rs/portico-respond/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod json;
mod reply;
mod table;
mod writer;

pub use error::WriteError;
pub use json::{write_error, write_json};
pub use reply::{write_reply, Body, Reply};
pub use table::write_csv;
pub use writer::{BufferedResponse, ResponseWriter};
