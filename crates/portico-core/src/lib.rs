//! # Portico Core
//!
//! Core types shared by the Portico crates.
//!
//! This crate provides:
//!
//! - [`BindError`] - Failures while binding a request into a target
//! - [`HandlerError`] - Business errors returned by handlers
//! - [`ErrorEnvelope`] - The JSON body written for every error response
//! - [`mime`] - Content-Type constants and matching helpers
//! - [`validation`] - The [`Validate`] trait, [`ValidationErrors`] and rule helpers
//!
//! # Error Mapping
//!
//! | Error | Status |
//! |-------|--------|
//! | [`BindError::InvalidContentType`] | 406 Not Acceptable |
//! | any other [`BindError`] | 400 Bad Request |
//! | [`HandlerError`] | chosen by the handler |

#![doc(html_root_url = "https://docs.rs/portico-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod mime;
pub mod validation;

pub use error::{BindError, BindResult, BindSource, ErrorDetail, ErrorEnvelope, HandlerError};
pub use validation::{FieldViolation, Validate, ValidationErrors};
