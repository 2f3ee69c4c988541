//! Procedural macros for Portico.
//!
//! This crate provides `#[derive(Validate)]`, which turns per-field
//! `#[validate(...)]` attributes into an implementation of
//! `portico::validation::Validate`. Use it through the `portico` crate, which
//! re-exports the derive next to the trait of the same name.
//!
//! # Example
//!
//! ```rust,ignore
//! use portico::Validate;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Validate)]
//! struct CreateUser {
//!     #[validate(required, length(max = 64))]
//!     name: String,
//!     #[validate(email)]
//!     email: String,
//!     #[validate(range(min = 13, max = 150))]
//!     age: u32,
//!     #[validate(one_of("admin", "member"))]
//!     role: Option<String>,
//!     #[validate(nested)]
//!     address: Option<Address>,
//! }
//! ```
//!
//! # Rules
//!
//! | Attribute | Applies to | Check |
//! |-----------|------------|-------|
//! | `required` | `Option`, strings, `Vec`, numbers, `bool` | value is not empty/zero/`None` |
//! | `length(min = N, max = N)` | strings (chars), `Vec` | length within bounds |
//! | `range(min = X, max = Y)` | numbers | value within bounds |
//! | `email` | strings | address shape |
//! | `pattern = "regex"` | strings | regex match, compiled once per field |
//! | `one_of("a", "b")` | strings | value is in the list |
//! | `nested` | any `Validate` type | violations reported under `field.` |
//! | `custom = "path::to::fn"` | any | `fn(&T) -> Result<(), String>` |
//! | `message = "..."` | field | replaces the message of every rule on the field |
//!
//! Violations are reported under the field's `#[serde(rename = "...")]`
//! name when one is present, so error paths match the wire format.

mod parse;
mod validate;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `portico::validation::Validate` from `#[validate(...)]` field
/// attributes.
///
/// Every rule of every field is checked; all violations are returned
/// together.
///
/// # Generated Code
///
/// For a field `#[validate(length(min = 1))] name: String` the macro emits
/// approximately:
///
/// ```rust,ignore
/// impl ::portico::validation::Validate for CreateUser {
///     fn validate(&self) -> Result<(), ::portico::validation::ValidationErrors> {
///         let mut errors = ::portico::validation::ValidationErrors::new();
///         if let Err(message) = ::portico::validation::rules::length(&self.name, Some(1), None) {
///             errors.add("name", "length", message);
///         }
///         errors.into_result()
///     }
/// }
/// ```
#[proc_macro_derive(Validate, attributes(validate))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    validate::expand_validate(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
