//! JSON body binding.

use portico_core::{BindError, BindSource};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::target::{overlay, snapshot};
use crate::RequestParts;

/// Decodes the first JSON value of the body over `target`.
///
/// Whatever follows that value is not read, so `{"a":1} trailing` binds
/// like `{"a":1}`. Object keys absent from the body keep the target's
/// current values, nested objects included; unknown keys are ignored.
/// `target` is untouched on error.
///
/// # Errors
///
/// Returns a malformed-request [`BindError`] with source `json body` if the
/// body is not JSON or does not match `T`.
///
/// # Example
///
/// ```rust
/// use portico_bind::{decode_json, RequestPartsBuilder};
/// use http::Method;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct CreateUser {
///     name: String,
///     age: i64,
/// }
///
/// let parts = RequestPartsBuilder::new()
///     .method(Method::POST)
///     .content_type("application/json")
///     .body(r#"{"name":"a"}"#)
///     .build();
///
/// let mut user = CreateUser { name: "anonymous".into(), age: 30 };
/// decode_json(&parts, &mut user).unwrap();
/// assert_eq!(user.name, "a");
/// assert_eq!(user.age, 30);
/// ```
pub fn decode_json<T>(parts: &RequestParts, target: &mut T) -> Result<(), BindError>
where
    T: Serialize + DeserializeOwned,
{
    let mut deserializer = serde_json::Deserializer::from_slice(parts.body());
    let body = Value::deserialize(&mut deserializer).map_err(|e| BindError::json(e.to_string()))?;

    let mut merged = snapshot(target, BindSource::Json)?;
    overlay(&mut merged, body);

    *target = T::deserialize(merged).map_err(|e| BindError::json(e.to_string()))?;
    Ok(())
}
