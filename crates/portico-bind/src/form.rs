//! URL-encoded form body binding.

use portico_config::BindConfig;
use portico_core::{BindError, BindSource};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::pairs::FieldPairs;
use crate::RequestParts;

/// Decodes an `application/x-www-form-urlencoded` body over `target`.
///
/// Body fields and query string fields are merged, body first. For a
/// scalar field present in both, the body value wins; a sequence field
/// collects values from both. Fields present in neither keep their current
/// values.
///
/// # Errors
///
/// Returns a malformed-request [`BindError`] with source `form body` if a
/// value does not fit its field, or a key is unknown and
/// [`BindConfig::ignore_unknown_keys`] is off.
///
/// # Example
///
/// ```rust
/// use portico_bind::{decode_form, BindConfig, RequestPartsBuilder};
/// use http::{Method, Uri};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Login {
///     username: String,
///     remember: Option<bool>,
/// }
///
/// let parts = RequestPartsBuilder::new()
///     .method(Method::POST)
///     .uri(Uri::from_static("/login?remember=true"))
///     .content_type("application/x-www-form-urlencoded")
///     .body("username=alice+smith")
///     .build();
///
/// let mut login = Login::default();
/// decode_form(&parts, &mut login, &BindConfig::default()).unwrap();
/// assert_eq!(login.username, "alice smith");
/// assert_eq!(login.remember, Some(true));
/// ```
pub fn decode_form<T>(parts: &RequestParts, target: &mut T, config: &BindConfig) -> Result<(), BindError>
where
    T: Serialize + DeserializeOwned,
{
    let mut pairs = FieldPairs::new();
    pairs.extend_urlencoded(parts.body());
    pairs.extend_urlencoded(parts.query_string().unwrap_or("").as_bytes());
    pairs.decode_into(target, BindSource::Form, config.ignore_unknown_keys)
}
