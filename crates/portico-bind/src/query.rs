//! Query string binding.
//!
//! Used for `GET`, `DELETE` and `HEAD` requests. The body is never read.

use portico_config::BindConfig;
use portico_core::{BindError, BindSource};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::pairs::FieldPairs;
use crate::RequestParts;

/// Decodes the URL query string over `target`.
///
/// Fields without a query key keep their current values, so a missing query
/// string leaves the target as it was. A key repeated for a sequence field
/// yields every value; for any other field the first value wins. Keys the
/// target does not declare are rejected unless
/// [`BindConfig::ignore_unknown_keys`] is set.
///
/// # Errors
///
/// Returns a malformed-request [`BindError`] with source `query` if a value
/// does not fit its field or a key is unknown. `target` is untouched on
/// error.
///
/// # Example
///
/// ```rust
/// use portico_bind::{decode_query, BindConfig, RequestPartsBuilder};
/// use http::Uri;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Page {
///     page: u32,
///     sort: Option<String>,
///     tag: Vec<String>,
/// }
///
/// let parts = RequestPartsBuilder::new()
///     .uri(Uri::from_static("/users?page=3&page=9&tag=a&tag=b"))
///     .build();
///
/// let mut page = Page::default();
/// decode_query(&parts, &mut page, &BindConfig::default()).unwrap();
/// assert_eq!(page.page, 3);
/// assert_eq!(page.tag, ["a", "b"]);
/// assert!(page.sort.is_none());
/// ```
pub fn decode_query<T>(parts: &RequestParts, target: &mut T, config: &BindConfig) -> Result<(), BindError>
where
    T: Serialize + DeserializeOwned,
{
    let mut pairs = FieldPairs::new();
    pairs.extend_urlencoded(parts.query_string().unwrap_or("").as_bytes());
    pairs.decode_into(target, BindSource::Query, config.ignore_unknown_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestPartsBuilder;
    use http::Uri;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct ListParams {
        page: u32,
        limit: u32,
        q: Option<String>,
    }

    impl Default for ListParams {
        fn default() -> Self {
            Self {
                page: 0,
                limit: 20,
                q: None,
            }
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Tags {
        tag: Vec<String>,
    }

    fn parts(uri: &'static str) -> RequestParts {
        RequestPartsBuilder::new().uri(Uri::from_static(uri)).build()
    }

    fn decode<T: Serialize + DeserializeOwned + Default>(uri: &'static str) -> Result<T, BindError> {
        let mut target = T::default();
        decode_query(&parts(uri), &mut target, &BindConfig::default())?;
        Ok(target)
    }

    #[test]
    fn test_decode_query() {
        let params: ListParams = decode("/items?page=2&limit=50&q=red+shoes").unwrap();
        assert_eq!(
            params,
            ListParams {
                page: 2,
                limit: 50,
                q: Some("red shoes".into()),
            }
        );
    }

    #[test]
    fn test_missing_query_keeps_initial_values() {
        let params: ListParams = decode("/items").unwrap();
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn test_partial_query_keeps_other_fields() {
        let mut params = ListParams {
            page: 7,
            limit: 5,
            q: Some("boots".into()),
        };
        decode_query(&parts("/items?page=8"), &mut params, &BindConfig::default()).unwrap();
        assert_eq!(params.page, 8);
        assert_eq!(params.limit, 5);
        assert_eq!(params.q.as_deref(), Some("boots"));
    }

    #[test]
    fn test_percent_decoding() {
        let params: ListParams = decode("/items?q=caf%C3%A9%20au%20lait").unwrap();
        assert_eq!(params.q.as_deref(), Some("café au lait"));
    }

    #[test]
    fn test_repeated_key_fills_sequence() {
        let tags: Tags = decode("/x?tag=a&tag=b").unwrap();
        assert_eq!(tags.tag, ["a", "b"]);
    }

    #[test]
    fn test_repeated_scalar_key_keeps_first() {
        let params: ListParams = decode("/items?page=3&page=9").unwrap();
        assert_eq!(params.page, 3);
    }

    #[test]
    fn test_unknown_key_rejected_by_default() {
        let err = decode::<ListParams>("/items?page=1&utm_source=mail").unwrap_err();
        assert_eq!(err.origin(), BindSource::Query);
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("utm_source"));
    }

    #[test]
    fn test_unknown_key_ignored_when_configured() {
        let config = BindConfig {
            ignore_unknown_keys: true,
            ..BindConfig::default()
        };
        let mut params = ListParams::default();
        decode_query(&parts("/items?page=1&utm_source=mail"), &mut params, &config).unwrap();
        assert_eq!(params.page, 1);
    }

    #[test]
    fn test_type_mismatch_is_malformed() {
        let err = decode::<ListParams>("/items?page=two").unwrap_err();
        assert_eq!(err.origin(), BindSource::Query);
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("malformed request"));
    }
}
