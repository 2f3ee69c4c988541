//! The [`Bind`] trait and binding dispatch.
//!
//! Dispatch is a small table over method and Content-Type:
//!
//! | Request | [`Strategy`] |
//! |---------|--------------|
//! | `GET`, `DELETE`, `HEAD` | [`Strategy::Query`] |
//! | any other method, empty body | [`Strategy::Skip`] |
//! | Content-Type contains `application/json` | [`Strategy::Json`] |
//! | Content-Type contains `application/x-www-form-urlencoded` | [`Strategy::Form`] |
//! | Content-Type contains `multipart/form-data` | [`Strategy::Multipart`] |
//! | anything else | invalid content type (406) |

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use http::Method;
use portico_config::BindConfig;
use portico_core::{mime, BindError, Validate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::{decode_form, decode_json, decode_multipart, decode_query, RequestParts};

/// Returns `true` for methods that bind from the query string only.
#[must_use]
pub fn reads_query(method: &Method) -> bool {
    *method == Method::GET || *method == Method::DELETE || *method == Method::HEAD
}

/// Where a target's values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// URL query string.
    Query,
    /// Empty body: nothing to decode, the target keeps its initial value.
    Skip,
    /// JSON body.
    Json,
    /// URL-encoded form body merged with the query string.
    Form,
    /// Multipart form body merged with the query string.
    Multipart,
}

impl Strategy {
    /// Picks the strategy for a request.
    ///
    /// Never inspects the body of a `GET`, `DELETE` or `HEAD` request.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidContentType`] when a non-empty body has a
    /// Content-Type the binder does not decode, including a missing one.
    pub fn select(parts: &RequestParts) -> Result<Self, BindError> {
        if reads_query(parts.method()) {
            return Ok(Self::Query);
        }

        if parts.is_body_empty() {
            return Ok(Self::Skip);
        }

        let content_type = parts.content_type().unwrap_or_default();
        if mime::is_json(content_type) {
            Ok(Self::Json)
        } else if mime::is_urlencoded(content_type) {
            Ok(Self::Form)
        } else if mime::is_multipart(content_type) {
            Ok(Self::Multipart)
        } else {
            Err(BindError::invalid_content_type(parts.content_type()))
        }
    }

    /// Short name used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Skip => "skip",
            Self::Json => "json",
            Self::Form => "form",
            Self::Multipart => "multipart",
        }
    }

    /// Decodes the request over `target` with this strategy.
    ///
    /// [`Strategy::Skip`] leaves `target` as it is.
    ///
    /// # Errors
    ///
    /// Returns the decoder's [`BindError`]; `target` is then unchanged.
    pub async fn decode<T>(self, parts: &RequestParts, target: &mut T, config: &BindConfig) -> Result<(), BindError>
    where
        T: Serialize + DeserializeOwned + Send,
    {
        match self {
            Self::Skip => Ok(()),
            Self::Query => decode_query(parts, target, config),
            Self::Json => decode_json(parts, target),
            Self::Form => decode_form(parts, target, config),
            Self::Multipart => decode_multipart(parts, target, config).await,
        }
    }
}

/// A request target that can be populated from a request.
///
/// `self` carries the caller's initial value; `bind` returns the populated
/// target or the first error.
///
/// Implemented for:
///
/// - `()` - a handler without input; never fails.
/// - `Option<B>` - `None` never fails, `Some` binds the inner target.
/// - [`Input<T>`] - decoded by [`Strategy`], then validated.
#[async_trait]
pub trait Bind: Sized + Send {
    /// Populates the target from `parts`.
    async fn bind(self, parts: &RequestParts, config: &BindConfig) -> Result<Self, BindError>;
}

#[async_trait]
impl Bind for () {
    async fn bind(self, _parts: &RequestParts, _config: &BindConfig) -> Result<Self, BindError> {
        Ok(())
    }
}

#[async_trait]
impl<B: Bind> Bind for Option<B> {
    async fn bind(self, parts: &RequestParts, config: &BindConfig) -> Result<Self, BindError> {
        match self {
            Some(target) => target.bind(parts, config).await.map(Some),
            None => Ok(None),
        }
    }
}

/// A decodable, validatable request target.
///
/// The wrapped value is populated in place: fields the request does not
/// mention keep the values they had before binding, and an empty body
/// leaves the whole value untouched.
///
/// # Example
///
/// ```rust
/// use portico_bind::{Bind, BindConfig, Input, RequestPartsBuilder};
/// use portico_core::{Validate, ValidationErrors};
/// use http::{Method, Uri};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Search {
///     q: String,
///     limit: u32,
/// }
///
/// impl Validate for Search {
///     fn validate(&self) -> Result<(), ValidationErrors> {
///         Ok(())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let parts = RequestPartsBuilder::new()
///     .method(Method::GET)
///     .uri(Uri::from_static("/search?q=rust"))
///     .build();
///
/// let Input(search) = Input(Search { q: String::new(), limit: 20 })
///     .bind(&parts, &BindConfig::default())
///     .await
///     .unwrap();
/// assert_eq!(search.q, "rust");
/// assert_eq!(search.limit, 20);
/// # });
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input<T>(pub T);

impl<T> Input<T> {
    /// Consumes the Input and returns the inner value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Input<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Input<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait]
impl<T> Bind for Input<T>
where
    T: Serialize + DeserializeOwned + Validate + Send,
{
    async fn bind(self, parts: &RequestParts, config: &BindConfig) -> Result<Self, BindError> {
        let strategy = Strategy::select(parts)?;
        debug!(
            strategy = strategy.as_str(),
            method = %parts.method(),
            path = parts.path(),
            "binding request"
        );

        let mut value = self.0;
        strategy.decode(parts, &mut value, config).await?;

        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestPartsBuilder;
    use http::Uri;
    use portico_core::validation::rules;
    use portico_core::{BindSource, ValidationErrors};
    use proptest::prelude::{any, prop_assert_eq, prop_oneof, proptest, Just};
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Person {
        name: String,
        age: i64,
    }

    impl Default for Person {
        fn default() -> Self {
            Self {
                name: "anonymous".into(),
                age: 30,
            }
        }
    }

    impl Validate for Person {
        fn validate(&self) -> Result<(), ValidationErrors> {
            let mut errors = ValidationErrors::new();
            if let Err(message) = rules::range(&self.age, Some(0.0), Some(150.0)) {
                errors.add("age", "range", message);
            }
            errors.into_result()
        }
    }

    fn config() -> BindConfig {
        BindConfig::default()
    }

    #[test]
    fn test_reads_query() {
        assert!(reads_query(&Method::GET));
        assert!(reads_query(&Method::DELETE));
        assert!(reads_query(&Method::HEAD));
        assert!(!reads_query(&Method::POST));
        assert!(!reads_query(&Method::PATCH));
    }

    #[test]
    fn test_select_strategy() {
        let select = |method: Method, content_type: &str, body: &'static str| {
            Strategy::select(
                &RequestPartsBuilder::new()
                    .method(method)
                    .content_type(content_type)
                    .body(body)
                    .build(),
            )
        };

        assert_eq!(select(Method::GET, "text/plain", "x").unwrap(), Strategy::Query);
        assert_eq!(select(Method::POST, "text/plain", "").unwrap(), Strategy::Skip);
        assert_eq!(
            select(Method::POST, "Application/JSON; charset=utf-8", "{}").unwrap(),
            Strategy::Json
        );
        assert_eq!(
            select(Method::PUT, "application/x-www-form-urlencoded", "a=1").unwrap(),
            Strategy::Form
        );
        assert_eq!(
            select(Method::PATCH, "multipart/form-data; boundary=b", "--b--").unwrap(),
            Strategy::Multipart
        );

        let err = select(Method::POST, "text/plain", "hello").unwrap_err();
        assert!(err.is_invalid_content_type());
        assert_eq!(err.status_code(), http::StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn test_select_missing_content_type() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .body("{}")
            .build();

        let err = Strategy::select(&parts).unwrap_err();
        assert_eq!(err.to_string(), "invalid content-type: none");
    }

    #[tokio::test]
    async fn test_unit_target_is_noop() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type("text/plain")
            .body("not decodable")
            .build();

        assert!(().bind(&parts, &config()).await.is_ok());
        assert_eq!(None::<Input<Person>>.bind(&parts, &config()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_some_target_binds() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type("application/json")
            .body(r#"{"name":"a","age":5}"#)
            .build();

        let bound = Some(Input(Person::default())).bind(&parts, &config()).await.unwrap();
        assert_eq!(
            bound.map(Input::into_inner),
            Some(Person {
                name: "a".into(),
                age: 5,
            })
        );
    }

    #[tokio::test]
    async fn test_empty_body_keeps_defaults() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type("text/plain")
            .build();

        let Input(person) = Input(Person::default()).bind(&parts, &config()).await.unwrap();
        assert_eq!(person, Person::default());
    }

    #[tokio::test]
    async fn test_empty_body_still_validates() {
        let parts = RequestPartsBuilder::new().method(Method::POST).build();
        let initial = Person {
            name: "x".into(),
            age: -1,
        };

        let err = Input(initial).bind(&parts, &config()).await.unwrap_err();
        assert!(matches!(err, BindError::Validation(_)));
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_partial_json_keeps_initial_fields() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type("application/json")
            .body(r#"{"name":"a"}"#)
            .build();

        let Input(person) = Input(Person::default()).bind(&parts, &config()).await.unwrap();
        assert_eq!(
            person,
            Person {
                name: "a".into(),
                age: 30,
            }
        );
    }

    #[tokio::test]
    async fn test_partial_form_keeps_initial_fields() {
        let parts = RequestPartsBuilder::new()
            .method(Method::PUT)
            .content_type("application/x-www-form-urlencoded")
            .body("age=41")
            .build();

        let Input(person) = Input(Person::default()).bind(&parts, &config()).await.unwrap();
        assert_eq!(person.name, "anonymous");
        assert_eq!(person.age, 41);
    }

    #[tokio::test]
    async fn test_query_binding_for_delete() {
        let parts = RequestPartsBuilder::new()
            .method(Method::DELETE)
            .uri(Uri::from_static("/people?name=bob&age=40"))
            .content_type("application/json")
            .body(r#"{"name":"ignored"}"#)
            .build();

        let Input(person) = Input(Person::default()).bind(&parts, &config()).await.unwrap();
        assert_eq!(person.name, "bob");
        assert_eq!(person.age, 40);
    }

    #[tokio::test]
    async fn test_json_type_mismatch() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type("application/json")
            .body(r#"{"age":"x"}"#)
            .build();

        let err = Input(Person::default()).bind(&parts, &config()).await.unwrap_err();
        assert_eq!(err.origin(), BindSource::Json);
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validation_violation_reported() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type("application/x-www-form-urlencoded")
            .body("name=old&age=200")
            .build();

        let err = Input(Person::default()).bind(&parts, &config()).await.unwrap_err();
        let BindError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.violations()[0].field, "age");
        assert_eq!(errors.violations()[0].message, "must be at most 150");
    }

    #[tokio::test]
    async fn test_unsupported_content_type_never_malformed() {
        let parts = RequestPartsBuilder::new()
            .method(Method::PUT)
            .content_type("application/xml")
            .body("<person/>")
            .build();

        let err = Input(Person::default()).bind(&parts, &config()).await.unwrap_err();
        assert!(err.is_invalid_content_type());
        assert_eq!(err.error_code(), "INVALID_CONTENT_TYPE");
    }

    fn query_method() -> impl proptest::strategy::Strategy<Value = Method> {
        prop_oneof![Just(Method::GET), Just(Method::DELETE), Just(Method::HEAD)]
    }

    proptest! {
        #[test]
        fn prop_query_methods_never_read_body(
            method in query_method(),
            body in proptest::collection::vec(any::<u8>(), 0..256),
            content_type in "[ -~]{0,40}",
            age in 0i64..150,
        ) {
            let uri: Uri = format!("/people?name=p&age={age}").parse().unwrap();
            let with_body = RequestPartsBuilder::new()
                .method(method.clone())
                .uri(uri.clone())
                .content_type(&content_type)
                .body(body)
                .build();
            let without_body = RequestPartsBuilder::new().method(method).uri(uri).build();

            let (a, b) = tokio_test::block_on(async {
                (
                    Input(Person::default()).bind(&with_body, &config()).await,
                    Input(Person::default()).bind(&without_body, &config()).await,
                )
            });

            prop_assert_eq!(a.unwrap().into_inner(), b.unwrap().into_inner());
        }
    }
}
