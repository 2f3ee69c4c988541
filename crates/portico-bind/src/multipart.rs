//! Multipart form body binding.
//!
//! Text parts become form fields. Parts that carry a filename are read to
//! the end and dropped; they never reach the target.

use std::io;

use portico_config::BindConfig;
use portico_core::{BindError, BindSource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::pairs::FieldPairs;
use crate::RequestParts;

/// Decodes a `multipart/form-data` body over `target`.
///
/// Text fields are merged with the query string exactly like a URL-encoded
/// form: body first, the first value wins for scalar fields, and sequence
/// fields collect every value. Fields absent from both keep their current
/// values.
///
/// Limits from [`BindConfig`]:
///
/// - `multipart_max_memory` caps the bytes of text field names and values
///   kept for decoding;
/// - `multipart_max_fields` caps the number of parts, files included.
///
/// # Errors
///
/// Returns a malformed-request [`BindError`] if the boundary is missing,
/// the body is not valid multipart, a text field is not UTF-8, a limit is
/// exceeded, or the collected fields do not fit `T`. Unknown field names are
/// rejected unless [`BindConfig::ignore_unknown_keys`] is set.
pub async fn decode_multipart<T>(
    parts: &RequestParts,
    target: &mut T,
    config: &BindConfig,
) -> Result<(), BindError>
where
    T: Serialize + DeserializeOwned + Send,
{
    let content_type = parts.content_type().unwrap_or_default();
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| BindError::multipart(format!("invalid boundary: {e}")))?;

    let body = parts.body().clone();
    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut pairs = FieldPairs::new();
    let mut retained = 0usize;
    let mut count = 0usize;
    let mut dropped_files = 0usize;

    while let Some(mut field) = multipart.next_field().await.map_err(parse_error)? {
        count += 1;
        if count > config.multipart_max_fields {
            return Err(BindError::too_many_fields(config.multipart_max_fields));
        }

        let name = field.name().map(str::to_owned);
        let is_file = field.file_name().is_some();

        let (Some(name), false) = (name, is_file) else {
            while field.chunk().await.map_err(parse_error)?.is_some() {}
            if is_file {
                dropped_files += 1;
            }
            continue;
        };

        retained += name.len();
        let mut value = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(parse_error)? {
            retained += chunk.len();
            if retained > config.multipart_max_memory {
                return Err(BindError::too_large(config.multipart_max_memory));
            }
            value.extend_from_slice(&chunk);
        }
        if retained > config.multipart_max_memory {
            return Err(BindError::too_large(config.multipart_max_memory));
        }

        let value = String::from_utf8(value)
            .map_err(|_| BindError::multipart(format!("field `{name}` is not valid UTF-8")))?;
        pairs.push(name, value);
    }

    debug!(fields = pairs.len(), dropped_files, "parsed multipart body");

    pairs.extend_urlencoded(parts.query_string().unwrap_or("").as_bytes());
    pairs.decode_into(target, BindSource::Multipart, config.ignore_unknown_keys)
}

fn parse_error(err: multer::Error) -> BindError {
    BindError::multipart(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestPartsBuilder;
    use http::{Method, Uri};
    use serde::Deserialize;

    const BOUNDARY: &str = "X-PORTICO-BOUNDARY";

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Profile {
        name: String,
        age: Option<u32>,
        #[serde(default)]
        skills: Vec<String>,
    }

    async fn decode(parts: &RequestParts, config: &BindConfig) -> Result<Profile, BindError> {
        let mut profile = Profile::default();
        decode_multipart(parts, &mut profile, config).await?;
        Ok(profile)
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut out = Vec::new();
        for part in parts {
            out.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, file_name, data) => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(data);
                    out.extend_from_slice(b"\r\n");
                }
            }
        }
        out.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        out
    }

    fn request(uri: &'static str, parts: &[Part<'_>]) -> RequestParts {
        RequestPartsBuilder::new()
            .method(Method::POST)
            .uri(Uri::from_static(uri))
            .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(body(parts))
            .build()
    }

    #[tokio::test]
    async fn test_decode_text_fields() {
        let parts = request("/profile", &[Part::Text("name", "Ada"), Part::Text("age", "36")]);

        let profile = decode(&parts, &BindConfig::default()).await.unwrap();
        assert_eq!(
            profile,
            Profile {
                name: "Ada".into(),
                age: Some(36),
                skills: Vec::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_file_parts_dropped() {
        let parts = request(
            "/profile",
            &[
                Part::Text("name", "Ada"),
                Part::File("name", "evil.txt", b"not a name"),
                Part::File("avatar", "ada.png", &[0x89, b'P', b'N', b'G', 0, 0xff]),
            ],
        );

        let profile = decode(&parts, &BindConfig::default()).await.unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.age, None);
    }

    #[tokio::test]
    async fn test_query_merged_after_body() {
        let parts = request("/profile?name=Query&age=7", &[Part::Text("name", "Body")]);

        let profile = decode(&parts, &BindConfig::default()).await.unwrap();
        assert_eq!(profile.name, "Body");
        assert_eq!(profile.age, Some(7));
    }

    #[tokio::test]
    async fn test_repeated_part_fills_sequence() {
        let parts = request(
            "/profile?skills=lisp",
            &[
                Part::Text("name", "Ada"),
                Part::Text("skills", "maths"),
                Part::Text("skills", "engines"),
            ],
        );

        let profile = decode(&parts, &BindConfig::default()).await.unwrap();
        assert_eq!(profile.skills, ["maths", "engines", "lisp"]);
    }

    #[tokio::test]
    async fn test_absent_fields_keep_initial_values() {
        let parts = request("/profile", &[Part::Text("age", "37")]);
        let mut profile = Profile {
            name: "Ada".into(),
            age: Some(36),
            skills: vec!["maths".into()],
        };

        decode_multipart(&parts, &mut profile, &BindConfig::default()).await.unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.age, Some(37));
        assert_eq!(profile.skills, ["maths"]);
    }

    #[tokio::test]
    async fn test_unknown_part_name() {
        let parts = request("/profile", &[Part::Text("name", "Ada"), Part::Text("nickname", "Countess")]);

        let err = decode(&parts, &BindConfig::default()).await.unwrap_err();
        assert_eq!(err.origin(), BindSource::Multipart);
        assert!(err.to_string().contains("nickname"));

        let lenient = BindConfig {
            ignore_unknown_keys: true,
            ..BindConfig::default()
        };
        assert_eq!(decode(&parts, &lenient).await.unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_memory_limit() {
        let parts = request("/profile", &[Part::Text("name", "a much longer name")]);
        let config = BindConfig {
            multipart_max_memory: 8,
            ..BindConfig::default()
        };

        let err = decode(&parts, &config).await.unwrap_err();
        assert!(matches!(err, BindError::LimitExceeded { unit: "bytes", limit: 8, .. }));
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_file_bytes_not_counted_against_memory() {
        let big = vec![b'z'; 4096];
        let parts = request("/profile", &[Part::Text("name", "Ada"), Part::File("blob", "z.bin", &big)]);
        let config = BindConfig {
            multipart_max_memory: 64,
            ..BindConfig::default()
        };

        let profile = decode(&parts, &config).await.unwrap();
        assert_eq!(profile.name, "Ada");
    }

    #[tokio::test]
    async fn test_field_limit() {
        let parts = request(
            "/profile",
            &[Part::Text("name", "Ada"), Part::Text("age", "1"), Part::Text("skills", "y")],
        );
        let config = BindConfig {
            multipart_max_fields: 2,
            ..BindConfig::default()
        };

        let err = decode(&parts, &config).await.unwrap_err();
        assert!(matches!(err, BindError::LimitExceeded { unit: "fields", limit: 2, .. }));
    }

    #[tokio::test]
    async fn test_missing_boundary() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type("multipart/form-data")
            .body("name=Ada")
            .build();

        let err = decode(&parts, &BindConfig::default()).await.unwrap_err();
        assert_eq!(err.origin(), BindSource::Multipart);
        assert!(!err.is_invalid_content_type());
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nAda"))
            .build();

        let err = decode(&parts, &BindConfig::default()).await.unwrap_err();
        assert_eq!(err.origin(), BindSource::Multipart);
    }

    #[tokio::test]
    async fn test_non_utf8_text_field() {
        let mut raw = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n").into_bytes();
        raw.extend_from_slice(&[0xff, 0xfe]);
        raw.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let parts = RequestPartsBuilder::new()
            .method(Method::POST)
            .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(raw)
            .build();

        let err = decode(&parts, &BindConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
