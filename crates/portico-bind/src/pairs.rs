//! Ordered key/value pairs shared by the query, form and multipart binders.

use std::collections::HashSet;

use portico_core::{BindError, BindSource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::target::snapshot;

/// Field values in arrival order.
///
/// Every pair is kept; [`FieldPairs::decode_into`] decides per field whether
/// repeats are a sequence or ignored after the first.
#[derive(Debug, Default)]
pub(crate) struct FieldPairs {
    pairs: Vec<(String, String)>,
}

impl FieldPairs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: String, value: String) {
        self.pairs.push((key, value));
    }

    /// Adds every pair of a URL-encoded string.
    pub(crate) fn extend_urlencoded(&mut self, input: &[u8]) {
        for (key, value) in form_urlencoded::parse(input) {
            self.push(key.into_owned(), value.into_owned());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Decodes the pairs over `target`, attributing failures to `origin`.
    ///
    /// A key the target holds as a sequence keeps every value; any other key
    /// keeps its first. Fields with no pair keep the target's current value.
    /// Keys the target does not declare are an error unless
    /// `ignore_unknown_keys` is set. `target` is untouched on error.
    pub(crate) fn decode_into<T>(
        &self,
        target: &mut T,
        origin: BindSource,
        ignore_unknown_keys: bool,
    ) -> Result<(), BindError>
    where
        T: Serialize + DeserializeOwned,
    {
        let current = match snapshot(target, origin)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        let encoded = self.merged_with(&current);
        let deserializer = serde_html_form::Deserializer::new(form_urlencoded::parse(encoded.as_bytes()));

        let mut unknown = Vec::new();
        let decoded: T = serde_ignored::deserialize(deserializer, |path| unknown.push(path.to_string()))
            .map_err(|e| BindError::malformed(origin, e.to_string()))?;

        if !ignore_unknown_keys {
            if let Some(key) = unknown.first() {
                return Err(BindError::malformed(origin, format!("unknown field `{key}`")));
            }
        }

        *target = decoded;
        Ok(())
    }

    /// Request pairs followed by the current values of fields the request
    /// left out, URL-encoded.
    fn merged_with(&self, current: &Map<String, Value>) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        let mut seen = HashSet::new();

        for (key, value) in &self.pairs {
            let repeats = matches!(current.get(key), Some(Value::Array(_)));
            if seen.insert(key.as_str()) || repeats {
                out.append_pair(key, value);
            }
        }

        for (key, value) in current {
            if seen.contains(key.as_str()) {
                continue;
            }
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = scalar_text(item) {
                            out.append_pair(key, &text);
                        }
                    }
                }
                other => {
                    if let Some(text) = scalar_text(other) {
                        out.append_pair(key, &text);
                    }
                }
            }
        }

        out.finish()
    }
}

/// Form text for a scalar JSON value; `None` for null, arrays and objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
