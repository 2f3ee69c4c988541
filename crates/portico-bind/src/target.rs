//! Current-value snapshots for in-place decoding.

use portico_core::{BindError, BindSource};
use serde::Serialize;
use serde_json::Value;

/// The target's current value as JSON.
pub(crate) fn snapshot<T: Serialize>(target: &T, origin: BindSource) -> Result<Value, BindError> {
    serde_json::to_value(target)
        .map_err(|e| BindError::malformed(origin, format!("target is not representable: {e}")))
}

/// Overlays `patch` onto `base`.
///
/// Objects merge key by key, recursively. Any other patch value replaces
/// the base value outright, arrays included.
pub(crate) fn overlay(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(fields), Value::Object(patch)) => {
            for (key, value) in patch {
                match fields.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        fields.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}
