use serde::de::DeserializeOwned;
use serde_json::Value;

use super::DeserializationError;

/// The deepest nesting of JSON arrays and objects accepted in a success body.
/// Relation graphs in the API are trees, so well-formed responses stay far
/// below this.
pub const MAX_DEPTH: usize = 64;

/// Decode a success body into an envelope type. Nested relations are
/// materialized as part of the same pass; any failure aborts the whole body.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, DeserializationError> {
    let value: Value = serde_json::from_slice(body)?;
    if depth(&value) > MAX_DEPTH {
        return Err(DeserializationError::TooDeep { limit: MAX_DEPTH });
    }

    serde_path_to_error::deserialize(value).map_err(|e| {
        let path = e.path().to_string();
        DeserializationError::Shape {
            path,
            source: e.into_inner(),
        }
    })
}

/// The number of nested containers on the deepest branch of `value`.
fn depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 0)];

    while let Some((value, level)) = stack.pop() {
        match value {
            Value::Array(items) => {
                deepest = deepest.max(level + 1);
                stack.extend(items.iter().map(|v| (v, level + 1)));
            }
            Value::Object(fields) => {
                deepest = deepest.max(level + 1);
                stack.extend(fields.values().map(|v| (v, level + 1)));
            }
            _ => (),
        }
    }

    deepest
}
