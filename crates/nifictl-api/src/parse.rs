// Response parsing layer
//
// Every body goes through `decode`, which applies an explicit policy for
// fields the wire models do not know about. `IgnoreUnknown` tolerates newer
// NiFi releases adding fields; `RejectUnknown` fails on the first one, which
// is useful when validating models against a specific server version.
//
// Unknown-field detection compares the raw JSON against the re-serialized
// typed value, so wire models must serialize every field they declare
// (no `skip_serializing_if`).

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, body_preview};

/// How the parser treats JSON object keys that have no model field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Drop unrecognized fields silently.
    #[default]
    IgnoreUnknown,
    /// Fail with `Error::Deserialization` naming the first unrecognized field.
    RejectUnknown,
}

/// Decode a response body into `T` under the given field policy.
pub fn decode<T>(body: &str, policy: FieldPolicy) -> Result<T, Error>
where
    T: DeserializeOwned + Serialize,
{
    let raw: Value = serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {})", body_preview(body)),
        body: body.to_owned(),
    })?;

    let typed: T = serde_json::from_value(raw.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })?;

    if policy == FieldPolicy::RejectUnknown {
        let known = serde_json::to_value(&typed).map_err(|e| Error::Deserialization {
            message: format!("re-encoding for field check failed: {e}"),
            body: body.to_owned(),
        })?;
        if let Some(path) = first_unknown_field(&raw, &known, "$") {
            return Err(Error::Deserialization {
                message: format!("unknown field `{path}`"),
                body: body.to_owned(),
            });
        }
    }

    Ok(typed)
}

/// Path of the first key present in `raw` but absent from `known`.
fn first_unknown_field(raw: &Value, known: &Value, path: &str) -> Option<String> {
    match (raw, known) {
        (Value::Object(raw_map), Value::Object(known_map)) => {
            raw_map.iter().find_map(|(key, raw_child)| {
                let child_path = format!("{path}.{key}");
                match known_map.get(key) {
                    None => Some(child_path),
                    Some(known_child) => first_unknown_field(raw_child, known_child, &child_path),
                }
            })
        }
        (Value::Array(raw_items), Value::Array(known_items)) => raw_items
            .iter()
            .zip(known_items)
            .enumerate()
            .find_map(|(i, (r, k))| first_unknown_field(r, k, &format!("{path}[{i}]"))),
        _ => None,
    }
}
