//! Lenient decoders for fields the server is inconsistent about.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Identifiers are opaque strings, but some endpoints emit them as numbers.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or numeric identifier, found {other}"
        ))),
    }
}

pub(crate) fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!(
            "expected string or numeric identifier, found {other}"
        ))),
    }
}

/// Workflow tags arrive either as `["a", "b"]` or as `[{"id": .., "name": "a"}]`.
pub(crate) fn tag_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|tag| match tag {
            Value::String(name) => Ok(name),
            Value::Object(mut obj) => match obj.remove("name") {
                Some(Value::String(name)) => Ok(name),
                _ => Err(D::Error::custom("tag object is missing a string 'name'")),
            },
            other => Err(D::Error::custom(format!("unexpected tag entry {other}"))),
        })
        .collect()
}
