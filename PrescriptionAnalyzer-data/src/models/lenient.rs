//! Tolerant field deserializers for analysis responses.
//!
//! The analysis service produces its JSON from a language model, so values drift in
//! shape: ages arrive as numbers, sections arrive as `null`, medication lists contain
//! stray strings. These helpers accept that drift instead of failing the whole payload.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Read a scalar as text. Numbers and booleans keep their textual form; `null`
/// and structured values count as absent.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => {
            warn!(value = %other, "Ignoring structured value where text was expected");
            None
        }
    })
}

/// Read a nested record, falling back to its empty form for `null` or any
/// non-object value.
pub(crate) fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => T::deserialize(value).map_err(D::Error::custom),
        Value::Null => Ok(T::default()),
        other => {
            warn!(value = %other, "Ignoring non-object value where a record was expected");
            Ok(T::default())
        }
    }
}

/// Read a list of records, skipping entries that are not objects.
pub(crate) fn object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(_) => Some(T::deserialize(item).map_err(D::Error::custom)),
                other => {
                    warn!(entry = %other, "Skipping non-object list entry");
                    None
                }
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => {
            warn!(value = %other, "Ignoring non-array value where a list was expected");
            Ok(Vec::new())
        }
    }
}
