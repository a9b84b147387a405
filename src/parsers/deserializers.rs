use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::Metadata;

/// Custom deserializer for record metadata.
///
/// Accepts `null` (treated as no metadata) or an array whose elements are themselves
/// arrays. Anything else makes the whole record malformed.
pub fn deserialize_metadata<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(Metadata::default()),
        Value::Array(items) => {
            let mut pairs = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                match item {
                    Value::Array(pair) => pairs.push(pair),
                    other => {
                        return Err(Error::custom(format!(
                            "metadata element {} must be an array, found {}",
                            i,
                            type_name(&other)
                        )));
                    }
                }
            }
            Ok(Metadata(pairs))
        }
        other => Err(Error::custom(format!("metadata must be an array, found {}", type_name(&other)))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
