use crate::error::MalformedInputError;
use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// An unstructured json document, kept as-is until something decodes it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(transparent)]
pub struct RawMessage(pub Value);

impl RawMessage {
    pub fn as_object(&self) -> Result<&Map<String, Value>, MalformedInputError> {
        self.0
            .as_object()
            .ok_or_else(|| MalformedInputError::NotAnObject(json_kind(&self.0)))
    }

    /// Reads the document as a single level object of scalar values.
    pub fn as_flat_map(&self) -> Result<BTreeMap<String, Value>, MalformedInputError> {
        self.as_object()?
            .iter()
            .map(|(key, value)| match value {
                Value::Array(_) | Value::Object(_) => {
                    Err(MalformedInputError::NestedParameter(key.clone()))
                }
                scalar => Ok((key.clone(), scalar.clone())),
            })
            .collect()
    }
}

impl From<Value> for RawMessage {
    fn from(value: Value) -> Self {
        RawMessage(value)
    }
}

/// Formats a json scalar the way it is written into an application property.
///
/// Strings are taken verbatim, null becomes the empty string and everything else
/// uses its json text.
pub fn property_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decodes a struct from a json object only, serde would otherwise also
/// accept an array matching the fields by position.
pub fn from_object<T: DeserializeOwned>(value: &Value) -> Result<T, MalformedInputError> {
    match value {
        Value::Object(_) => Ok(T::deserialize(value)?),
        other => Err(MalformedInputError::NotAnObject(json_kind(other))),
    }
}

/// `deserialize_with` helper applying [`from_object`] to a field.
pub(crate) fn deserialize_object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    from_object(&value).map_err(D::Error::custom)
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_map_rejects_nested_values() {
        let raw = RawMessage(json!({"maximumRedeliveries": 3, "nested": {"a": 1}}));
        match raw.as_flat_map() {
            Err(MalformedInputError::NestedParameter(key)) => assert_eq!(key, "nested"),
            other => panic!("expected nested parameter error, got {:?}", other),
        }
    }

    #[test]
    fn flat_map_rejects_non_objects() {
        let raw = RawMessage(json!(["a", "b"]));
        assert!(matches!(raw.as_flat_map(), Err(MalformedInputError::NotAnObject("array"))));
    }

    #[test]
    fn from_object_rejects_arrays() {
        let decoded: Result<BTreeMap<String, String>, _> = from_object(&json!({"level": "WARN"}));
        assert_eq!(decoded.unwrap()["level"], "WARN");

        let decoded: Result<BTreeMap<String, String>, _> = from_object(&json!([["level", "WARN"]]));
        assert!(matches!(decoded, Err(MalformedInputError::NotAnObject("array"))));
    }

    #[test]
    fn property_values_are_stringified() {
        assert_eq!(property_value(&json!("value")), "value");
        assert_eq!(property_value(&json!(3)), "3");
        assert_eq!(property_value(&json!(2.5)), "2.5");
        assert_eq!(property_value(&json!(true)), "true");
        assert_eq!(property_value(&json!(null)), "");
    }
}
