//! Field-by-field recovery of persisted documents.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The top-level fields of a persisted document.
pub(crate) struct Fields {
    map: Map<String, Value>,
}

impl Fields {
    /// Parses persisted JSON. Returns `None` unless it is a JSON object.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(Self { map }),
            Ok(other) => {
                log::warn!("persisted document is not an object ({}), using defaults", kind_of(&other));
                None
            }
            Err(err) => {
                log::warn!("persisted document is unreadable ({err}), using defaults");
                None
            }
        }
    }

    /// Reads a field, falling back to `default` when it is absent or has the
    /// wrong shape.
    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(value) = self.map.get(key) else {
            log::debug!("persisted field {key:?} missing, using default");
            return default;
        };
        match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("persisted field {key:?} malformed ({err}), using default");
                default
            }
        }
    }

    /// Returns the raw array stored under `key`, if it is one.
    pub(crate) fn array(&self, key: &str) -> Option<&Vec<Value>> {
        match self.map.get(key) {
            Some(Value::Array(items)) => Some(items),
            Some(other) => {
                log::warn!("persisted field {key:?} is {}, expected array", kind_of(other));
                None
            }
            None => None,
        }
    }
}

/// Deserializes one array element, logging and discarding it if malformed.
pub(crate) fn element<T: DeserializeOwned>(key: &str, index: usize, value: &Value) -> Option<T> {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            log::warn!("dropping malformed {key}[{index}]: {err}");
            None
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_objects_are_rejected() {
        assert!(Fields::parse("not json").is_none());
        assert!(Fields::parse("[1, 2]").is_none());
        assert!(Fields::parse("null").is_none());
        assert!(Fields::parse("{}").is_some());
    }

    #[test]
    fn get_falls_back_per_field() {
        let fields = Fields::parse(r#"{ "a": 5, "b": "wide", "c": -3 }"#).unwrap();
        assert_eq!(fields.get::<u32>("a", 1), 5);
        assert_eq!(fields.get::<u32>("b", 2), 2);
        assert_eq!(fields.get::<u32>("c", 3), 3);
        assert_eq!(fields.get::<u32>("missing", 4), 4);
    }

    #[test]
    fn array_requires_array() {
        let fields = Fields::parse(r#"{ "xs": [1], "ys": {} }"#).unwrap();
        assert_eq!(fields.array("xs").map(Vec::len), Some(1));
        assert!(fields.array("ys").is_none());
        assert!(fields.array("zs").is_none());
    }
}
