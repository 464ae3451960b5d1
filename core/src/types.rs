//! Request body representation.
//!
//! # Design
//! Callers hand the verbs either an object they already have or an ordered
//! list of key/value pairs. Both collapse into one `serde_json::Map` before
//! serialization, so the wire form is always a plain JSON object.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Structured body for POST, PUT and DELETE.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A JSON object, sent as-is.
    Object(Map<String, Value>),
    /// Ordered key/value pairs. A repeated key keeps its last value.
    Entries(Vec<(String, Value)>),
}

impl Body {
    /// Encode any serializable value that produces a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(Body::Object(map)),
            Ok(other) => Err(ApiError::Serialization(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ApiError::Serialization(e.to_string())),
        }
    }

    /// Collapse into a plain JSON object.
    pub fn normalize(&self) -> Map<String, Value> {
        match self {
            Body::Object(map) => map.clone(),
            Body::Entries(entries) => entries.iter().cloned().collect(),
        }
    }

    /// Serialize the normalized object to JSON text.
    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string(&self.normalize()).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<Map<String, Value>> for Body {
    fn from(map: Map<String, Value>) -> Self {
        Body::Object(map)
    }
}

impl From<Vec<(String, Value)>> for Body {
    fn from(entries: Vec<(String, Value)>) -> Self {
        Body::Entries(entries)
    }
}

impl From<BTreeMap<String, Value>> for Body {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Body::Entries(map.into_iter().collect())
    }
}

impl From<HashMap<String, Value>> for Body {
    fn from(map: HashMap<String, Value>) -> Self {
        Body::Entries(map.into_iter().collect())
    }
}

impl<K, V> FromIterator<(K, V)> for Body
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Body::Entries(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
