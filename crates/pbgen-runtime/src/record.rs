//! Untyped property bag and the lenient casts models read it through.
//!
//! The store is loose about types on the wire: numbers arrive as strings,
//! booleans as `0`/`1`, single relations as a bare id. Getters here accept
//! all of those and fall back to the zero value instead of failing, so a
//! model can always be built from whatever the server sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::datetime::DateTime;

/// A record as a mapping from field key to JSON value.
///
/// Keys the caller does not know about are kept untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// String value, `""` when missing or null.
    pub fn get_string(&self, key: &str) -> String {
        self.get_optional_string(key).unwrap_or_default()
    }

    /// String value, `None` when missing or null.
    pub fn get_optional_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(cast_string)
    }

    /// Boolean value, `false` when missing or not castable.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get_optional_bool(key).unwrap_or_default()
    }

    pub fn get_optional_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(cast_bool)
    }

    /// Numeric value, `0.0` when missing or not castable.
    pub fn get_number(&self, key: &str) -> f64 {
        self.get_optional_number(key).unwrap_or_default()
    }

    pub fn get_optional_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(cast_number)
    }

    /// Timestamp value, zero when missing or unparseable.
    pub fn get_datetime(&self, key: &str) -> DateTime {
        match self.get(key) {
            Some(Value::String(s)) => DateTime::parse(s).unwrap_or_default(),
            _ => DateTime::zero(),
        }
    }

    /// List of non-empty strings.
    ///
    /// Accepts an array, a single id, or a JSON-encoded array.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => collect_strings(items),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Vec::new()
                } else if trimmed.starts_with('[') {
                    serde_json::from_str::<Vec<Value>>(trimmed)
                        .map(|items| collect_strings(&items))
                        .unwrap_or_else(|_| vec![s.clone()])
                } else {
                    vec![s.clone()]
                }
            }
            Some(other) => cast_string(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Raw JSON value, `null` when missing.
    pub fn get_json(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn cast_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn cast_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn cast_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn collect_strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(cast_string)
        .filter(|s| !s.is_empty())
        .collect()
}
