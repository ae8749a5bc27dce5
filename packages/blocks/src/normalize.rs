//! # Lenient Payload Normalization
//!
//! Stored and incoming payloads are never trusted as-is. Every key is checked
//! against the typed schema of its variant:
//!
//! - keys the schema does not declare are dropped
//! - keys whose value does not fit the declared field type are dropped
//! - everything else is kept, on top of the variant's defaults
//!
//! Dropped keys are reported back so callers can log or surface them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A normalized value plus the keys that had to be discarded to get it
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub dropped: Vec<String>,
}

impl<T> Normalized<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            dropped: Vec::new(),
        }
    }

    /// True when nothing was discarded
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Normalized<U> {
        Normalized {
            value: f(self.value),
            dropped: self.dropped,
        }
    }

    /// Prefix every dropped key, e.g. `content.fontSize`
    pub fn scoped(mut self, scope: &str) -> Self {
        for key in &mut self.dropped {
            *key = format!("{}.{}", scope, key);
        }
        self
    }
}

/// Serialize a payload struct into its JSON object form
pub fn to_object<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or_default()
}

/// Build a payload from untrusted JSON, starting from the defaults
pub fn normalize_payload<T>(raw: &Value) -> Normalized<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    match raw {
        Value::Object(fields) => merge_payload(&T::default(), fields),
        Value::Null => Normalized::clean(T::default()),
        _ => Normalized {
            value: T::default(),
            dropped: vec!["*".to_string()],
        },
    }
}

/// Shallow-merge `patch` into `current`, keeping only conforming keys
pub fn merge_payload<T>(current: &T, patch: &Map<String, Value>) -> Normalized<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    let Value::Object(mut fields) = to_object(current) else {
        return Normalized::clean(current.clone());
    };

    let mut dropped = Vec::new();
    for (key, value) in patch {
        if !fields.contains_key(key) {
            dropped.push(key.clone());
            continue;
        }

        let previous = fields.insert(key.clone(), value.clone());
        if serde_json::from_value::<T>(Value::Object(fields.clone())).is_err() {
            if let Some(previous) = previous {
                fields.insert(key.clone(), previous);
            }
            dropped.push(key.clone());
        }
    }

    dropped.sort();
    let value = serde_json::from_value(Value::Object(fields)).unwrap_or_else(|_| current.clone());
    Normalized { value, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Sample {
        title: String,
        count: u32,
        enabled: bool,
        note: Option<String>,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                title: "Untitled".to_string(),
                count: 1,
                enabled: false,
                note: None,
            }
        }
    }

    #[test]
    fn test_normalize_keeps_conforming_keys() {
        let result: Normalized<Sample> = normalize_payload(&json!({ "title": "Hi", "count": 3 }));
        assert!(result.is_clean());
        assert_eq!(result.value.title, "Hi");
        assert_eq!(result.value.count, 3);
        assert!(!result.value.enabled);
    }

    #[test]
    fn test_normalize_drops_mistyped_and_unknown_keys() {
        let result: Normalized<Sample> =
            normalize_payload(&json!({ "title": 42, "enabled": "yes", "legacy": true, "count": 7 }));

        assert_eq!(result.value.title, "Untitled");
        assert!(!result.value.enabled);
        assert_eq!(result.value.count, 7);
        assert_eq!(result.dropped, vec!["enabled", "legacy", "title"]);
    }

    #[test]
    fn test_non_object_payload_falls_back_to_defaults() {
        let result: Normalized<Sample> = normalize_payload(&json!([1, 2, 3]));
        assert_eq!(result.value, Sample::default());
        assert!(!result.is_clean());
    }

    #[test]
    fn test_merge_null_clears_optional_field() {
        let current = Sample {
            note: Some("keep?".to_string()),
            ..Sample::default()
        };
        let patch = json!({ "note": null });
        let result = merge_payload(&current, patch.as_object().unwrap());
        assert!(result.is_clean());
        assert_eq!(result.value.note, None);
    }

    #[test]
    fn test_scoped_prefixes_dropped_keys() {
        let result: Normalized<Sample> = normalize_payload(&json!({ "bogus": 1 }));
        assert_eq!(result.scoped("content").dropped, vec!["content.bogus"]);
    }
}
