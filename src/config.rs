//! Experiment configuration
//!
//! A configuration is an arbitrary JSON object supplied by the caller. Key
//! order is preserved so `config.json` mirrors what was passed in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rng::DEFAULT_RANDOM_SEED;
use crate::{Error, Result};

/// Reserved configuration key holding the RNG seed.
pub const RANDOM_SEED_KEY: &str = "random_seed";

/// Experiment configuration: a mapping from string keys to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentConfig {
    entries: Map<String, Value>,
}

impl ExperimentConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the value cannot be represented as
    /// JSON (e.g. a map with non-string keys), and `InvalidConfig` if it
    /// does not serialize to a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(|e| {
            Error::SerializationError(format!("config is not JSON-representable: {e}"))
        })?;
        Self::try_from(value)
    }

    /// Get a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the configuration has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Resolve the RNG seed from `random_seed`, falling back to 42.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `random_seed` is present but is not a
    /// non-negative integer.
    pub fn random_seed(&self) -> Result<u64> {
        match self.entries.get(RANDOM_SEED_KEY) {
            None => Ok(DEFAULT_RANDOM_SEED),
            Some(value) => value.as_u64().ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "{RANDOM_SEED_KEY} must be a non-negative integer, got {value}"
                ))
            }),
        }
    }
}

impl TryFrom<Value> for ExperimentConfig {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(Error::InvalidConfig(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl From<Map<String, Value>> for ExperimentConfig {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

const fn json_kind(value: &Value) -> &'static str {
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
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_default_seed() {
        let config = ExperimentConfig::try_from(json!({"lr": 0.01})).unwrap();
        assert_eq!(config.random_seed().unwrap(), 42);
    }

    #[test]
    fn test_explicit_seed() {
        let config = ExperimentConfig::try_from(json!({"random_seed": 7})).unwrap();
        assert_eq!(config.random_seed().unwrap(), 7);
    }

    #[test]
    fn test_malformed_seed_rejected() {
        for bad in [json!(-1), json!(1.5), json!("7"), json!(null)] {
            let config = ExperimentConfig::try_from(json!({ "random_seed": bad })).unwrap();
            assert!(matches!(config.random_seed(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_non_object_rejected() {
        let err = ExperimentConfig::try_from(json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_from_serialize_map() {
        let mut params = HashMap::new();
        params.insert("batch_size", 32);
        let config = ExperimentConfig::from_serialize(&params).unwrap();
        assert_eq!(config.get("batch_size"), Some(&json!(32)));
    }

    #[test]
    fn test_from_serialize_non_string_keys() {
        let mut params = HashMap::new();
        params.insert(vec![1u8, 2], 32);
        let err = ExperimentConfig::from_serialize(&params).unwrap_err();
        assert!(matches!(err, Error::SerializationError(_)));
    }

    #[test]
    fn test_key_order_preserved() {
        let mut config = ExperimentConfig::new();
        config.insert("zeta", 1);
        config.insert("alpha", 2);
        let keys: Vec<&String> = config.as_map().keys().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }
}
