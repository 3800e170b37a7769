//! Property dictionary used to configure models at construction time.
//!
//! Values are stored as JSON values. Lookups are typed through serde, and
//! string entries are additionally parsed so that `"1.0"` or `"true"` read
//! the same as their literal counterparts.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur during typed parameter lookups.
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("Missing parameter: {0}")]
    Missing(String),

    #[error("Invalid value for parameter {name}: {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Parameters must be a JSON object")]
    NotAnObject,
}

/// Result type for parameter lookups.
pub type ParamResult<T> = Result<T, ParamError>;

/// A flat name → value dictionary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamArray {
    values: Map<String, Value>,
}

impl ParamArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object, e.g. the contents of a parameter file.
    pub fn from_json_str(json: &str) -> ParamResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|source| ParamError::InvalidValue {
            name: "<root>".to_string(),
            source,
        })?;
        match value {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(ParamError::NotAnObject),
        }
    }

    /// Builder-style insertion.
    pub fn insert(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Typed lookup that reports why a value could not be produced.
    pub fn try_get<T: DeserializeOwned>(&self, name: &str) -> ParamResult<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ParamError::Missing(name.to_string()))?;

        match serde_json::from_value(value.clone()) {
            Ok(v) => Ok(v),
            Err(source) => match value {
                // "1.0", "true", "16" are accepted for numeric/bool parameters
                Value::String(s) => serde_json::from_str(s).map_err(|_| ParamError::InvalidValue {
                    name: name.to_string(),
                    source,
                }),
                _ => Err(ParamError::InvalidValue {
                    name: name.to_string(),
                    source,
                }),
            },
        }
    }

    /// Lookup of a parameter the model expects to be set.
    ///
    /// Missing or malformed values are logged as errors and replaced by `default`.
    pub fn get_required<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        match self.try_get(name) {
            Ok(v) => v,
            Err(e) => {
                log::error!("{}, using default value", e);
                default
            }
        }
    }

    /// Lookup of a parameter that may legitimately be absent.
    ///
    /// Missing values silently yield `default`; malformed ones are logged.
    pub fn get_optional<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        match self.try_get(name) {
            Ok(v) => v,
            Err(ParamError::Missing(_)) => default,
            Err(e) => {
                log::error!("{}, using default value", e);
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_lookup() {
        let params = ParamArray::new()
            .insert("samples", 32)
            .insert("max_distance", 2.5)
            .insert("enable_diagnostics", true)
            .insert("output_filename", "tree.obj");

        assert_eq!(params.get_required::<usize>("samples", 16), 32);
        assert_eq!(params.get_required::<f32>("max_distance", 1.0), 2.5);
        assert!(params.get_optional::<bool>("enable_diagnostics", false));
        assert_eq!(
            params.get_optional::<String>("output_filename", String::new()),
            "tree.obj"
        );
    }

    #[test]
    fn test_string_values_are_parsed() {
        let params = ParamArray::new()
            .insert("roughness", "0.25")
            .insert("enable_diagnostics", "true")
            .insert("samples", "8");

        assert_eq!(params.get_required::<f32>("roughness", 0.1), 0.25);
        assert!(params.get_optional::<bool>("enable_diagnostics", false));
        assert_eq!(params.get_required::<usize>("samples", 16), 8);
    }

    #[test]
    fn test_defaults() {
        let _ = env_logger::builder().is_test(true).try_init();

        let params = ParamArray::new().insert("samples", "many");

        assert_eq!(params.get_required::<usize>("samples", 16), 16);
        assert_eq!(params.get_optional::<f32>("low_threshold", 2.0), 2.0);
        assert!(matches!(
            params.try_get::<f32>("low_threshold"),
            Err(ParamError::Missing(_))
        ));
        assert!(matches!(
            params.try_get::<usize>("samples"),
            Err(ParamError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_from_json_str() {
        let params = ParamArray::from_json_str(r#"{ "samples": 4, "low_threshold": "1.5" }"#).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get_optional::<f64>("low_threshold", 2.0), 1.5);

        assert!(matches!(
            ParamArray::from_json_str("[1, 2]"),
            Err(ParamError::NotAnObject)
        ));
        assert!(ParamArray::from_json_str("{ nope").is_err());
    }
}
