//! Extension list entries as they appear in configuration.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of the configured extension list.
///
/// Configuration accepts a bare name (`"store-finder"`), a `[name, config]`
/// pair, a local path (`"./extensions/foo"` or `"/abs/foo"`), or a falsy
/// placeholder that switches an entry off. The shape is decided once here;
/// the normalizer never looks at raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum ExtensionEntry {
    /// Bare name or path, default configuration
    Name(String),
    /// Name or path with an explicit configuration object
    Configured(String, Value),
    /// `null`, `false`, `""` or `0`
    Disabled,
}

impl ExtensionEntry {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn configured(name: impl Into<String>, config: Value) -> Self {
        Self::Configured(name.into(), config)
    }

    /// Split into `(name, config)`; `None` for disabled entries.
    ///
    /// Entries without explicit configuration get an empty object.
    pub fn parts(&self) -> Option<(&str, Value)> {
        match self {
            Self::Name(name) => Some((name.as_str(), Value::Object(Map::new()))),
            Self::Configured(name, config) => Some((name.as_str(), config.clone())),
            Self::Disabled => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Interpret a raw configuration value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        if is_falsy(&value) {
            return Ok(Self::Disabled);
        }

        match value {
            Value::String(name) => Ok(Self::Name(name)),
            Value::Array(mut items) => {
                if items.is_empty() || items.len() > 2 {
                    return Err(malformed(
                        "expected a [name, config] pair",
                        &Value::Array(items),
                    ));
                }
                let config = if items.len() == 2 {
                    items.pop().unwrap_or(Value::Null)
                } else {
                    Value::Object(Map::new())
                };
                match items.pop() {
                    Some(Value::String(name)) if !name.is_empty() => {
                        let config = if config.is_null() {
                            Value::Object(Map::new())
                        } else {
                            config
                        };
                        Ok(Self::Configured(name, config))
                    }
                    Some(other) => Err(malformed("extension name must be a string", &other)),
                    None => Err(malformed("expected a [name, config] pair", &Value::Null)),
                }
            }
            other => Err(malformed(
                "expected a name, a [name, config] pair or a falsy value",
                &other,
            )),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn malformed(reason: &str, value: &Value) -> ConfigError {
    ConfigError::MalformedEntry {
        reason: reason.to_string(),
        value: value.to_string(),
    }
}

impl TryFrom<Value> for ExtensionEntry {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<ExtensionEntry> for Value {
    fn from(entry: ExtensionEntry) -> Self {
        match entry {
            ExtensionEntry::Name(name) => Value::String(name),
            ExtensionEntry::Configured(name, config) => {
                Value::Array(vec![Value::String(name), config])
            }
            ExtensionEntry::Disabled => Value::Bool(false),
        }
    }
}

impl From<&str> for ExtensionEntry {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}
