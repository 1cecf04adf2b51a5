//! Source bridging a serializable object (CLI argument structs, settings
//! structs) into configuration lookups.
//!
//! Invariants:
//! - Field names are matched case-insensitively against the lower-cased full key.
//! - `null` fields (e.g. `None` arguments) are treated as absent.
//! - Non-string values are rendered as their JSON text (`8000`, `true`, `[1,2]`).

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::Source;
use crate::error::{ConfigError, SourceError};
use crate::namespace::Namespace;

/// Source over the top-level fields of any `Serialize` struct or map.
///
/// Namespace `["bar"]` and key `foo` look up the field `bar_foo`.
#[derive(Debug, Clone, Default)]
pub struct ObjectSource {
    fields: HashMap<String, Value>,
}

impl ObjectSource {
    pub fn new<T: Serialize + ?Sized>(object: &T) -> Result<Self, ConfigError> {
        let value = serde_json::to_value(object).map_err(|e| ConfigError::ObjectSource {
            message: e.to_string(),
        })?;
        let Value::Object(map) = value else {
            return Err(ConfigError::ObjectSource {
                message: "value must serialize to a struct or map".to_string(),
            });
        };

        Ok(Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        })
    }
}

impl Source for ObjectSource {
    fn get(&self, key: &str, namespace: &Namespace) -> Result<Option<String>, SourceError> {
        let full_key = namespace.full_key(key).to_lowercase();
        tracing::debug!(source = "object", full_key = %full_key, "Searching source");
        Ok(match self.fields.get(&full_key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
    }
}
