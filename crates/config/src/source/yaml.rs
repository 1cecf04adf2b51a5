//! YAML file source.
//!
//! Responsibilities:
//! - Pick the first existing YAML file from candidate paths.
//! - Flatten nested mappings into `_`-joined uppercase keys.
//!
//! Invariants:
//! - Only the first YAML document is read.
//! - Leaf values must be strings; anything else fails at load time so that a
//!   typo like `port: 8000` (instead of `"8000"`) surfaces early.
//! - An empty file yields an empty source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::{Source, first_existing_file};
use crate::constants::KEY_SEPARATOR;
use crate::error::{ConfigError, SourceError};
use crate::namespace::Namespace;

/// Source backed by the first YAML file found among candidate paths.
#[derive(Debug, Clone, Default)]
pub struct YamlFileSource {
    path: Option<PathBuf>,
    values: HashMap<String, String>,
}

impl YamlFileSource {
    pub fn new<I, P>(possible_paths: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let candidates: Vec<String> = possible_paths
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        let Some(path) = first_existing_file(&candidates) else {
            tracing::debug!(candidates = ?candidates, "No YAML file found");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::YamlFile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let values = parse_yaml(&content, &path)?;

        tracing::debug!(path = %path.display(), keys = values.len(), "Loaded YAML file");
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Source for YamlFileSource {
    fn get(&self, key: &str, namespace: &Namespace) -> Result<Option<String>, SourceError> {
        let full_key = namespace.full_key(key);
        tracing::debug!(source = "yaml", path = ?self.path, full_key = %full_key, "Searching source");
        Ok(self.values.get(&full_key).cloned())
    }
}

fn parse_yaml(content: &str, path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let yaml_error = |message: String| ConfigError::YamlFile {
        path: path.to_path_buf(),
        message,
    };

    let document: Value = serde_yaml::from_str(content).map_err(|e| yaml_error(e.to_string()))?;
    let mut values = HashMap::new();
    match document {
        Value::Null => {}
        Value::Mapping(_) => flatten(&mut Vec::new(), &document, &mut values)
            .map_err(yaml_error)?,
        _ => return Err(yaml_error("top level must be a mapping".to_string())),
    }
    Ok(values)
}

fn flatten(
    prefix: &mut Vec<String>,
    value: &Value,
    out: &mut HashMap<String, String>,
) -> Result<(), String> {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let Some(key) = key.as_str() else {
                    return Err(format!("keys must be strings, got {key:?}"));
                };
                prefix.push(key.to_string());
                flatten(prefix, child, out)?;
                prefix.pop();
            }
            Ok(())
        }
        Value::String(s) => {
            out.insert(prefix.join(KEY_SEPARATOR).to_uppercase(), s.clone());
            Ok(())
        }
        other => Err(format!(
            "invalid value {other:?} for {}: values must be double-quoted strings",
            prefix.join(KEY_SEPARATOR)
        )),
    }
}
