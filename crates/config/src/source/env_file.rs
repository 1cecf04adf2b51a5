//! `.env` file source.
//!
//! Responsibilities:
//! - Pick the first existing file from a list of candidate paths.
//! - Parse `KEY=value` lines (blank and `#` lines ignored, one pair of
//!   matching quotes stripped) without touching the process environment.
//! - Validate variable names and store them uppercased.
//!
//! Does NOT handle:
//! - Exporting values into `std::env` (use `EnvSource` for the live environment).
//! - Variable substitution or inline comments. Values are taken verbatim.
//!
//! Invariants:
//! - A missing file is not an error; the source simply never has values.
//! - Parse errors NEVER include raw line contents to prevent secret leakage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{Source, first_existing_file};
use crate::error::{ConfigError, SourceError};
use crate::namespace::Namespace;

/// Source backed by the first `.env` file found among candidate paths.
#[derive(Debug, Clone, Default)]
pub struct EnvFileSource {
    path: Option<PathBuf>,
    values: HashMap<String, String>,
}

impl EnvFileSource {
    /// Load the first existing file among `possible_paths` (`~` is expanded).
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
            tracing::debug!(candidates = ?candidates, "No env file found");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::EnvFileRead {
            path: path.clone(),
            source: e,
        })?;
        let values = read_entries(&content, &path)?
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();

        tracing::debug!(path = %path.display(), "Loaded env file");
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// The file that was loaded, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Source for EnvFileSource {
    fn get(&self, key: &str, namespace: &Namespace) -> Result<Option<String>, SourceError> {
        let full_key = namespace.full_key(key);
        tracing::debug!(source = "env_file", path = ?self.path, full_key = %full_key, "Searching source");
        Ok(self.values.get(&full_key).cloned())
    }
}

/// Parse the content of an env file into `(KEY, value)` pairs, keys as written.
///
/// Later lines win when a key repeats.
pub fn parse_env_file(content: &str) -> Result<HashMap<String, String>, ConfigError> {
    Ok(read_entries(content, Path::new("<string>"))?
        .into_iter()
        .collect())
}

fn read_entries(content: &str, path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let mut entries = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::EnvFileParse {
                path: path.to_path_buf(),
                line: index + 1,
            });
        };

        let key = key.trim();
        if !is_valid_key(key) {
            return Err(ConfigError::EnvFileKey {
                path: path.to_path_buf(),
                line: index + 1,
                key: key.to_string(),
            });
        }
        entries.push((key.to_string(), strip_quotes(value.trim()).to_string()));
    }
    Ok(entries)
}

/// Strip one pair of matching `'` or `"` quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.starts_with(quote) && value.ends_with(quote) {
            return value.get(1..value.len() - 1).unwrap_or("");
        }
    }
    value
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
