//! Error types for configuration resolution.
//!
//! Responsibilities:
//! - Define the `ConfigError` taxonomy shared by the resolver, bound views,
//!   option declarations, and source loading.
//! - Define `SourceError`, the failure type a `Source` returns for internal
//!   faults (as opposed to a missing key).
//!
//! Does NOT handle:
//! - Building user-facing messages (see `message.rs`).
//! - Parser failures (see `ParseError` in `parser/mod.rs`).
//!
//! Invariants:
//! - Missing and invalid values never collapse into one variant.
//! - Every `Missing`/`InvalidValue` message names the fully-qualified key.
//! - Env file errors NEVER include raw line contents to prevent secret leakage.

use std::path::PathBuf;
use thiserror::Error;

use crate::namespace::Namespace;

/// Context carried by missing-value and invalid-value errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedError {
    /// The user-facing message produced by the resolver's message builder.
    pub message: String,
    /// Namespace the lookup was performed in.
    pub namespace: Namespace,
    /// The key as the caller supplied it.
    pub key: String,
    /// Name of the parser the value had to satisfy.
    pub parser: String,
}

impl std::fmt::Display for DetailedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors that can occur while declaring, loading, or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No source had a value for the key and no default was declared.
    #[error("{0}")]
    Missing(DetailedError),

    /// A value was found (or defaulted) but the parser rejected it.
    #[error("{0}")]
    InvalidValue(DetailedError),

    /// A restricted view was asked for a key its component does not declare.
    #[error("'{key}' is not a valid key for {component}")]
    InvalidKey { key: String, component: String },

    /// Structurally invalid option metadata, detected at declaration or bind time.
    #[error("invalid configuration definition: {0}")]
    Definition(String),

    /// Typed access requested a type the declared parser does not produce.
    #[error("option '{key}' is parsed by {parser}, which does not produce {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        parser: String,
    },

    /// A source failed internally while looking up a key.
    #[error("source failed while looking up {full_key}: {source}")]
    Source {
        namespace: Namespace,
        key: String,
        full_key: String,
        #[source]
        source: SourceError,
    },

    /// Free-form configuration error raised by application code.
    #[error("{0}")]
    Configuration(String),

    #[error("Failed to read env file at {path}")]
    EnvFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SAFETY: only the line number is reported, never the line itself.
    #[error("Env file line missing = operator in {path} (line {line})")]
    EnvFileParse { path: PathBuf, line: usize },

    #[error("Invalid variable name '{key}' in env file {path} (line {line})")]
    EnvFileKey {
        path: PathBuf,
        line: usize,
        key: String,
    },

    #[error("Invalid YAML config file at {path}: {message}")]
    YamlFile { path: PathBuf, message: String },

    #[error("Cannot build object source: {message}")]
    ObjectSource { message: String },
}

impl ConfigError {
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Missing(_))
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, ConfigError::InvalidValue(_))
    }

    pub fn is_invalid_key(&self) -> bool {
        matches!(self, ConfigError::InvalidKey { .. })
    }

    /// Namespace/key/parser context for missing and invalid values.
    pub fn detail(&self) -> Option<&DetailedError> {
        match self {
            ConfigError::Missing(detail) | ConfigError::InvalidValue(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Internal failure of a configuration source.
///
/// Sources return `Ok(None)` for absent keys; this type is reserved for a
/// source that cannot answer at all (unreadable backing store, non-UTF-8
/// environment value, and similar).
#[derive(Error, Debug)]
#[error("{message}")]
pub struct SourceError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a lower-level error, keeping it reachable via `Error::source`.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
