//! Configuration resolver.
//!
//! Responsibilities:
//! - Hold the ordered source list, project docs, and message builder.
//! - Resolve a `Lookup` against the sources and run the parser.
//! - Hand out `BoundConfig` views sharing this resolver.
//!
//! Does NOT handle:
//! - Option declarations or key restriction (see `bound.rs` and `component.rs`).
//! - Caching. Every call queries the sources again.
//!
//! Invariants:
//! - Candidate order outranks source order: the primary key is checked in
//!   every source before the first alternate key is tried.
//! - A parse failure surfaces immediately; later sources are not consulted.
//! - Error messages name the primary key under the lookup namespace.
//! - Secret lookups never log their raw value.

mod builder;
mod lookup;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

pub use builder::ConfigManagerBuilder;
pub use lookup::Lookup;

use crate::bound::BoundConfig;
use crate::component::Component;
use crate::constants::{DEFAULT_ENV_FILE, REDACTED};
use crate::error::{ConfigError, DetailedError};
use crate::message::{MsgBuilder, MsgContext};
use crate::namespace::Namespace;
use crate::parser::{Parser, Str};
use crate::source::{DictSource, EnvFileSource, EnvSource, Source};

/// Ordered multi-source configuration resolver.
///
/// Cloning is cheap; clones share the same sources.
#[derive(Clone)]
pub struct ConfigManager {
    inner: Arc<Inner>,
}

#[derive(Clone)]
struct Inner {
    sources: Vec<Arc<dyn Source>>,
    doc: String,
    msg_builder: MsgBuilder,
}

impl fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigManager")
            .field("sources", &self.inner.sources)
            .field("doc", &self.inner.doc)
            .finish_non_exhaustive()
    }
}

impl ConfigManager {
    pub fn builder() -> ConfigManagerBuilder {
        ConfigManagerBuilder::new()
    }

    /// Resolver over `sources` (first wins), with override support.
    pub fn new(sources: Vec<Arc<dyn Source>>) -> Self {
        Self::builder().sources(sources).build()
    }

    /// Resolver over a single in-memory dictionary, with override support.
    pub fn from_dict<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::builder().source(DictSource::new(values)).build()
    }

    /// Process environment first, then the env file (`.env` when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the env file exists but cannot be read or parsed.
    pub fn basic_config(env_file: Option<&str>) -> Result<Self, ConfigError> {
        let env_file = EnvFileSource::new([env_file.unwrap_or(DEFAULT_ENV_FILE)])?;
        Ok(Self::builder().source(EnvSource::new()).source(env_file).build())
    }

    /// Copy of this resolver with different project docs.
    pub fn with_doc(&self, doc: impl Into<String>) -> Self {
        let mut inner = (*self.inner).clone();
        inner.doc = doc.into();
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn sources(&self) -> &[Arc<dyn Source>] {
        &self.inner.sources
    }

    pub fn doc(&self) -> &str {
        &self.inner.doc
    }

    /// Resolve `lookup` and parse the value with `parser`.
    ///
    /// Returns `Ok(None)` only when nothing was found, no default exists, and
    /// `lookup.raise_error` is false.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing` when nothing was found and `raise_error` is set.
    /// - `ConfigError::InvalidValue` when the parser rejects the value.
    /// - `ConfigError::Source` when a source fails internally.
    pub fn resolve<P: Parser>(
        &self,
        lookup: &Lookup,
        parser: &P,
    ) -> Result<Option<P::Output>, ConfigError> {
        let Some((raw, from_default)) = self.find_raw(lookup)? else {
            if lookup.raise_error {
                return Err(self.missing(lookup, &parser.name()));
            }
            tracing::debug!(key = %lookup.key, namespace = %lookup.namespace, "Found nothing, returning no value");
            return Ok(None);
        };

        match parser.parse(&raw) {
            Ok(value) => {
                let shown = if lookup.secret { REDACTED } else { raw.as_str() };
                tracing::debug!(
                    key = %lookup.key,
                    raw = %shown,
                    default = from_default,
                    parser = %parser.name(),
                    "Returning value"
                );
                Ok(Some(value))
            }
            Err(e) => {
                // Parser messages quote the raw input.
                let mut cause = if lookup.secret {
                    format!("{REDACTED} is not a valid {}", parser.name())
                } else {
                    e.message().to_string()
                };
                if from_default {
                    cause.push_str(" (default value)");
                }
                Err(ConfigError::InvalidValue(self.detail(
                    lookup,
                    &parser.name(),
                    &cause,
                )))
            }
        }
    }

    /// Like `resolve`, but a missing value is always an error.
    pub(crate) fn resolve_required<P: Parser>(
        &self,
        lookup: &Lookup,
        parser: &P,
    ) -> Result<P::Output, ConfigError> {
        let lookup = lookup.clone().with_raise_error(true);
        self.resolve(&lookup, parser)?
            .ok_or_else(|| self.missing(&lookup, &parser.name()))
    }

    /// Raw string value of a root-namespace key.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        self.resolve_required(&Lookup::new(key), &Str)
    }

    /// Raw string value of a root-namespace key, `None` when absent.
    pub fn get_optional(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.resolve(&Lookup::new(key).with_raise_error(false), &Str)
    }

    /// Parsed value of a root-namespace key.
    pub fn parse<P: Parser>(&self, key: &str, parser: &P) -> Result<P::Output, ConfigError> {
        self.resolve_required(&Lookup::new(key), parser)
    }

    /// Build a `ConfigError::Configuration` carrying the project docs.
    ///
    /// For checks that span several values (e.g. "both HOST and PORT must be set").
    pub fn raise_configuration_error(&self, msg: &str) -> ConfigError {
        let message = (self.inner.msg_builder)(&MsgContext {
            namespace: None,
            key: None,
            parser: None,
            msg,
            option_doc: "",
            config_doc: &self.inner.doc,
        });
        ConfigError::Configuration(message)
    }

    /// Unrestricted view at the root namespace.
    pub fn root(&self) -> BoundConfig {
        BoundConfig::new(self.clone(), Namespace::root())
    }

    /// Unrestricted view under `namespace`.
    pub fn with_namespace(&self, namespace: impl Into<Namespace>) -> BoundConfig {
        BoundConfig::new(self.clone(), namespace.into())
    }

    /// Root view restricted to the options `C` declares.
    pub fn with_options<C: Component>(&self) -> Result<BoundConfig, ConfigError> {
        self.root().with_options::<C>()
    }

    fn find_raw(&self, lookup: &Lookup) -> Result<Option<(String, bool)>, ConfigError> {
        for (namespace, key) in lookup.candidates() {
            tracing::debug!(key = %key, namespace = %namespace, "Looking up key");
            for source in &self.inner.sources {
                let value = source
                    .get(key, &namespace)
                    .map_err(|e| ConfigError::Source {
                        namespace: namespace.clone(),
                        key: key.to_string(),
                        full_key: namespace.full_key(key),
                        source: e,
                    })?;
                match value {
                    Some(v) if v.is_empty() && lookup.default_if_empty => {}
                    Some(v) => return Ok(Some((v, false))),
                    None => {}
                }
            }
        }

        if lookup.default.is_some() {
            tracing::debug!(key = %lookup.key, namespace = %lookup.namespace, "Using default value");
        }
        Ok(lookup.default.clone().map(|d| (d, true)))
    }

    fn missing(&self, lookup: &Lookup, parser: &str) -> ConfigError {
        ConfigError::Missing(self.detail(lookup, parser, ""))
    }

    fn detail(&self, lookup: &Lookup, parser: &str, cause: &str) -> DetailedError {
        let message = (self.inner.msg_builder)(&MsgContext {
            namespace: Some(&lookup.namespace),
            key: Some(&lookup.key),
            parser: Some(parser),
            msg: cause,
            option_doc: &lookup.doc,
            config_doc: &self.inner.doc,
        });
        DetailedError {
            message,
            namespace: lookup.namespace.clone(),
            key: lookup.key.clone(),
            parser: parser.to_string(),
        }
    }
}
