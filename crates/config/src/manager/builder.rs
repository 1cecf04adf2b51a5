//! Builder for `ConfigManager`.
//!
//! Invariants:
//! - Sources keep the order they were added in; the first source wins.
//! - With override support on (the default), exactly one `OverrideSource`
//!   sits in front of all other sources.

use std::sync::Arc;

use super::{ConfigManager, Inner};
use crate::message::{MsgBuilder, MsgContext, default_msg_builder};
use crate::source::{OverrideSource, Source};

/// Builder-pattern constructor for [`ConfigManager`].
pub struct ConfigManagerBuilder {
    sources: Vec<Arc<dyn Source>>,
    doc: String,
    msg_builder: MsgBuilder,
    with_override: bool,
}

impl Default for ConfigManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            doc: String::new(),
            msg_builder: default_msg_builder(),
            with_override: true,
        }
    }

    /// Append a source.
    pub fn source(mut self, source: impl Source + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Append already-shared sources.
    pub fn sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Source>>,
    {
        self.sources.extend(sources);
        self
    }

    /// Project documentation appended to every error message.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Replace the default message layout.
    pub fn msg_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn(&MsgContext<'_>) -> String + Send + Sync + 'static,
    {
        self.msg_builder = Arc::new(builder);
        self
    }

    /// Whether `config_override` layers are visible to this resolver.
    pub fn with_override(mut self, enabled: bool) -> Self {
        self.with_override = enabled;
        self
    }

    pub fn build(self) -> ConfigManager {
        let mut sources = self.sources;
        if self.with_override && !sources.iter().any(|s| s.is_override()) {
            sources.insert(0, Arc::new(OverrideSource::new()));
        }
        tracing::debug!(sources = sources.len(), "Built config manager");

        ConfigManager {
            inner: Arc::new(Inner {
                sources,
                doc: self.doc,
                msg_builder: self.msg_builder,
            }),
        }
    }
}
