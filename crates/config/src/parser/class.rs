//! Dotted-path resolution against an explicit registry.
//!
//! There is no runtime import in Rust, so the set of resolvable paths is
//! registered up front. Values are typically constructors or enum variants
//! (`"app.backends.Redis" -> Backend::Redis`).

use std::collections::BTreeMap;

use super::{ParseError, Parser};

/// Resolves `module.path.Name` strings to registered values.
#[derive(Debug, Clone)]
pub struct ClassRegistry<T> {
    name: String,
    entries: BTreeMap<String, T>,
}

impl<T: Clone> ClassRegistry<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Register `value` under the dotted `path`.
    pub fn register(mut self, path: impl Into<String>, value: T) -> Self {
        self.entries.insert(path.into(), value);
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn has_module(&self, module: &str) -> bool {
        self.entries.keys().any(|path| {
            path.rsplit_once('.')
                .is_some_and(|(registered, _)| registered == module)
        })
    }
}

impl<T: Clone + Send + Sync> Parser for ClassRegistry<T> {
    type Output = T;

    fn parse(&self, raw: &str) -> Result<T, ParseError> {
        let Some((module, member)) = raw.rsplit_once('.') else {
            return Err(ParseError::new(format!("{raw:?} is not a valid dotted-path")));
        };

        if let Some(value) = self.entries.get(raw) {
            return Ok(value.clone());
        }
        if !self.has_module(module) {
            return Err(ParseError::new(format!("no module named {module:?}")));
        }
        Err(ParseError::new(format!(
            "{member:?} is not a valid member of {module}"
        )))
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
