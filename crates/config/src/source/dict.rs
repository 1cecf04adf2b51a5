//! In-memory dictionary source.

use std::collections::HashMap;

use super::Source;
use crate::error::SourceError;
use crate::namespace::Namespace;

/// Source backed by a map; keys are case-insensitive.
///
/// Namespace `["bar"]` and key `foo` look up `BAR_FOO`.
#[derive(Debug, Clone, Default)]
pub struct DictSource {
    values: HashMap<String, String>,
}

impl DictSource {
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into().to_uppercase(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Source for DictSource {
    fn get(&self, key: &str, namespace: &Namespace) -> Result<Option<String>, SourceError> {
        let full_key = namespace.full_key(key);
        tracing::debug!(source = "dict", full_key = %full_key, "Searching source");
        Ok(self.values.get(&full_key).cloned())
    }
}
