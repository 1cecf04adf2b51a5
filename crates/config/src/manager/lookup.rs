//! Resolution requests.
//!
//! Responsibilities:
//! - Describe one lookup: key, namespace, default, alternate keys, docs and flags.
//! - Expand the lookup into its ordered candidate list.
//!
//! Invariants:
//! - The primary key is always the first candidate.
//! - `root:`-prefixed alternates resolve against the root namespace; all other
//!   alternates use the lookup namespace.

use crate::constants::ROOT_PREFIX;
use crate::namespace::Namespace;

/// Everything the resolver needs to know about one key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub key: String,
    pub namespace: Namespace,
    /// Raw default, parsed like any source value.
    pub default: Option<String>,
    pub alternate_keys: Vec<String>,
    pub doc: String,
    /// When false, a missing value resolves to `Ok(None)` instead of an error.
    pub raise_error: bool,
    /// When true, an empty string from a source counts as "not found".
    pub default_if_empty: bool,
    /// Redact the value in log output.
    pub secret: bool,
}

impl Lookup {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            namespace: Namespace::root(),
            default: None,
            alternate_keys: Vec::new(),
            doc: String::new(),
            raise_error: true,
            default_if_empty: true,
            secret: false,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_alternate_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_raise_error(mut self, raise_error: bool) -> Self {
        self.raise_error = raise_error;
        self
    }

    pub fn with_default_if_empty(mut self, default_if_empty: bool) -> Self {
        self.default_if_empty = default_if_empty;
        self
    }

    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Ordered `(namespace, key)` pairs to try.
    pub fn candidates(&self) -> Vec<(Namespace, &str)> {
        let mut candidates = Vec::with_capacity(1 + self.alternate_keys.len());
        candidates.push((self.namespace.clone(), self.key.as_str()));
        for alternate in &self.alternate_keys {
            match alternate.strip_prefix(ROOT_PREFIX) {
                Some(root_key) => candidates.push((Namespace::root(), root_key)),
                None => candidates.push((self.namespace.clone(), alternate.as_str())),
            }
        }
        candidates
    }
}
