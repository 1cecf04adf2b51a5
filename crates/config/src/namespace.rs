//! Namespaces and key generation.
//!
//! Responsibilities:
//! - Represent an ordered path prefix for configuration keys.
//! - Compose namespaces functionally (`with_namespace` never mutates).
//! - Generate the uppercase, `_`-joined key used by environment-style sources.
//!
//! Invariants:
//! - An empty namespace is the root namespace.
//! - Empty segments are kept in the value but skipped when generating keys.
//! - Composition is associative: `(ns + a) + b == ns + (a + b)`.

use std::fmt;

use crate::constants::KEY_SEPARATOR;

/// Ordered sequence of path segments prefixing a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Namespace {
    segments: Vec<String>,
}

impl Namespace {
    /// The root namespace.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.iter().all(|s| s.is_empty())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Return a new namespace with `extra` appended.
    pub fn with_namespace(&self, extra: impl Into<Namespace>) -> Namespace {
        let extra = extra.into();
        let mut segments = self.segments.clone();
        segments.extend(extra.segments);
        Namespace { segments }
    }

    /// Join this namespace and `key` in the environment-style convention.
    pub fn full_key(&self, key: &str) -> String {
        generate_uppercase_key(key, self)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.segments.join(", "))
    }
}

impl From<&str> for Namespace {
    fn from(segment: &str) -> Self {
        segment.to_string().into()
    }
}

impl From<String> for Namespace {
    fn from(segment: String) -> Self {
        if segment.is_empty() {
            return Namespace::root();
        }
        Namespace {
            segments: vec![segment],
        }
    }
}

impl From<&String> for Namespace {
    fn from(segment: &String) -> Self {
        segment.clone().into()
    }
}

impl From<Vec<String>> for Namespace {
    fn from(segments: Vec<String>) -> Self {
        Namespace { segments }
    }
}

impl From<&[&str]> for Namespace {
    fn from(segments: &[&str]) -> Self {
        Namespace {
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for Namespace {
    fn from(segments: [&str; N]) -> Self {
        Namespace::from(&segments[..])
    }
}

impl From<&Namespace> for Namespace {
    fn from(namespace: &Namespace) -> Self {
        namespace.clone()
    }
}

/// Given a key and a namespace, generate the final uppercase key.
///
/// `("foo", [])` becomes `FOO`, `("foo", ["ns", "sub"])` becomes
/// `NS_SUB_FOO`. Empty segments are skipped.
pub fn generate_uppercase_key(key: &str, namespace: &Namespace) -> String {
    let mut parts: Vec<&str> = namespace
        .segments
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    parts.push(key);
    parts.join(KEY_SEPARATOR).to_uppercase()
}
