//! Configuration sources.
//!
//! Responsibilities:
//! - Define the `Source` trait consumed by the resolver.
//! - Provide the built-in sources: dict, process environment, `.env` file,
//!   serializable object, YAML file, and the testing override layer.
//!
//! Does NOT handle:
//! - Source ordering or precedence (see `manager`).
//! - Parsing values into types (see `parser`).
//!
//! Invariants:
//! - `Ok(None)` means the key does not exist in the source; it is never an error.
//! - `Err(SourceError)` is reserved for a source that cannot answer.
//! - File-backed sources load once at construction; nothing is watched or reloaded.

mod dict;
mod env;
mod env_file;
mod object;
mod overrides;
mod yaml;

use std::fmt::Debug;
use std::path::PathBuf;

use crate::error::SourceError;
use crate::namespace::Namespace;

pub use dict::DictSource;
pub use env::EnvSource;
pub use env_file::{EnvFileSource, parse_env_file};
pub use object::ObjectSource;
pub use overrides::{OverrideGuard, OverrideSource, config_override, with_config_override};
pub use yaml::YamlFileSource;

/// A queryable origin of raw string configuration values.
///
/// Implementations must be safe for concurrent reads; the resolver adds no
/// locking of its own.
pub trait Source: Send + Sync + Debug {
    /// Look up `key` under `namespace`.
    fn get(&self, key: &str, namespace: &Namespace) -> Result<Option<String>, SourceError>;

    /// Whether this is the testing override layer.
    fn is_override(&self) -> bool {
        false
    }
}

/// Expand a leading `~` and return the first candidate that is an existing file.
pub(crate) fn first_existing_file<I, P>(possible_paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    possible_paths.into_iter().find_map(|candidate| {
        let candidate = candidate.as_ref().trim();
        if candidate.is_empty() {
            return None;
        }
        let path = expand_home(candidate);
        path.is_file().then_some(path)
    })
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(path)
}
