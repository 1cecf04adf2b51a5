//! Testing override layer.
//!
//! Responsibilities:
//! - Keep a process-wide stack of override layers.
//! - Push a layer for the lifetime of an `OverrideGuard`.
//! - Expose the stack to resolvers through `OverrideSource`.
//!
//! Does NOT handle:
//! - Per-thread isolation. The stack is process global, so tests that push
//!   overrides must run serially (`#[serial]`).
//!
//! Invariants:
//! - The most recently pushed layer wins.
//! - Dropping a guard removes exactly its own layer, even when guards are
//!   dropped out of order or during a panic.
//! - Override keys are stored uppercased (`debug` and `DEBUG` are the same key).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use super::Source;
use crate::error::SourceError;
use crate::namespace::Namespace;

struct Layer {
    id: u64,
    values: HashMap<String, String>,
}

static LAYERS: OnceLock<Mutex<Vec<Layer>>> = OnceLock::new();
static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

fn layers() -> MutexGuard<'static, Vec<Layer>> {
    LAYERS
        .get_or_init(|| Mutex::new(Vec::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Source that reads the override stack, newest layer first.
///
/// `ConfigManager` places one of these in front of its sources unless
/// override support is turned off on the builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideSource;

impl OverrideSource {
    pub fn new() -> Self {
        Self
    }
}

impl Source for OverrideSource {
    fn get(&self, key: &str, namespace: &Namespace) -> Result<Option<String>, SourceError> {
        let full_key = namespace.full_key(key);
        let stack = layers();
        if stack.is_empty() {
            return Ok(None);
        }
        tracing::debug!(source = "override", full_key = %full_key, layers = stack.len(), "Searching source");
        Ok(stack
            .iter()
            .rev()
            .find_map(|layer| layer.values.get(&full_key).cloned()))
    }

    fn is_override(&self) -> bool {
        true
    }
}

/// RAII handle for one override layer. Drop it to remove the layer.
#[must_use = "the override is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct OverrideGuard {
    id: u64,
}

impl Drop for OverrideGuard {
    fn drop(&mut self) {
        let mut stack = layers();
        stack.retain(|layer| layer.id != self.id);
        tracing::debug!(layer = self.id, remaining = stack.len(), "Removed config override");
    }
}

/// Push an override layer. Values are visible to every `ConfigManager` with
/// override support until the returned guard is dropped.
///
/// Process global: not isolated between threads.
pub fn config_override<I, K, V>(values: I) -> OverrideGuard
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let id = NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed);
    let values: HashMap<String, String> = values
        .into_iter()
        .map(|(k, v)| (k.into().to_uppercase(), v.into()))
        .collect();

    let mut stack = layers();
    tracing::debug!(layer = id, keys = values.len(), "Pushed config override");
    stack.push(Layer { id, values });
    OverrideGuard { id }
}

/// Run `f` with an override layer in place.
///
/// ```
/// use strata_config::{ConfigManager, with_config_override};
///
/// let config = ConfigManager::from_dict([("DEBUG", "false")]);
/// with_config_override([("DEBUG", "true")], || {
///     assert_eq!(config.get("debug").unwrap(), "true");
/// });
/// assert_eq!(config.get("debug").unwrap(), "false");
/// ```
pub fn with_config_override<I, K, V, F, R>(values: I, f: F) -> R
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    F: FnOnce() -> R,
{
    let _guard = config_override(values);
    f()
}
