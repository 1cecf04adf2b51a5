//! Centralized constants for the strata configuration crate.
//!
//! This module contains the literal markers and defaults shared by the
//! resolver, the sources, and the parsers.

// =============================================================================
// Key conventions
// =============================================================================

/// Separator used when joining namespace segments and a key.
pub const KEY_SEPARATOR: &str = "_";

/// Alternate-key prefix that anchors a lookup at the root namespace.
pub const ROOT_PREFIX: &str = "root:";

// =============================================================================
// Defaults
// =============================================================================

/// Default env file consulted by `ConfigManager::basic_config`.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default delimiter for `ListOf`.
pub const DEFAULT_LIST_DELIMITER: &str = ",";

// =============================================================================
// Display markers
// =============================================================================

/// How an absent value is rendered in runtime dumps.
pub const NO_VALUE_DISPLAY: &str = "NO_VALUE";

/// Placeholder written to logs and dumps in place of secret values.
pub const REDACTED: &str = "***";
