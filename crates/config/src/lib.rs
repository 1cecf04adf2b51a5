//! Layered configuration resolution.
//!
//! A [`ConfigManager`] searches an ordered list of [`Source`]s for a key,
//! parses the first value found with a [`Parser`], and reports missing or
//! invalid values with the key, its docs, and the project docs. Components
//! declare their options through [`Component`] and query a [`BoundConfig`]
//! that only accepts those keys.
//!
//! ```
//! use strata_config::ConfigManager;
//! use strata_config::parser::parse_as;
//!
//! let config = ConfigManager::from_dict([("DB_PORT", "5432")]);
//! let db = config.with_namespace("db");
//! assert_eq!(db.parse("port", &parse_as::<u16>()).unwrap(), 5432);
//! ```

mod bound;
mod component;
pub mod constants;
mod error;
mod manager;
mod message;
mod namespace;
pub mod parser;
pub mod source;

pub use bound::{BoundConfig, Query, RuntimeEntry, RuntimeValue};
pub use component::{Component, ConfigOption, ConfigOptions, ConfigOptionsBuilder, options_for};
pub use error::{ConfigError, DetailedError, SourceError};
pub use manager::{ConfigManager, ConfigManagerBuilder, Lookup};
pub use message::{MsgBuilder, MsgContext, build_msg};
pub use namespace::{Namespace, generate_uppercase_key};
pub use parser::{ParseError, Parser};
pub use source::{
    DictSource, EnvFileSource, EnvSource, ObjectSource, OverrideGuard, OverrideSource, Source,
    YamlFileSource, config_override, with_config_override,
};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
