//! Component option declarations.
//!
//! Responsibilities:
//! - Describe one configuration option (`ConfigOption`).
//! - Validate and collect options into an ordered `ConfigOptions` set.
//! - Attach option sets to types through the `Component` trait and merge a
//!   component's options with those of its base component.
//!
//! Does NOT handle:
//! - Resolving values (see `manager`); options are inert metadata.
//!
//! Invariants:
//! - Keys are unique within one `ConfigOptions`.
//! - Merging replaces by key: a derived option keeps the base option's position
//!   and fully replaces its metadata.
//! - An option is required iff it has no default and was not marked
//!   `not_required()`.

use std::collections::BTreeMap;

use crate::constants::ROOT_PREFIX;
use crate::error::ConfigError;
use crate::parser::{DynParser, Parser};

/// One declared configuration option.
#[derive(Debug, Clone)]
pub struct ConfigOption {
    key: String,
    default: Option<String>,
    alternate_keys: Vec<String>,
    doc: String,
    parser: DynParser,
    not_required: bool,
    secret: bool,
    meta: BTreeMap<String, String>,
}

impl ConfigOption {
    /// Option with the identity parser, no default and no docs.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default: None,
            alternate_keys: Vec::new(),
            doc: String::new(),
            parser: DynParser::default(),
            not_required: false,
            secret: false,
            meta: BTreeMap::new(),
        }
    }

    /// Raw default; it must be parseable by the option's parser.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_parser<P>(mut self, parser: P) -> Self
    where
        P: Parser + 'static,
        P::Output: Send + Sync + 'static,
    {
        self.parser = DynParser::new(parser);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Fallback keys, tried in order; `root:key` ignores the namespace.
    pub fn with_alternate_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_meta(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(name.into(), value.into());
        self
    }

    /// Allow the option to be absent even without a default.
    pub fn not_required(mut self) -> Self {
        self.not_required = true;
        self
    }

    /// Redact the value in logs and runtime dumps.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn alternate_keys(&self) -> &[String] {
        &self.alternate_keys
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn parser(&self) -> &DynParser {
        &self.parser
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.not_required
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.key.is_empty() {
            return Err(ConfigError::Definition(
                "option key must not be empty".to_string(),
            ));
        }
        for alternate in &self.alternate_keys {
            let bare = alternate.strip_prefix(ROOT_PREFIX).unwrap_or(alternate);
            if bare.is_empty() {
                return Err(ConfigError::Definition(format!(
                    "option '{}' has an empty alternate key {alternate:?}",
                    self.key
                )));
            }
        }
        Ok(())
    }
}

/// Ordered set of options with unique keys.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    options: Vec<ConfigOption>,
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ConfigOptionsBuilder {
        ConfigOptionsBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigOption> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Overlay `derived` onto this set, replacing options by key.
    pub fn merge(&mut self, derived: ConfigOptions) {
        for option in derived.options {
            match self.options.iter_mut().find(|o| o.key == option.key) {
                Some(existing) => *existing = option,
                None => self.options.push(option),
            }
        }
    }
}

impl<'a> IntoIterator for &'a ConfigOptions {
    type Item = &'a ConfigOption;
    type IntoIter = std::slice::Iter<'a, ConfigOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

/// Collects options and validates them on `build()`.
#[derive(Debug, Default)]
pub struct ConfigOptionsBuilder {
    options: Vec<ConfigOption>,
}

impl ConfigOptionsBuilder {
    pub fn option(mut self, option: ConfigOption) -> Self {
        self.options.push(option);
        self
    }

    /// # Errors
    ///
    /// `ConfigError::Definition` for empty keys, empty alternate keys, or a
    /// key declared twice.
    pub fn build(self) -> Result<ConfigOptions, ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for option in &self.options {
            option.check()?;
            if !seen.insert(option.key.as_str()) {
                return Err(ConfigError::Definition(format!(
                    "option '{}' is declared more than once",
                    option.key
                )));
            }
        }
        Ok(ConfigOptions {
            options: self.options,
        })
    }
}

/// A type that declares the configuration it needs.
///
/// ```
/// use strata_config::{Component, ConfigError, ConfigOption, ConfigOptions};
/// use strata_config::parser::parse_as;
///
/// struct Database;
///
/// impl Component for Database {
///     fn own_options() -> Result<ConfigOptions, ConfigError> {
///         ConfigOptions::builder()
///             .option(ConfigOption::new("host").with_default("localhost"))
///             .option(ConfigOption::new("port").with_default("5432").with_parser(parse_as::<u16>()))
///             .build()
///     }
/// }
///
/// struct ReplicaDatabase;
///
/// impl Component for ReplicaDatabase {
///     fn base_options() -> Result<ConfigOptions, ConfigError> {
///         strata_config::options_for::<Database>()
///     }
///
///     fn own_options() -> Result<ConfigOptions, ConfigError> {
///         ConfigOptions::builder()
///             .option(ConfigOption::new("host").with_default("replica"))
///             .build()
///     }
/// }
///
/// let options = strata_config::options_for::<ReplicaDatabase>().unwrap();
/// assert_eq!(options.get("host").unwrap().default_value(), Some("replica"));
/// assert!(options.contains("port"));
/// ```
pub trait Component {
    /// Options declared directly on this type.
    fn own_options() -> Result<ConfigOptions, ConfigError>;

    /// Options inherited from a base component, usually `options_for::<Base>()`.
    fn base_options() -> Result<ConfigOptions, ConfigError> {
        Ok(ConfigOptions::new())
    }

    /// Name used in `InvalidKey` errors.
    fn component_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Merged options of `C`: base options first, overridden by key.
pub fn options_for<C: Component + ?Sized>() -> Result<ConfigOptions, ConfigError> {
    let mut merged = C::base_options()?;
    merged.merge(C::own_options()?);
    Ok(merged)
}
