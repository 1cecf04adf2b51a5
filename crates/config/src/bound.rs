//! Scoped configuration views.
//!
//! Responsibilities:
//! - Fix a namespace for all lookups made through a view.
//! - Optionally restrict a view to the options one component declares, and
//!   fill in declared defaults, alternate keys, docs, and parsers.
//! - Validate a component's configuration and dump its runtime values.
//!
//! Does NOT handle:
//! - The lookup algorithm itself (delegated to `ConfigManager::resolve`).
//!
//! Invariants:
//! - Views are immutable; `with_namespace`/`with_options` return new views.
//! - A restricted view rejects an undeclared key before any source is queried,
//!   unless the call site supplies its own namespace, default, or parser.
//! - Call-site arguments take precedence over declared option metadata.

use std::any::Any;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::component::{Component, ConfigOption, ConfigOptions, options_for};
use crate::constants::{NO_VALUE_DISPLAY, REDACTED};
use crate::error::ConfigError;
use crate::manager::{ConfigManager, Lookup};
use crate::namespace::Namespace;
use crate::parser::{Parser, Str};

const UNRESTRICTED: &str = "an unrestricted view";

#[derive(Debug)]
struct BoundOptions {
    component: &'static str,
    options: ConfigOptions,
}

/// A namespace-scoped (and optionally option-restricted) view of a
/// [`ConfigManager`].
#[derive(Debug, Clone)]
pub struct BoundConfig {
    manager: ConfigManager,
    namespace: Namespace,
    options: Option<Arc<BoundOptions>>,
}

impl BoundConfig {
    pub(crate) fn new(manager: ConfigManager, namespace: Namespace) -> Self {
        Self {
            manager,
            namespace,
            options: None,
        }
    }

    pub fn manager(&self) -> &ConfigManager {
        &self.manager
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Name of the component this view is restricted to.
    pub fn bound_component(&self) -> Option<&'static str> {
        self.options.as_ref().map(|b| b.component)
    }

    /// Declared options, when restricted.
    pub fn options(&self) -> Option<&ConfigOptions> {
        self.options.as_ref().map(|b| &b.options)
    }

    /// New view with `namespace` appended; the option restriction is kept.
    pub fn with_namespace(&self, namespace: impl Into<Namespace>) -> BoundConfig {
        Self {
            manager: self.manager.clone(),
            namespace: self.namespace.with_namespace(namespace),
            options: self.options.clone(),
        }
    }

    /// New view restricted to the merged options of `C`.
    ///
    /// A component with no options yields a view that rejects every key.
    pub fn with_options<C: Component>(&self) -> Result<BoundConfig, ConfigError> {
        let options = options_for::<C>()?;
        tracing::debug!(
            component = C::component_name(),
            options = options.len(),
            namespace = %self.namespace,
            "Bound component options"
        );
        Ok(Self {
            manager: self.manager.clone(),
            namespace: self.namespace.clone(),
            options: Some(Arc::new(BoundOptions {
                component: C::component_name(),
                options,
            })),
        })
    }

    /// Like `with_options`, but a component without options is an error.
    pub fn with_options_strict<C: Component>(&self) -> Result<BoundConfig, ConfigError> {
        let bound = self.with_options::<C>()?;
        if bound.options().is_some_and(ConfigOptions::is_empty) {
            return Err(ConfigError::Definition(format!(
                "{} does not declare any configuration options",
                C::component_name()
            )));
        }
        Ok(bound)
    }

    /// Start a lookup for `key` with call-site overrides.
    pub fn query(&self, key: impl Into<String>) -> Query<'_> {
        Query {
            view: self,
            key: key.into(),
            namespace: None,
            default: None,
            alternate_keys: None,
            doc: None,
            default_if_empty: true,
        }
    }

    /// Raw string value; missing is an error unless a default is declared.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        self.query(key).text()
    }

    pub fn get_optional(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.query(key).raw()
    }

    /// Value parsed with an explicit parser.
    pub fn parse<P: Parser>(&self, key: &str, parser: &P) -> Result<P::Output, ConfigError> {
        self.query(key).parse(parser)
    }

    /// Value parsed with the declared option's parser.
    pub fn option<T: Any>(&self, key: &str) -> Result<T, ConfigError> {
        self.query(key).value::<T>()
    }

    /// Resolve every declared option.
    ///
    /// # Errors
    ///
    /// The first required option that is missing, or the first value
    /// (including defaults) that fails to parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(bound) = self.options.as_deref() else {
            return Ok(());
        };
        for option in &bound.options {
            let lookup = self
                .declared_lookup(option, &self.namespace)
                .with_raise_error(option.is_required());
            self.manager.resolve(&lookup, option.parser())?;
        }
        tracing::debug!(component = bound.component, "Validated component configuration");
        Ok(())
    }

    /// Raw values of every declared option, defaults included.
    pub fn runtime_config(&self) -> Result<Vec<RuntimeEntry>, ConfigError> {
        let Some(bound) = self.options.as_deref() else {
            return Ok(Vec::new());
        };
        bound
            .options
            .iter()
            .map(|option| -> Result<RuntimeEntry, ConfigError> {
                let lookup = self
                    .declared_lookup(option, &self.namespace)
                    .with_raise_error(false);
                let value = self.manager.resolve(&lookup, &Str)?.map(|raw| {
                    if option.is_secret() {
                        RuntimeValue::Secret(SecretString::new(raw.into()))
                    } else {
                        RuntimeValue::Plain(raw)
                    }
                });
                Ok(RuntimeEntry {
                    namespace: self.namespace.clone(),
                    key: option.key().to_string(),
                    value,
                    option: option.clone(),
                })
            })
            .collect()
    }

    fn declared_lookup(&self, option: &ConfigOption, namespace: &Namespace) -> Lookup {
        let mut lookup = Lookup::new(option.key())
            .with_namespace(namespace)
            .with_alternate_keys(option.alternate_keys().iter().cloned())
            .with_doc(option.doc())
            .with_secret(option.is_secret());
        lookup.default = option.default_value().map(str::to_string);
        lookup
    }

    fn component_label(&self) -> String {
        self.bound_component().unwrap_or(UNRESTRICTED).to_string()
    }
}

/// One row of [`BoundConfig::runtime_config`].
#[derive(Debug, Clone)]
pub struct RuntimeEntry {
    pub namespace: Namespace,
    pub key: String,
    /// `None` when no source has the key and there is no default.
    pub value: Option<RuntimeValue>,
    pub option: ConfigOption,
}

impl RuntimeEntry {
    /// Value as it may be shown to users: secrets redacted, absence as `NO_VALUE`.
    pub fn display_value(&self) -> &str {
        match &self.value {
            None => NO_VALUE_DISPLAY,
            Some(RuntimeValue::Secret(_)) => REDACTED,
            Some(RuntimeValue::Plain(raw)) => raw,
        }
    }
}

/// Raw runtime value; secrets stay wrapped.
#[derive(Debug, Clone)]
pub enum RuntimeValue {
    Plain(String),
    Secret(SecretString),
}

impl RuntimeValue {
    pub fn expose(&self) -> &str {
        match self {
            RuntimeValue::Plain(raw) => raw,
            RuntimeValue::Secret(secret) => secret.expose_secret(),
        }
    }
}

/// A pending lookup on a [`BoundConfig`].
#[must_use = "a query does nothing until a terminal method is called"]
#[derive(Debug, Clone)]
pub struct Query<'a> {
    view: &'a BoundConfig,
    key: String,
    namespace: Option<Namespace>,
    default: Option<String>,
    alternate_keys: Option<Vec<String>>,
    doc: Option<String>,
    default_if_empty: bool,
}

impl<'a> Query<'a> {
    /// Namespace appended to the view's namespace for this lookup only.
    pub fn namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn alternate_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternate_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Return empty strings from sources instead of falling through.
    pub fn keep_empty(mut self) -> Self {
        self.default_if_empty = false;
        self
    }

    pub fn parse<P: Parser>(self, parser: &P) -> Result<P::Output, ConfigError> {
        let (lookup, _) = self.prepare(true)?;
        self.view.manager.resolve_required(&lookup, parser)
    }

    pub fn parse_optional<P: Parser>(self, parser: &P) -> Result<Option<P::Output>, ConfigError> {
        let (lookup, _) = self.prepare(true)?;
        self.view
            .manager
            .resolve(&lookup.with_raise_error(false), parser)
    }

    /// Parse with the declared option's parser and downcast to `T`.
    pub fn value<T: Any>(self) -> Result<T, ConfigError> {
        let (lookup, option) = self.declared::<T>()?;
        let boxed = self
            .view
            .manager
            .resolve_required(&lookup, option.parser())?;
        self.downcast(boxed, option)
    }

    pub fn value_optional<T: Any>(self) -> Result<Option<T>, ConfigError> {
        let (lookup, option) = self.declared::<T>()?;
        self.view
            .manager
            .resolve(&lookup.with_raise_error(false), option.parser())?
            .map(|boxed| self.downcast(boxed, option))
            .transpose()
    }

    /// Unparsed value, `None` when absent.
    pub fn raw(self) -> Result<Option<String>, ConfigError> {
        let (lookup, _) = self.prepare(false)?;
        self.view
            .manager
            .resolve(&lookup.with_raise_error(false), &Str)
    }

    fn text(self) -> Result<String, ConfigError> {
        let (lookup, _) = self.prepare(false)?;
        self.view.manager.resolve_required(&lookup, &Str)
    }

    fn declared<T: Any>(&self) -> Result<(Lookup, &'a ConfigOption), ConfigError> {
        let (lookup, option) = self.prepare(false)?;
        let Some(option) = option else {
            return Err(ConfigError::InvalidKey {
                key: self.key.clone(),
                component: self.view.component_label(),
            });
        };
        if !option.parser().produces::<T>() {
            return Err(self.type_mismatch::<T>(option));
        }
        Ok((lookup, option))
    }

    fn downcast<T: Any>(
        &self,
        boxed: Box<dyn Any + Send + Sync>,
        option: &ConfigOption,
    ) -> Result<T, ConfigError> {
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| self.type_mismatch::<T>(option))
    }

    fn type_mismatch<T: Any>(&self, option: &ConfigOption) -> ConfigError {
        ConfigError::TypeMismatch {
            key: self.key.clone(),
            expected: std::any::type_name::<T>(),
            parser: Parser::name(option.parser()),
        }
    }

    /// Build the lookup, applying declared metadata then call-site overrides.
    fn prepare(&self, explicit_parser: bool) -> Result<(Lookup, Option<&'a ConfigOption>), ConfigError> {
        let view: &'a BoundConfig = self.view;
        let declared = match view.options.as_deref() {
            None => None,
            Some(bound) => match bound.options.get(&self.key) {
                Some(option) => Some(option),
                None if explicit_parser || self.namespace.is_some() || self.default.is_some() => {
                    None
                }
                None => {
                    tracing::warn!(
                        key = %self.key,
                        component = bound.component,
                        namespace = %view.namespace,
                        "Rejected undeclared configuration key"
                    );
                    return Err(ConfigError::InvalidKey {
                        key: self.key.clone(),
                        component: bound.component.to_string(),
                    });
                }
            },
        };

        let namespace = match &self.namespace {
            Some(extra) => view.namespace.with_namespace(extra),
            None => view.namespace.clone(),
        };

        let mut lookup = match declared {
            Some(option) => view.declared_lookup(option, &namespace),
            None => Lookup::new(self.key.as_str()).with_namespace(namespace),
        };
        if let Some(default) = &self.default {
            lookup.default = Some(default.clone());
        }
        if let Some(alternate_keys) = &self.alternate_keys {
            lookup.alternate_keys = alternate_keys.clone();
        }
        if let Some(doc) = &self.doc {
            lookup.doc = doc.clone();
        }
        lookup.default_if_empty = self.default_if_empty;

        Ok((lookup, declared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::parser::{Bool, ListOf, parse_as};
    use crate::source::{DictSource, Source};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Server;

    impl Component for Server {
        fn own_options() -> Result<ConfigOptions, ConfigError> {
            ConfigOptions::builder()
                .option(
                    ConfigOption::new("port")
                        .with_default("8000")
                        .with_parser(parse_as::<u16>())
                        .with_doc("Port to listen on."),
                )
                .option(ConfigOption::new("debug").with_default("false").with_parser(Bool))
                .option(
                    ConfigOption::new("hosts")
                        .with_parser(ListOf::new(Str))
                        .with_alternate_keys(["root:allowed_hosts"])
                        .not_required(),
                )
                .option(ConfigOption::new("password").secret())
                .build()
        }
    }

    struct Empty;

    impl Component for Empty {
        fn own_options() -> Result<ConfigOptions, ConfigError> {
            Ok(ConfigOptions::new())
        }
    }

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl Source for CountingSource {
        fn get(&self, _key: &str, _namespace: &Namespace) -> Result<Option<String>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    fn manager(pairs: &[(&str, &str)]) -> ConfigManager {
        ConfigManager::builder()
            .source(DictSource::new(pairs.iter().copied()))
            .with_override(false)
            .build()
    }

    #[test]
    fn test_declared_parser_and_default() {
        let config = manager(&[("SERVER_DEBUG", "yes")])
            .with_namespace("server")
            .with_options::<Server>()
            .unwrap();

        assert_eq!(config.option::<u16>("port").unwrap(), 8000);
        assert!(config.option::<bool>("debug").unwrap());
        assert_eq!(config.bound_component(), Some(Server::component_name()));
    }

    #[test]
    fn test_root_alternate_from_declaration() {
        let config = manager(&[("ALLOWED_HOSTS", "a.example, b.example")])
            .with_namespace("server")
            .with_options::<Server>()
            .unwrap();

        assert_eq!(
            config.option::<Vec<String>>("hosts").unwrap(),
            vec!["a.example".to_string(), "b.example".to_string()]
        );
    }

    #[test]
    fn test_undeclared_key_never_reaches_sources() {
        let counting = Arc::new(CountingSource::default());
        let config = ConfigManager::builder()
            .sources([counting.clone() as Arc<dyn Source>])
            .with_override(false)
            .build()
            .with_options::<Server>()
            .unwrap();

        let err = config.get("nope").unwrap_err();
        assert!(err.is_invalid_key());
        assert!(config.option::<String>("nope").unwrap_err().is_invalid_key());
        assert!(config.query("nope").raw().unwrap_err().is_invalid_key());
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_explicit_arguments_bypass_restriction() {
        let config = manager(&[("EXTRA", "1"), ("SUB_EXTRA", "2")])
            .with_options::<Server>()
            .unwrap();

        assert_eq!(config.parse("extra", &parse_as::<u8>()).unwrap(), 1);
        assert_eq!(config.query("extra").namespace("sub").raw().unwrap().as_deref(), Some("2"));
        assert_eq!(config.query("missing").default("x").raw().unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_call_site_overrides_take_precedence() {
        let config = manager(&[]).with_options::<Server>().unwrap();
        let port = config.query("port").default("9000").value::<u16>().unwrap();
        assert_eq!(port, 9000);
    }

    #[test]
    fn test_type_mismatch() {
        let config = manager(&[]).with_options::<Server>().unwrap();
        let err = config.option::<String>("port").unwrap_err();
        match err {
            ConfigError::TypeMismatch { key, parser, .. } => {
                assert_eq!(key, "port");
                assert_eq!(parser, "u16");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_value_on_unrestricted_view_is_invalid_key() {
        let err = manager(&[("PORT", "1")]).root().option::<u16>("port").unwrap_err();
        assert!(err.is_invalid_key());
        assert!(err.to_string().contains(UNRESTRICTED));
    }

    #[test]
    fn test_with_namespace_keeps_restriction() {
        let config = manager(&[("A_B_PORT", "81")])
            .with_options::<Server>()
            .unwrap()
            .with_namespace("a")
            .with_namespace("b");

        assert_eq!(config.namespace(), &Namespace::from(["a", "b"]));
        assert_eq!(config.option::<u16>("port").unwrap(), 81);
        assert!(config.get("other").unwrap_err().is_invalid_key());
    }

    #[test]
    fn test_empty_component() {
        let root = manager(&[("ANY", "1")]).root();
        let lenient = root.with_options::<Empty>().unwrap();
        assert!(lenient.get("any").unwrap_err().is_invalid_key());

        let err = root.with_options_strict::<Empty>().unwrap_err();
        assert!(matches!(err, ConfigError::Definition(_)));
    }

    #[test]
    fn test_validate_reports_missing_required() {
        let config = manager(&[]).with_options::<Server>().unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.is_missing());
        assert_eq!(err.detail().map(|d| d.key.as_str()), Some("password"));

        let config = manager(&[("PASSWORD", "hunter2")]).with_options::<Server>().unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_reports_invalid_value() {
        let config = manager(&[("PASSWORD", "x"), ("PORT", "not-a-port")])
            .with_options::<Server>()
            .unwrap();
        assert!(config.validate().unwrap_err().is_invalid_value());
    }

    #[test]
    fn test_runtime_config_redacts_secrets() {
        let config = manager(&[("PASSWORD", "hunter2")])
            .with_options::<Server>()
            .unwrap();
        let entries = config.runtime_config().unwrap();

        let shown: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.key.as_str(), e.display_value()))
            .collect();
        assert_eq!(
            shown,
            [
                ("port", "8000"),
                ("debug", "false"),
                ("hosts", NO_VALUE_DISPLAY),
                ("password", REDACTED),
            ]
        );

        let password = entries.iter().find(|e| e.key == "password").unwrap();
        assert_eq!(password.value.as_ref().map(RuntimeValue::expose), Some("hunter2"));
        assert!(!format!("{password:?}").contains("hunter2"));
    }
}
