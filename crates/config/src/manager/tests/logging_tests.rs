//! Resolver log output tests.
//!
//! Responsibilities:
//! - Test that lookups log candidates and returned values.
//! - Test that secret lookups never log their raw value.

use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use crate::bound::BoundConfig;
use crate::component::{Component, ConfigOption, ConfigOptions};
use crate::constants::REDACTED;
use crate::error::ConfigError;
use crate::manager::{ConfigManager, Lookup};
use crate::parser::Str;

/// Records each event as a `name=value` line. Spans are ignored.
#[derive(Clone, Default)]
struct EventRecorder {
    events: Arc<Mutex<Vec<String>>>,
}

struct LineVisitor<'a>(&'a mut String);

impl tracing::field::Visit for LineVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

impl tracing::Subscriber for EventRecorder {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        let mut line = String::new();
        event.record(&mut LineVisitor(&mut line));
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line);
    }

    fn enter(&self, _span: &tracing::span::Id) {}

    fn exit(&self, _span: &tracing::span::Id) {}
}

fn capture_events<F: FnOnce()>(f: F) -> Vec<String> {
    let _guard = crate::test_util::global_test_lock()
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let recorder = EventRecorder::default();
    tracing::dispatcher::with_default(&tracing::Dispatch::new(recorder.clone()), f);
    let events = recorder
        .events
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    events.clone()
}

fn manager() -> ConfigManager {
    ConfigManager::builder()
        .source(crate::source::DictSource::new([
            ("API_TOKEN", "s3cr3t-token-value"),
            ("API_URL", "https://api.example"),
        ]))
        .with_override(false)
        .build()
}

struct Api;

impl Component for Api {
    fn own_options() -> Result<ConfigOptions, ConfigError> {
        ConfigOptions::builder()
            .option(ConfigOption::new("token").secret())
            .option(ConfigOption::new("url"))
            .build()
    }
}

fn api_view() -> BoundConfig {
    manager().with_namespace("api").with_options::<Api>().unwrap()
}

#[test]
fn test_plain_values_are_logged() {
    let events = capture_events(|| {
        let lookup = Lookup::new("url").with_namespace("api");
        manager().resolve(&lookup, &Str).unwrap();
    });

    assert!(
        events.iter().any(|e| e.contains("Looking up key") && e.contains("key=url")),
        "missing candidate log: {events:?}"
    );
    assert!(
        events
            .iter()
            .any(|e| e.contains("Returning value") && e.contains("https://api.example")),
        "missing value log: {events:?}"
    );
}

#[test]
fn test_secret_lookup_is_redacted() {
    let events = capture_events(|| {
        let lookup = Lookup::new("token").with_namespace("api").with_secret(true);
        let token = manager().resolve(&lookup, &Str).unwrap();
        assert_eq!(token.as_deref(), Some("s3cr3t-token-value"));
    });

    assert!(
        events.iter().all(|e| !e.contains("s3cr3t-token-value")),
        "secret leaked into logs: {events:?}"
    );
    assert!(
        events
            .iter()
            .any(|e| e.contains("Returning value") && e.contains(&format!("raw={REDACTED}"))),
        "expected redacted value log: {events:?}"
    );
}

#[test]
fn test_secret_option_is_redacted_through_view() {
    let events = capture_events(|| {
        let view = api_view();
        assert_eq!(view.get("token").unwrap(), "s3cr3t-token-value");
        view.runtime_config().unwrap();
        view.validate().unwrap();
    });

    assert!(
        events.iter().all(|e| !e.contains("s3cr3t-token-value")),
        "secret leaked into logs: {events:?}"
    );
}

#[test]
fn test_undeclared_key_logs_warning() {
    let events = capture_events(|| {
        let err = api_view().get("password").unwrap_err();
        assert!(err.is_invalid_key());
    });

    assert!(
        events
            .iter()
            .any(|e| e.contains("Rejected undeclared configuration key") && e.contains("key=password")),
        "expected warning: {events:?}"
    );
}
