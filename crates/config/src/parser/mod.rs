//! Parsers that turn raw configuration strings into typed values.
//!
//! Responsibilities:
//! - Define the `Parser` trait and its failure type `ParseError`.
//! - Provide the identity, primitive (`FromStr`), and closure-backed parsers.
//! - Provide `DynParser`, a type-erased parser stored in option declarations.
//!
//! Does NOT handle:
//! - Deciding where a raw value comes from (see `manager`).
//! - Wrapping failures with key/namespace context (see `ConfigError::InvalidValue`).
//!
//! Invariants:
//! - Invalid input is always an error; parsers never signal absence.
//! - Every parser has a stable `name()` used in user-facing messages.

mod boolean;
mod class;
mod list;
mod units;

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

pub use boolean::{Bool, parse_bool};
pub use class::ClassRegistry;
pub use list::{ChoiceOf, ListOf};
pub use units::{DataSize, TimePeriod, parse_data_size, parse_time_period};

/// A parser rejected its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Converts a raw configuration string into a typed value.
pub trait Parser: Send + Sync {
    type Output;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError>;

    /// Human-readable identity shown in error messages.
    fn name(&self) -> String;
}

impl<P: Parser + ?Sized> Parser for &P {
    type Output = P::Output;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError> {
        (**self).parse(raw)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<P: Parser + ?Sized> Parser for Arc<P> {
    type Output = P::Output;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError> {
        (**self).parse(raw)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Identity parser: the raw string is the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Str;

impl Parser for Str {
    type Output = String;

    fn parse(&self, raw: &str) -> Result<String, ParseError> {
        Ok(raw.to_string())
    }

    fn name(&self) -> String {
        "str".to_string()
    }
}

/// Parser for any `FromStr` type (integers, floats, `PathBuf`, ...).
///
/// `bool` through this parser only accepts `true`/`false`; use [`Bool`] for
/// the lenient set.
pub struct FromStrParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrParser<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromStrParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FromStrParser<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for FromStrParser<T> {}

impl<T> fmt::Debug for FromStrParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FromStrParser<{}>", short_type_name::<T>())
    }
}

impl<T> Parser for FromStrParser<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Output = T;

    fn parse(&self, raw: &str) -> Result<T, ParseError> {
        raw.parse::<T>().map_err(|e| {
            ParseError::new(format!(
                "{raw:?} is not a valid {}: {e}",
                short_type_name::<T>()
            ))
        })
    }

    fn name(&self) -> String {
        short_type_name::<T>().to_string()
    }
}

/// Shorthand for `FromStrParser::<T>::new()`.
pub fn parse_as<T>() -> FromStrParser<T> {
    FromStrParser::new()
}

/// Parser backed by a user-supplied closure.
pub struct FnParser<F, T, E> {
    name: String,
    f: F,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F: Clone, T, E> Clone for FnParser<F, T, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F, T, E> fmt::Debug for FnParser<F, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnParser").field("name", &self.name).finish()
    }
}

impl<F, T, E> Parser for FnParser<F, T, E>
where
    F: Fn(&str) -> Result<T, E> + Send + Sync,
    E: fmt::Display,
{
    type Output = T;

    fn parse(&self, raw: &str) -> Result<T, ParseError> {
        (self.f)(raw).map_err(|e| ParseError::new(e.to_string()))
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Wrap a closure as a named parser.
///
/// ```
/// use strata_config::parser::{Parser, from_fn};
///
/// let upper = from_fn("upper", |s: &str| -> Result<String, String> {
///     Ok(s.to_uppercase())
/// });
/// assert_eq!(upper.parse("abc").unwrap(), "ABC");
/// ```
pub fn from_fn<F, T, E>(name: impl Into<String>, f: F) -> FnParser<F, T, E>
where
    F: Fn(&str) -> Result<T, E> + Send + Sync,
    E: fmt::Display,
{
    FnParser {
        name: name.into(),
        f,
        _marker: PhantomData,
    }
}

/// Parser whose output is boxed as `dyn Any`, so declarations with different
/// output types can live in one collection.
trait ErasedParser: Send + Sync {
    fn parse_any(&self, raw: &str) -> Result<Box<dyn Any + Send + Sync>, ParseError>;
    fn erased_name(&self) -> String;
    fn erased_output_type(&self) -> &'static str;
    fn erased_output_type_id(&self) -> TypeId;
}

impl<P> ErasedParser for P
where
    P: Parser,
    P::Output: Send + Sync + 'static,
{
    fn parse_any(&self, raw: &str) -> Result<Box<dyn Any + Send + Sync>, ParseError> {
        let value = Parser::parse(self, raw)?;
        Ok(Box::new(value))
    }

    fn erased_name(&self) -> String {
        Parser::name(self)
    }

    fn erased_output_type(&self) -> &'static str {
        short_type_name::<P::Output>()
    }

    fn erased_output_type_id(&self) -> TypeId {
        TypeId::of::<P::Output>()
    }
}

/// Type-erased, cheaply clonable parser.
#[derive(Clone)]
pub struct DynParser {
    inner: Arc<dyn ErasedParser>,
}

impl DynParser {
    pub fn new<P>(parser: P) -> Self
    where
        P: Parser + 'static,
        P::Output: Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(parser),
        }
    }

    /// Short name of the type this parser produces.
    pub fn output_type(&self) -> &'static str {
        self.inner.erased_output_type()
    }

    /// Whether parsing yields a `T`.
    pub fn produces<T: Any>(&self) -> bool {
        self.inner.erased_output_type_id() == TypeId::of::<T>()
    }
}

impl Default for DynParser {
    fn default() -> Self {
        DynParser::new(Str)
    }
}

impl fmt::Debug for DynParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynParser({} -> {})", self.inner.erased_name(), self.output_type())
    }
}

impl Parser for DynParser {
    type Output = Box<dyn Any + Send + Sync>;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError> {
        self.inner.parse_any(raw)
    }

    fn name(&self) -> String {
        self.inner.erased_name()
    }
}

/// Last path segment of a type name, for non-generic types.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}
