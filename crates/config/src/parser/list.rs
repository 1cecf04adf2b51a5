//! Compound parsers: delimited lists and fixed choices.

use std::fmt::Debug;

use super::{ParseError, Parser};
use crate::constants::DEFAULT_LIST_DELIMITER;

/// Parse a delimited list, applying an element parser to each piece.
///
/// Pieces are trimmed; empty pieces are skipped unless `allow_empty()` is
/// set. No quoting or escaping is supported: `"a,b",c` yields `"a`, `b"`, `c`.
#[derive(Debug, Clone)]
pub struct ListOf<P> {
    parser: P,
    delimiter: String,
    allow_empty: bool,
}

impl<P: Parser> ListOf<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            delimiter: DEFAULT_LIST_DELIMITER.to_string(),
            allow_empty: false,
        }
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Keep empty pieces (and parse `""` as a one-element list).
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }
}

impl<P: Parser> Parser for ListOf<P> {
    type Output = Vec<P::Output>;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError> {
        if raw.is_empty() && !self.allow_empty {
            return Ok(Vec::new());
        }
        raw.split(self.delimiter.as_str())
            .map(str::trim)
            .filter(|piece| self.allow_empty || !piece.is_empty())
            .map(|piece| self.parser.parse(piece))
            .collect()
    }

    fn name(&self) -> String {
        format!("ListOf({})", self.parser.name())
    }
}

/// Parse with an inner parser, then require membership in a fixed set.
pub struct ChoiceOf<P: Parser> {
    parser: P,
    choices: Vec<P::Output>,
}

impl<P> Debug for ChoiceOf<P>
where
    P: Parser + Debug,
    P::Output: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChoiceOf")
            .field("parser", &self.parser)
            .field("choices", &self.choices)
            .finish()
    }
}

impl<P: Parser> ChoiceOf<P> {
    pub fn new(parser: P, choices: impl IntoIterator<Item = P::Output>) -> Self {
        Self {
            parser,
            choices: choices.into_iter().collect(),
        }
    }
}

impl<P> Parser for ChoiceOf<P>
where
    P: Parser,
    P::Output: PartialEq + Debug + Send + Sync,
{
    type Output = P::Output;

    fn parse(&self, raw: &str) -> Result<Self::Output, ParseError> {
        let value = self.parser.parse(raw)?;
        if self.choices.contains(&value) {
            Ok(value)
        } else {
            Err(ParseError::new(format!(
                "{raw:?} is not a valid choice; expected one of {:?}",
                self.choices
            )))
        }
    }

    fn name(&self) -> String {
        format!("ChoiceOf({}, {:?})", self.parser.name(), self.choices)
    }
}
