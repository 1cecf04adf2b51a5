//! Lenient boolean parsing.

use super::{ParseError, Parser};

const TRUE_VALUES: &[&str] = &["t", "true", "yes", "y", "on", "1"];
const FALSE_VALUES: &[&str] = &["f", "false", "no", "n", "off", "0"];

/// Parse a bool value, case-insensitively.
///
/// Accepts `t`/`true`/`yes`/`y`/`on`/`1` and `f`/`false`/`no`/`n`/`off`/`0`.
pub fn parse_bool(raw: &str) -> Result<bool, ParseError> {
    let lowered = raw.to_lowercase();
    if TRUE_VALUES.contains(&lowered.as_str()) {
        return Ok(true);
    }
    if FALSE_VALUES.contains(&lowered.as_str()) {
        return Ok(false);
    }
    Err(ParseError::new(format!("{raw:?} is not a valid bool value")))
}

/// [`parse_bool`] as a [`Parser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Bool;

impl Parser for Bool {
    type Output = bool;

    fn parse(&self, raw: &str) -> Result<bool, ParseError> {
        parse_bool(raw)
    }

    fn name(&self) -> String {
        "bool".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_true() {
        for raw in ["t", "true", "TRUE", "yes", "YES", "y", "on", "On", "1"] {
            assert!(parse_bool(raw).unwrap(), "{raw} should be true");
        }
    }

    #[test]
    fn test_parse_bool_false() {
        for raw in ["f", "false", "FALSE", "no", "n", "off", "OFF", "0"] {
            assert!(!parse_bool(raw).unwrap(), "{raw} should be false");
        }
    }

    #[test]
    fn test_parse_bool_error() {
        let err = parse_bool("banana").unwrap_err();
        assert_eq!(err.message(), "\"banana\" is not a valid bool value");
        assert!(parse_bool("").is_err());
        assert!(parse_bool(" true").is_err());
    }
}
