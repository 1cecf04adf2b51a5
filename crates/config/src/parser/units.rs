//! Data-size and time-period parsers.
//!
//! Invariants:
//! - Input is trimmed and lower-cased before parsing.
//! - `_` is accepted as a digit separator (`1_000`).
//! - A bare number is bytes (data size) or seconds (time period).
//! - Arithmetic overflow is a parse error, never a wrap.

use super::{ParseError, Parser};

const DATA_SIZE_UNITS: &[(&str, u64)] = &[
    ("", 1),
    ("b", 1),
    ("kb", 1_000),
    ("mb", 1_000_000),
    ("gb", 1_000_000_000),
    ("tb", 1_000_000_000_000),
    ("pb", 1_000_000_000_000_000),
    ("kib", 1 << 10),
    ("mib", 1 << 20),
    ("gib", 1 << 30),
    ("tib", 1 << 40),
    ("pib", 1 << 50),
];

const TIME_UNITS: &[(char, u64)] = &[
    ('w', 7 * 24 * 60 * 60),
    ('d', 24 * 60 * 60),
    ('h', 60 * 60),
    ('m', 60),
    ('s', 1),
];

fn parse_amount(digits: &str) -> Option<u64> {
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a data size such as `40gb` or `20KiB` into a number of bytes.
///
/// Decimal units (`kb` through `pb`) are 1000-based; binary units
/// (`kib` through `pib`) are 1024-based.
pub fn parse_data_size(raw: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::new(format!("{raw:?} is not a valid data size"));

    let fixed = raw.trim().to_lowercase();
    let split = fixed
        .find(|c: char| !(c.is_ascii_digit() || c == '_'))
        .unwrap_or(fixed.len());
    let (amount, unit) = fixed.split_at(split);

    let amount = parse_amount(amount).ok_or_else(invalid)?;
    let multiplier = DATA_SIZE_UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, multiplier)| *multiplier)
        .ok_or_else(invalid)?;

    amount.checked_mul(multiplier).ok_or_else(invalid)
}

/// Parse a compound time period such as `15m4s` or `1w 2d` into seconds.
pub fn parse_time_period(raw: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::new(format!("{raw:?} is not a valid time period"));

    let fixed = raw.trim().to_lowercase();
    if let Some(seconds) = parse_amount(&fixed)
        && fixed.chars().all(|c| c.is_ascii_digit() || c == '_')
    {
        return Ok(seconds);
    }

    let mut total: u64 = 0;
    let mut pending = String::new();
    let mut segments = 0usize;

    for c in fixed.chars() {
        if c.is_ascii_digit() || c == '_' {
            pending.push(c);
        } else if c.is_whitespace() && pending.is_empty() {
            continue;
        } else if let Some((_, multiplier)) = TIME_UNITS.iter().find(|(unit, _)| *unit == c) {
            let amount = parse_amount(&pending).ok_or_else(invalid)?;
            let seconds = amount.checked_mul(*multiplier).ok_or_else(invalid)?;
            total = total.checked_add(seconds).ok_or_else(invalid)?;
            pending.clear();
            segments += 1;
        } else {
            return Err(invalid());
        }
    }

    if segments == 0 || !pending.is_empty() {
        return Err(invalid());
    }
    Ok(total)
}

/// [`parse_data_size`] as a [`Parser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSize;

impl Parser for DataSize {
    type Output = u64;

    fn parse(&self, raw: &str) -> Result<u64, ParseError> {
        parse_data_size(raw)
    }

    fn name(&self) -> String {
        "data_size".to_string()
    }
}

/// [`parse_time_period`] as a [`Parser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TimePeriod;

impl Parser for TimePeriod {
    type Output = u64;

    fn parse(&self, raw: &str) -> Result<u64, ParseError> {
        parse_time_period(raw)
    }

    fn name(&self) -> String {
        "time_period".to_string()
    }
}
