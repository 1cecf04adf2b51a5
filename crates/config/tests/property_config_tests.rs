//! Property-based tests for key generation and parsers.
//!
//! These tests use randomly generated inputs to check properties that must
//! hold for every input, not just the hand-picked unit test cases.
//!
//! Test coverage:
//! - Namespace: composition is associative, keys are uppercase and `_`-joined
//! - DictSource: lookups are case-insensitive
//! - Bool: case-insensitive acceptance of the true/false sets
//! - ListOf: joined integer lists parse back to the same values
//! - DataSize/TimePeriod: unit arithmetic

use proptest::prelude::*;

use strata_config::parser::{Bool, ListOf, Parser, parse_as, parse_data_size, parse_time_period};
use strata_config::{DictSource, Namespace, Source, generate_uppercase_key};

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}"
}

fn namespace_strategy() -> impl Strategy<Value = Namespace> {
    prop::collection::vec(segment_strategy(), 0..4).prop_map(Namespace::from)
}

/// Randomly upper/lower-cases each character.
fn recase(word: &str, mask: &[bool]) -> String {
    word.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| {
            if *upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_namespace_composition_is_associative(
        a in namespace_strategy(),
        b in namespace_strategy(),
        c in namespace_strategy(),
    ) {
        let left = a.with_namespace(&b).with_namespace(&c);
        let right = a.with_namespace(b.with_namespace(&c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_generated_key_is_joined_uppercase(
        segments in prop::collection::vec(segment_strategy(), 0..4),
        key in segment_strategy(),
    ) {
        let namespace = Namespace::from(segments.clone());
        let mut parts = segments;
        parts.push(key.clone());
        prop_assert_eq!(generate_uppercase_key(&key, &namespace), parts.join("_").to_uppercase());
    }

    #[test]
    fn prop_dict_lookup_ignores_case(
        key in segment_strategy(),
        value in "[ -~]{1,20}",
        mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let source = DictSource::new([(recase(&key, &mask), value.clone())]);
        let found = source.get(&key, &Namespace::root()).unwrap();
        prop_assert_eq!(found, Some(value));
    }

    #[test]
    fn prop_bool_is_case_insensitive(
        index in 0usize..12,
        mask in prop::collection::vec(any::<bool>(), 1..6),
    ) {
        const WORDS: [(&str, bool); 12] = [
            ("t", true), ("true", true), ("yes", true), ("y", true), ("on", true), ("1", true),
            ("f", false), ("false", false), ("no", false), ("n", false), ("off", false), ("0", false),
        ];
        let (word, expected) = WORDS[index];
        prop_assert_eq!(Bool.parse(&recase(word, &mask)).unwrap(), expected);
    }

    #[test]
    fn prop_bool_rejects_other_words(word in "[a-z]{2,8}") {
        prop_assume!(!["true", "yes", "on", "false", "no", "off"].contains(&word.as_str()));
        prop_assert!(Bool.parse(&word).is_err());
    }

    #[test]
    fn prop_int_list_parses_back(
        values in prop::collection::vec(any::<i64>(), 0..10),
        spaced in any::<bool>(),
    ) {
        let separator = if spaced { " , " } else { "," };
        let raw = values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(separator);
        let parsed = ListOf::new(parse_as::<i64>()).parse(&raw).unwrap();
        prop_assert_eq!(parsed, values);
    }

    #[test]
    fn prop_data_size_units_multiply(n in 0u64..1_000_000) {
        prop_assert_eq!(parse_data_size(&n.to_string()).unwrap(), n);
        prop_assert_eq!(parse_data_size(&format!("{n}kb")).unwrap(), n * 1_000);
        prop_assert_eq!(parse_data_size(&format!("{n}KiB")).unwrap(), n * 1_024);
        prop_assert_eq!(parse_data_size(&format!(" {n}mib ")).unwrap(), n * 1_024 * 1_024);
        prop_assert_eq!(parse_data_size(&format!("{n}gb")).unwrap(), n * 1_000_000_000);
    }

    #[test]
    fn prop_time_period_segments_add_up(
        d in 0u64..100,
        h in 0u64..100,
        m in 0u64..100,
        s in 0u64..100,
    ) {
        let raw = format!("{d}d{h}h{m}m{s}s");
        prop_assert_eq!(
            parse_time_period(&raw).unwrap(),
            d * 86_400 + h * 3_600 + m * 60 + s
        );
    }
}
