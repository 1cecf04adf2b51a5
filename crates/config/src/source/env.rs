//! Process environment source.
//!
//! Invariants:
//! - Lookups are case-sensitive: variables must be defined in uppercase
//!   (`DB_HOST`, not `db_host`).
//! - A variable that is set but not valid UTF-8 is a `SourceError`, not absence.

use std::env::VarError;

use super::Source;
use crate::error::SourceError;
use crate::namespace::Namespace;

/// Source reading `std::env` at lookup time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl EnvSource {
    pub fn new() -> Self {
        Self
    }
}

impl Source for EnvSource {
    fn get(&self, key: &str, namespace: &Namespace) -> Result<Option<String>, SourceError> {
        let full_key = namespace.full_key(key);
        tracing::debug!(source = "env", full_key = %full_key, "Searching source");
        match std::env::var(&full_key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e @ VarError::NotUnicode(_)) => Err(SourceError::with_source(
                format!("environment variable {full_key} is not valid unicode"),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_reads_uppercased_namespaced_key() {
        temp_env::with_vars(
            [
                ("STRATA_TEST_DB_USERNAME", Some("admin")),
                ("STRATA_TEST_UNSET", None),
            ],
            || {
                let source = EnvSource::new();
                let ns = Namespace::from(["strata_test", "db"]);
                assert_eq!(
                    source.get("username", &ns).unwrap().as_deref(),
                    Some("admin")
                );
                assert_eq!(
                    source
                        .get("unset", &Namespace::from("strata_test"))
                        .unwrap(),
                    None
                );
            },
        );
    }

    #[test]
    #[serial]
    fn test_empty_variable_is_returned() {
        temp_env::with_var("STRATA_TEST_EMPTY", Some(""), || {
            let value = EnvSource::new()
                .get("strata_test_empty", &Namespace::root())
                .unwrap();
            assert_eq!(value, Some(String::new()));
        });
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_non_unicode_is_source_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(&[0x66, 0x6f, 0xff]);
        temp_env::with_var("STRATA_TEST_BYTES", Some(raw), || {
            let err = EnvSource::new()
                .get("strata_test_bytes", &Namespace::root())
                .unwrap_err();
            assert!(err.message().contains("STRATA_TEST_BYTES"));
        });
    }
}
