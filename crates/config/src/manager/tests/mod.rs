//! Tests for the configuration resolver.
//!
//! Responsibilities:
//! - Test candidate/source ordering, defaults, and error reporting.
//! - Test resolver construction and the override layer.
//! - Test that secret values never reach log output.
//!
//! Does NOT handle:
//! - Bound view restriction (tested in bound.rs).
//! - Individual sources and parsers (tested in their own modules).
//!
//! Invariants:
//! - Tests touching the override stack or the process environment use `serial_test`.

pub mod logging_tests;
