//! Testing utilities for fuzzing the translation pipeline.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`test_translate`]: run raw bytes through decoding and translation
//! - [`test_entry`]: run an already-built entry through a fresh translator
//!
//! Both treat decode and generation failures as expected outcomes and assert
//! the output postcondition: every produced statement ends with `;`.

use alloc::string::String;

use crate::oplog::OplogEntry;
use crate::translate::{Translator, translate};

/// Feed raw bytes through the full translation pipeline.
///
/// Invalid UTF-8 and undecodable JSON return quietly; what must never happen
/// is a panic or a statement without its terminator.
///
/// # Panics
///
/// Panics if translation succeeds with a statement not ending in `;`.
pub fn test_translate(data: &[u8]) {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(statements) = translate(json) else {
        return;
    };
    assert_terminated(&statements);
}

/// Feed a structured entry through a fresh translator.
///
/// # Panics
///
/// Panics if the entry renders with a statement not ending in `;`.
pub fn test_entry(entry: &OplogEntry) {
    let mut translator = Translator::new();
    let Ok(statements) = translator.sql_statements(entry) else {
        return;
    };
    assert_terminated(&statements);
}

fn assert_terminated(statements: &[String]) {
    for sql in statements {
        assert!(sql.ends_with(';'), "Statement not ';'-terminated: {sql}");
    }
}
