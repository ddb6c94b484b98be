#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod errors;
pub mod oplog;
pub mod statement;
#[cfg(feature = "testing")]
pub mod testing;
pub mod translate;
pub mod value;

// Re-export main types
pub use oplog::{Namespace, Op, OplogEntry, UpdateDiff, parse, parse_batch};
pub use translate::{DdlCache, Translator, translate};
pub use value::{Value, column_type};

// Re-export errors
pub use errors::{GenerateError, NamespaceError, TranslateError};
