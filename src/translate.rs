//! Batch translation of oplog entries into SQL statements.
//!
//! The [`Translator`] walks entries in order and emits, for each one, the SQL
//! that replays it: inserts are preceded by `CREATE SCHEMA` and `CREATE TABLE`
//! the first time their namespace appears, updates and deletes map to single
//! statements, and entries with codes outside `i`/`u`/`d` produce nothing.
//!
//! # Example
//!
//! ```
//! use oplog2sql::translate::translate;
//!
//! let statements =
//!     translate(r#"{"op":"i","ns":"shop.customers","o":{"_id":1,"name":"Ana"}}"#).unwrap();
//!
//! assert_eq!(statements, [
//!     "CREATE SCHEMA shop;",
//!     "CREATE TABLE shop.customers (_id INTEGER PRIMARY KEY, name VARCHAR(255));",
//!     "INSERT INTO shop.customers (_id, name) VALUES (1, 'Ana');",
//! ]);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::errors::{GenerateError, TranslateError};
use crate::oplog::{Op, OplogEntry, parse_batch};
use crate::statement;

/// Set of schema and table identifiers whose creation DDL has been emitted.
///
/// Marks are permanent: once an identifier's DDL has been produced, later
/// entries in the same batch must not produce it again. Schema identifiers
/// never contain a `.` and full `schema.table` identifiers always do, so the
/// two kinds share one set without colliding.
#[derive(Debug, Clone, Default)]
pub struct DdlCache {
    seen: HashSet<String>,
}

impl DdlCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identifier as covered by emitted DDL.
    ///
    /// Returns `true` when the identifier was not yet marked, i.e. its
    /// creation statement must be emitted now.
    pub fn mark(&mut self, ident: &str) -> bool {
        if self.seen.contains(ident) {
            return false;
        }
        self.seen.insert(ident.to_string());
        true
    }

    /// Whether an identifier has been marked.
    #[must_use]
    pub fn contains(&self, ident: &str) -> bool {
        self.seen.contains(ident)
    }

    /// Number of marked identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no identifier has been marked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Per-batch translation state.
///
/// A translator owns the [`DdlCache`] for one stream of entries. Feeding it
/// entries in oplog order yields replayable SQL in the same order. Build a
/// fresh translator per independent batch; nothing is shared between
/// instances.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    cache: DdlCache,
}

impl Translator {
    /// Create a translator with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The namespaces whose creation DDL has been emitted so far.
    #[must_use]
    pub fn cache(&self) -> &DdlCache {
        &self.cache
    }

    /// Translate one entry into the SQL statements that replay it.
    ///
    /// Inserts yield up to three statements (`CREATE SCHEMA`, `CREATE TABLE`,
    /// `INSERT`) depending on what the cache has already seen, updates and
    /// deletes yield exactly one, and entries with unsupported codes yield
    /// none.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerateError`] when an update entry carries no usable
    /// diff document.
    pub fn sql_statements(&mut self, entry: &OplogEntry) -> Result<Vec<String>, GenerateError> {
        let mut statements = Vec::new();
        match entry.op {
            Op::Insert => {
                if self.cache.mark(entry.ns.schema()) {
                    statements.push(statement::create_schema(entry.ns.schema()));
                }
                let table_ident = entry.ns.to_string();
                if self.cache.mark(&table_ident) {
                    statements.push(statement::create_table(entry));
                }
                statements.push(statement::insert(entry));
            }
            Op::Update => statements.push(statement::update(entry)?),
            Op::Delete => statements.push(statement::delete(entry)),
            Op::Unsupported => {}
        }
        Ok(statements)
    }
}

/// Translate a batch of oplog JSON into SQL statements.
///
/// The input may be a single entry object or an array of them. Statements
/// come back in entry order, with creation DDL emitted once per schema and
/// once per table; every call starts from a fresh [`DdlCache`].
///
/// All-or-nothing: an entry that fails to decode or render fails the whole
/// call, and no statements are returned for the entries before it.
///
/// # Errors
///
/// Returns [`TranslateError::Decode`] when the input is not valid oplog JSON
/// and [`TranslateError::Generate`] when an update entry carries no usable
/// diff document.
pub fn translate(json: &str) -> Result<Vec<String>, TranslateError> {
    let entries = parse_batch(json)?;
    let mut translator = Translator::new();
    let mut statements = Vec::new();
    for entry in &entries {
        statements.extend(translator.sql_statements(entry)?);
    }
    Ok(statements)
}
