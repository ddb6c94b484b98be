//! Oplog entry parsing.
//!
//! This module provides types for deserializing MongoDB-style
//! [oplog](https://www.mongodb.com/docs/manual/core/replica-set-oplog/) entries,
//! the JSON change events a replica set records for every mutation. An entry
//! carries a single-letter operation code, a `schema.table` namespace, and one
//! or two documents describing the change.
//!
//! # Example
//!
//! ```
//! use oplog2sql::oplog::{parse, Op};
//!
//! let json = r#"{"op":"i","ns":"shop.customers","o":{"_id":1,"name":"Ana"}}"#;
//! let entry = parse(json).unwrap();
//!
//! assert_eq!(entry.op, Op::Insert);
//! assert_eq!(entry.ns.table(), "customers");
//! ```

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{GenerateError, NamespaceError};

/// Oplog operation code.
///
/// Entries identify their operation with a single letter. Codes other than
/// `i`, `u`, and `d` (for example `n` no-ops and `c` commands) decode as
/// [`Op::Unsupported`] so a stream containing them still decodes as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Document insert (`"i"`).
    Insert,
    /// Partial document update (`"u"`).
    Update,
    /// Document delete (`"d"`).
    Delete,
    /// Any other code; carries no relational change.
    Unsupported,
}

impl Op {
    /// The wire code for this operation.
    ///
    /// [`Op::Unsupported`] reports the no-op code `"n"`, so re-serializing an
    /// entry that arrived with an exotic code is lossy.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Insert => "i",
            Self::Update => "u",
            Self::Delete => "d",
            Self::Unsupported => "n",
        }
    }
}

impl Serialize for Op {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(match code.as_str() {
            "i" => Self::Insert,
            "u" => Self::Update,
            "d" => Self::Delete,
            _ => Self::Unsupported,
        })
    }
}

/// Qualified `schema.table` target of an entry.
///
/// The namespace string is split at the first `.`, so the table part may
/// itself contain dots (`db.my.table` has schema `db` and table `my.table`).
/// Both parts must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace {
    schema: String,
    table: String,
}

impl Namespace {
    /// The schema (database) part.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The table (collection) part.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((schema, table)) if !schema.is_empty() && !table.is_empty() => Ok(Self {
                schema: schema.to_string(),
                table: table.to_string(),
            }),
            _ => Err(NamespaceError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Namespace {
    type Error = NamespaceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.to_string()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// A single oplog change event.
///
/// Wire fields beyond the four below (timestamps, term, wall-clock time and
/// so on) are ignored during decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OplogEntry {
    /// Operation code.
    pub op: Op,
    /// Namespace the change applies to.
    pub ns: Namespace,
    /// Operation document: the full row for inserts, the `diff` wrapper for
    /// updates, the match document for deletes. Defaults to empty when the
    /// wire entry omits it.
    #[serde(rename = "o", default)]
    pub payload: BTreeMap<String, serde_json::Value>,
    /// Match document identifying the row an update targets.
    #[serde(rename = "o2", default)]
    pub match_key: Option<BTreeMap<String, serde_json::Value>>,
}

/// Borrowed view of an update entry's `diff` document.
///
/// Updates carry their changes under `o.diff`: fields to assign under `u`,
/// fields to clear under `d`. When both are present the `u` document wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpdateDiff<'a> {
    /// Fields assigned new values (`diff.u`).
    Set(&'a serde_json::Map<String, serde_json::Value>),
    /// Fields cleared to NULL (`diff.d`).
    Unset(&'a serde_json::Map<String, serde_json::Value>),
}

impl OplogEntry {
    /// Extract the update sub-document from the payload.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::MissingDiff`] when the payload has no `diff`
    /// object and [`GenerateError::EmptyDiff`] when the object holds neither
    /// a `u` nor a `d` sub-document.
    pub fn update_diff(&self) -> Result<UpdateDiff<'_>, GenerateError> {
        let diff = self
            .payload
            .get("diff")
            .and_then(serde_json::Value::as_object)
            .ok_or(GenerateError::MissingDiff)?;

        if let Some(set) = diff.get("u").and_then(serde_json::Value::as_object) {
            return Ok(UpdateDiff::Set(set));
        }
        if let Some(unset) = diff.get("d").and_then(serde_json::Value::as_object) {
            return Ok(UpdateDiff::Unset(unset));
        }
        Err(GenerateError::EmptyDiff)
    }
}

/// Parse a single oplog entry from JSON.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the JSON is malformed, the `op` or `ns`
/// field is missing, or the namespace is not of the `schema.table` form.
///
/// # Example
///
/// ```
/// use oplog2sql::oplog::{parse, Op};
///
/// let entry = parse(r#"{"op":"d","ns":"shop.orders","o":{"_id":7}}"#).unwrap();
/// assert_eq!(entry.op, Op::Delete);
/// ```
pub fn parse(json: &str) -> Result<OplogEntry, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a batch of oplog entries from JSON.
///
/// Accepts either an array of entry objects or a single entry object, which
/// becomes a one-element batch. An empty array is a valid empty batch.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the input is neither form. The error
/// surfaced matches the input's apparent shape: input starting with `[` gets
/// the array decoding error, anything else the single-entry error.
///
/// # Example
///
/// ```
/// use oplog2sql::oplog::parse_batch;
///
/// let batch = parse_batch(r#"[{"op":"d","ns":"shop.orders","o":{"_id":9}}]"#).unwrap();
/// assert_eq!(batch.len(), 1);
///
/// let single = parse_batch(r#"{"op":"d","ns":"shop.orders","o":{"_id":9}}"#).unwrap();
/// assert_eq!(single.len(), 1);
/// ```
pub fn parse_batch(json: &str) -> Result<Vec<OplogEntry>, serde_json::Error> {
    match serde_json::from_str::<Vec<OplogEntry>>(json) {
        Ok(entries) => Ok(entries),
        Err(array_err) => match parse(json) {
            Ok(entry) => Ok(alloc::vec![entry]),
            Err(single_err) if !json.trim_start().starts_with('[') => Err(single_err),
            Err(_) => Err(array_err),
        },
    }
}

// ============================================================================
// Arbitrary implementations for testing
// ============================================================================

#[cfg(feature = "testing")]
mod arbitrary_impl {
    use super::{BTreeMap, Namespace, Op, OplogEntry};
    use alloc::string::ToString;
    use arbitrary::{Arbitrary, Unstructured};

    impl<'a> Arbitrary<'a> for Op {
        fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
            Ok(*u.choose(&[Self::Insert, Self::Update, Self::Delete, Self::Unsupported])?)
        }
    }

    impl<'a> Arbitrary<'a> for Namespace {
        fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
            let schema: u8 = u.int_in_range(0..=9)?;
            let table: u8 = u.int_in_range(0..=9)?;
            Ok(Self {
                schema: alloc::format!("schema{schema}"),
                table: alloc::format!("table{table}"),
            })
        }
    }

    impl<'a> Arbitrary<'a> for OplogEntry {
        fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
            let op = Op::arbitrary(u)?;
            let ns = Namespace::arbitrary(u)?;

            // Generate an _id plus 1-5 value columns
            let num_fields: usize = u.int_in_range(1..=5)?;
            let mut row = BTreeMap::new();
            row.insert(
                "_id".to_string(),
                serde_json::Value::from(u.arbitrary::<i64>()?),
            );
            for i in 1..=num_fields {
                let value: i64 = u.arbitrary()?;
                row.insert(alloc::format!("field{i}"), serde_json::Value::from(value));
            }

            if op != Op::Update {
                return Ok(Self {
                    op,
                    ns,
                    payload: row,
                    match_key: None,
                });
            }

            // Updates carry their changes under o.diff and match rows via o2
            let mut changes = serde_json::Map::new();
            for (field, value) in &row {
                if field != "_id" {
                    changes.insert(field.clone(), value.clone());
                }
            }
            let set = u.arbitrary::<bool>()?;
            let mut diff = serde_json::Map::new();
            diff.insert(
                if set { "u" } else { "d" }.to_string(),
                serde_json::Value::Object(changes),
            );

            let mut payload = BTreeMap::new();
            payload.insert("diff".to_string(), serde_json::Value::Object(diff));

            let mut match_key = BTreeMap::new();
            match_key.insert("_id".to_string(), row["_id"].clone());

            Ok(Self {
                op,
                ns,
                payload,
                match_key: Some(match_key),
            })
        }
    }
}
