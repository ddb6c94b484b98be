//! Submodule defining the errors used across the crate.

use alloc::string::String;

/// Error raised when a namespace string does not have the `schema.table` shape.
///
/// Carries the offending string. Both the schema and the table part must be
/// non-empty; the split happens at the first `.`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Namespace '{0}' is not of the form 'schema.table'")]
pub struct NamespaceError(pub String);

/// Errors that can occur while rendering an update entry as SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// The update payload carries no `diff` object.
    #[error("Update payload is missing the 'diff' object")]
    MissingDiff,

    /// The update `diff` object has neither a `u` nor a `d` sub-document.
    #[error("Update 'diff' object has neither 'u' nor 'd' fields")]
    EmptyDiff,
}

/// Errors returned by [`translate`](crate::translate::translate).
///
/// A batch either translates completely or fails with the first error hit;
/// no partial statement list is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// The input was neither a single oplog entry object nor an array of them.
    #[error("Invalid oplog JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// An entry decoded correctly but could not be rendered as SQL.
    #[error(transparent)]
    Generate(#[from] GenerateError),
}
