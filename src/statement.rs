//! SQL statement generation from oplog entries.
//!
//! Each generator renders one complete statement terminated by `;`. Output is
//! deterministic: every multi-field clause lists fields in ascending
//! lexicographic order, whatever order the source document used. Identifiers
//! and literals are embedded directly, without quoting or escaping.
//!
//! # Example
//!
//! ```
//! use oplog2sql::oplog::parse;
//! use oplog2sql::statement;
//!
//! let entry = parse(r#"{"op":"i","ns":"shop.customers","o":{"_id":1,"name":"Ana"}}"#).unwrap();
//!
//! assert_eq!(
//!     statement::insert(&entry),
//!     "INSERT INTO shop.customers (_id, name) VALUES (1, 'Ana');"
//! );
//! ```

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::errors::GenerateError;
use crate::oplog::{OplogEntry, UpdateDiff};
use crate::value::{Value, column_type};

/// Render the `CREATE SCHEMA` statement for a schema name.
#[must_use]
pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA {schema};")
}

/// Render the `CREATE TABLE` statement for an insert entry.
///
/// One column per payload field, each typed from the field's first observed
/// value. The `_id` column carries the `PRIMARY KEY` suffix.
#[must_use]
pub fn create_table(entry: &OplogEntry) -> String {
    let columns: Vec<String> = entry
        .payload
        .iter()
        .map(|(field, json)| format!("{field} {}", column_type(field, &Value::from(json))))
        .collect();

    format!("CREATE TABLE {} ({});", entry.ns, columns.join(", "))
}

/// Render the `INSERT` statement for an insert entry.
#[must_use]
pub fn insert(entry: &OplogEntry) -> String {
    let mut fields = Vec::new();
    let mut literals = Vec::new();
    for (field, json) in &entry.payload {
        fields.push(field.as_str());
        literals.push(Value::from(json).to_string());
    }

    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        entry.ns,
        fields.join(", "),
        literals.join(", ")
    )
}

/// Render the `UPDATE` statement for an update entry.
///
/// Assignments come from the entry's diff document: set fields carry their
/// new values, unset fields are assigned NULL. Predicates come from the
/// match document. Both clauses are sorted by field name.
///
/// # Errors
///
/// Returns a [`GenerateError`] when the payload does not carry a usable
/// diff document.
pub fn update(entry: &OplogEntry) -> Result<String, GenerateError> {
    let assignments: Vec<String> = match entry.update_diff()? {
        UpdateDiff::Set(set) => {
            // Map iteration order depends on serde_json features; sort explicitly
            let mut pairs: Vec<(&String, &serde_json::Value)> = set.iter().collect();
            pairs.sort_unstable_by_key(|(field, _)| *field);
            pairs
                .into_iter()
                .map(|(field, json)| format!("{field} = {}", Value::from(json)))
                .collect()
        }
        UpdateDiff::Unset(unset) => {
            let mut fields: Vec<&String> = unset.keys().collect();
            fields.sort_unstable();
            fields
                .into_iter()
                .map(|field| format!("{field} = NULL"))
                .collect()
        }
    };

    let predicates = entry
        .match_key
        .as_ref()
        .map_or_else(Vec::new, equality_predicates);

    Ok(format!(
        "UPDATE {} SET {} WHERE {};",
        entry.ns,
        assignments.join(", "),
        predicates.join(" AND ")
    ))
}

/// Render the `DELETE` statement for a delete entry.
///
/// The payload is the match document; every field becomes an equality
/// predicate, sorted by field name and joined with `AND`.
#[must_use]
pub fn delete(entry: &OplogEntry) -> String {
    format!(
        "DELETE FROM {} WHERE {};",
        entry.ns,
        equality_predicates(&entry.payload).join(" AND ")
    )
}

/// Equality predicates over a match document, in field order.
fn equality_predicates(doc: &BTreeMap<String, serde_json::Value>) -> Vec<String> {
    doc.iter()
        .map(|(field, json)| format!("{field} = {}", Value::from(json)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oplog::parse;

    // ========================================================================
    // DDL generation
    // ========================================================================

    #[test]
    fn test_create_schema() {
        assert_eq!(create_schema("shop"), "CREATE SCHEMA shop;");
    }

    #[test]
    fn test_create_table_columns_sorted_and_typed() {
        let entry = parse(
            r#"{"op":"i","ns":"shop.customers","o":{"zip":10,"_id":1,"name":"Ana","rate":0.5,"ok":true}}"#,
        )
        .unwrap();

        assert_eq!(
            create_table(&entry),
            "CREATE TABLE shop.customers (_id INTEGER PRIMARY KEY, name VARCHAR(255), \
             ok BOOLEAN, rate FLOAT, zip INTEGER);"
        );
    }

    #[test]
    fn test_create_table_string_primary_key() {
        let entry = parse(r#"{"op":"i","ns":"shop.sessions","o":{"_id":"s-91"}}"#).unwrap();
        assert_eq!(
            create_table(&entry),
            "CREATE TABLE shop.sessions (_id VARCHAR(255) PRIMARY KEY);"
        );
    }

    // ========================================================================
    // INSERT generation
    // ========================================================================

    #[test]
    fn test_insert_values_follow_column_order() {
        let entry = parse(
            r#"{"op":"i","ns":"shop.customers","o":{"zip":10,"_id":1,"name":"Ana","rate":0.5,"ok":true}}"#,
        )
        .unwrap();

        assert_eq!(
            insert(&entry),
            "INSERT INTO shop.customers (_id, name, ok, rate, zip) \
             VALUES (1, 'Ana', true, 0.5, 10);"
        );
    }

    #[test]
    fn test_insert_null_and_nested_literals() {
        let entry = parse(
            r#"{"op":"i","ns":"shop.customers","o":{"_id":2,"phone":null,"tags":["a","b"]}}"#,
        )
        .unwrap();

        assert_eq!(
            insert(&entry),
            r#"INSERT INTO shop.customers (_id, phone, tags) VALUES (2, NULL, '["a","b"]');"#
        );
    }

    // ========================================================================
    // UPDATE generation
    // ========================================================================

    #[test]
    fn test_update_set() {
        let entry = parse(
            r#"{"op":"u","ns":"shop.customers","o":{"diff":{"u":{"name":"Bea","balance":51.25}}},"o2":{"_id":1}}"#,
        )
        .unwrap();

        assert_eq!(
            update(&entry).unwrap(),
            "UPDATE shop.customers SET balance = 51.25, name = 'Bea' WHERE _id = 1;"
        );
    }

    #[test]
    fn test_update_unset_assigns_null() {
        let entry = parse(
            r#"{"op":"u","ns":"shop.customers","o":{"diff":{"d":{"nickname":false,"middle_name":false}}},"o2":{"_id":1}}"#,
        )
        .unwrap();

        assert_eq!(
            update(&entry).unwrap(),
            "UPDATE shop.customers SET middle_name = NULL, nickname = NULL WHERE _id = 1;"
        );
    }

    #[test]
    fn test_update_where_clause_sorted() {
        let entry = parse(
            r#"{"op":"u","ns":"shop.ledger","o":{"diff":{"u":{"state":"done"}}},"o2":{"year":2024,"account":9}}"#,
        )
        .unwrap();

        assert_eq!(
            update(&entry).unwrap(),
            "UPDATE shop.ledger SET state = 'done' WHERE account = 9 AND year = 2024;"
        );
    }

    #[test]
    fn test_update_without_match_key() {
        let entry =
            parse(r#"{"op":"u","ns":"shop.customers","o":{"diff":{"u":{"name":"Bea"}}}}"#).unwrap();

        // The reference renders an empty predicate list as-is
        assert_eq!(
            update(&entry).unwrap(),
            "UPDATE shop.customers SET name = 'Bea' WHERE ;"
        );
    }

    #[test]
    fn test_update_rejects_unusable_diff() {
        let entry = parse(r#"{"op":"u","ns":"shop.customers","o":{},"o2":{"_id":1}}"#).unwrap();
        assert_eq!(update(&entry), Err(GenerateError::MissingDiff));

        let entry =
            parse(r#"{"op":"u","ns":"shop.customers","o":{"diff":{}},"o2":{"_id":1}}"#).unwrap();
        assert_eq!(update(&entry), Err(GenerateError::EmptyDiff));
    }

    // ========================================================================
    // DELETE generation
    // ========================================================================

    #[test]
    fn test_delete_predicates_sorted() {
        let entry =
            parse(r#"{"op":"d","ns":"shop.customers","o":{"name":"Ana","_id":1}}"#).unwrap();

        assert_eq!(
            delete(&entry),
            "DELETE FROM shop.customers WHERE _id = 1 AND name = 'Ana';"
        );
    }

    #[test]
    fn test_delete_single_predicate() {
        let entry = parse(r#"{"op":"d","ns":"shop.customers","o":{"_id":1}}"#).unwrap();
        assert_eq!(delete(&entry), "DELETE FROM shop.customers WHERE _id = 1;");
    }
}
