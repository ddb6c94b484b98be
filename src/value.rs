//! SQL value classification for oplog document fields.
//!
//! JSON field values map onto a small closed set of SQL-facing categories.
//! The category decides both the literal rendering (the `Display`
//! implementation in this module's `display` submodule) and the column type
//! used in generated DDL.
//!
//! Classification is infallible: shapes with no scalar SQL category (arrays,
//! nested documents, numbers outside `i64`/`f64`) land in [`Value::Other`]
//! and are carried as their JSON text.
//!
//! # Example
//!
//! ```
//! use oplog2sql::value::Value;
//!
//! let value = Value::from("Ana");
//! assert_eq!(value.to_string(), "'Ana'");
//! assert_eq!(value.sql_type(), "VARCHAR(255)");
//! ```

use alloc::string::{String, ToString};

/// A document field value classified for SQL output.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Signed 64-bit integer.
    Integer(i64),
    /// IEEE 754 floating point.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// UTF-8 text.
    Text(String),
    /// Any JSON shape with no scalar SQL category.
    Other(serde_json::Value),
}

impl Value {
    /// The column type used for this value in generated DDL.
    ///
    /// # Example
    ///
    /// ```
    /// use oplog2sql::value::Value;
    ///
    /// assert_eq!(Value::Integer(7).sql_type(), "INTEGER");
    /// assert_eq!(Value::Boolean(true).sql_type(), "BOOLEAN");
    /// assert_eq!(Value::Null.sql_type(), "VARCHAR(255)");
    /// ```
    #[must_use]
    pub const fn sql_type(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Boolean(_) => "BOOLEAN",
            Self::Null | Self::Text(_) | Self::Other(_) => "VARCHAR(255)",
        }
    }
}

/// Classify a JSON value.
///
/// Numbers try `i64` first and fall back to `f64`; values representable as
/// neither (only possible with `serde_json`'s arbitrary-precision feature)
/// join arrays and objects in [`Value::Other`].
impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    Self::Other(json.clone())
                }
            }
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Self::Other(json.clone()),
        }
    }
}

// From implementations for common types
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// The DDL column definition type for a field.
///
/// Fields named `_id` are the replicated primary key and get the
/// `PRIMARY KEY` suffix appended to whatever base type the value infers.
///
/// # Example
///
/// ```
/// use oplog2sql::value::{Value, column_type};
///
/// assert_eq!(column_type("_id", &Value::Integer(1)), "INTEGER PRIMARY KEY");
/// assert_eq!(column_type("name", &Value::from("Ana")), "VARCHAR(255)");
/// ```
#[must_use]
pub fn column_type(field: &str, value: &Value) -> String {
    if field == "_id" {
        alloc::format!("{} PRIMARY KEY", value.sql_type())
    } else {
        value.sql_type().to_string()
    }
}

mod display;

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(json: &str) -> Value {
        Value::from(&serde_json::from_str::<serde_json::Value>(json).unwrap())
    }

    // ========================================================================
    // Classification tests
    // ========================================================================

    #[test]
    fn test_classify_scalars() {
        assert_eq!(classify("null"), Value::Null);
        assert_eq!(classify("true"), Value::Boolean(true));
        assert_eq!(classify("42"), Value::Integer(42));
        assert_eq!(classify("-7"), Value::Integer(-7));
        assert_eq!(classify("44.5"), Value::Float(44.5));
        assert_eq!(classify(r#""Ana""#), Value::Text("Ana".to_string()));
    }

    #[test]
    fn test_classify_nested_shapes_as_other() {
        assert!(matches!(classify("[1,2,3]"), Value::Other(_)));
        assert!(matches!(classify(r#"{"street":"Main"}"#), Value::Other(_)));
    }

    #[test]
    fn test_classify_large_unsigned_as_float() {
        // Beyond i64 but still an f64
        assert!(matches!(classify("18446744073709551615"), Value::Float(_)));
    }

    // ========================================================================
    // Literal rendering tests
    // ========================================================================

    #[test]
    fn test_literal_rendering() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Float(44.5).to_string(), "44.5");
        assert_eq!(Value::Float(5.0).to_string(), "5");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::from("Ana").to_string(), "'Ana'");
    }

    #[test]
    fn test_text_is_not_escaped() {
        assert_eq!(Value::from("O'Hara").to_string(), "'O'Hara'");
    }

    #[test]
    fn test_other_renders_compact_json() {
        assert_eq!(classify("[1, 2, 3]").to_string(), "'[1,2,3]'");
        assert_eq!(
            classify(r#"{"city": "Lisbon", "street": "Main"}"#).to_string(),
            r#"'{"city":"Lisbon","street":"Main"}'"#
        );
    }

    #[test]
    fn test_non_finite_floats_render_null() {
        assert_eq!(Value::Float(f64::NAN).to_string(), "NULL");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "NULL");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "NULL");
    }

    // ========================================================================
    // Type inference tests
    // ========================================================================

    #[test]
    fn test_sql_types() {
        assert_eq!(classify("42").sql_type(), "INTEGER");
        assert_eq!(classify("44.5").sql_type(), "FLOAT");
        assert_eq!(classify("true").sql_type(), "BOOLEAN");
        assert_eq!(classify(r#""Ana""#).sql_type(), "VARCHAR(255)");
        assert_eq!(classify("null").sql_type(), "VARCHAR(255)");
        assert_eq!(classify("[1]").sql_type(), "VARCHAR(255)");
    }

    #[test]
    fn test_id_column_is_primary_key() {
        assert_eq!(column_type("_id", &Value::Integer(1)), "INTEGER PRIMARY KEY");
        assert_eq!(
            column_type("_id", &Value::from("u-1")),
            "VARCHAR(255) PRIMARY KEY"
        );
        assert_eq!(column_type("name", &Value::from("Ana")), "VARCHAR(255)");
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(7i64), Value::Integer(7));
        assert_eq!(Value::from(7i32), Value::Integer(7));
        assert_eq!(Value::from(0.5), Value::Float(0.5));
        assert_eq!(Value::from(false), Value::Boolean(false));
        assert_eq!(Value::from(Some(3i64)), Value::Integer(3));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
