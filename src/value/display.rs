//! Display implementation for Value as SQL literals.

use super::Value;

impl core::fmt::Display for Value {
    /// Format a Value as a SQL literal.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => {
                if v.is_finite() {
                    write!(f, "{v}")
                } else {
                    // Unreachable from JSON input
                    write!(f, "NULL")
                }
            }
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "'{s}'"),
            Value::Other(json) => {
                let text = serde_json::to_string(json).map_err(|_| core::fmt::Error)?;
                write!(f, "'{text}'")
            }
        }
    }
}
