//! Value coercion - raw column values to semantic values
//!
//! Resource tables have no fixed schema, so every column value read from
//! them is coerced into one of four kinds:
//! - `Number`: anything that parses as a 64-bit float
//! - `Boolean`: the literals `true` / `false`
//! - `String`: everything else, as text
//! - `Null`: SQL NULL
//!
//! Numeric parsing always wins over boolean parsing. Text is never trimmed,
//! so `" 42"` stays a string. BLOB columns are decoded as UTF-8 with invalid
//! sequences replaced by U+FFFD and then coerced like text.

use rusqlite::types::ValueRef;
use serde::Serialize;
use serde::ser::SerializeMap;

/// A coerced column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    String(String),
    Null,
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
            Value::Null => f.write_str("NULL"),
        }
    }
}

/// Coerce a raw SQLite column value.
///
/// Native integers and reals are numbers already; their textual form would
/// parse back to the same float, so no round trip through text is made.
pub fn coerce(raw: ValueRef<'_>) -> Value {
    match raw {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i as f64),
        ValueRef::Real(r) => Value::Number(r),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => coerce_bytes(bytes),
    }
}

/// Coerce a byte sequence, treating it as encoded text.
pub fn coerce_bytes(bytes: &[u8]) -> Value {
    coerce_text(&String::from_utf8_lossy(bytes))
}

/// Coerce a textual value: number first, then boolean, then string.
pub fn coerce_text(text: &str) -> Value {
    if let Ok(n) = text.parse::<f64>() {
        return Value::Number(n);
    }
    match text {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => Value::String(text.to_string()),
    }
}

/// One materialized row: column name to coerced value, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { fields: Vec::with_capacity(capacity) }
    }

    /// Set a column value, replacing an earlier value for the same column
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_become_numbers() {
        assert_eq!(coerce_text("42"), Value::Number(42.0));
        assert_eq!(coerce_text("-2.75"), Value::Number(-2.75));
        assert_eq!(coerce_text("1e3"), Value::Number(1000.0));
    }

    #[test]
    fn test_boolean_literals() {
        assert_eq!(coerce_text("true"), Value::Boolean(true));
        assert_eq!(coerce_text("false"), Value::Boolean(false));
        // Case-sensitive: anything else is plain text
        assert_eq!(coerce_text("TRUE"), Value::String("TRUE".to_string()));
    }

    #[test]
    fn test_numbers_win_over_booleans() {
        assert_eq!(coerce_text("1"), Value::Number(1.0));
        assert_eq!(coerce_text("0"), Value::Number(0.0));
    }

    #[test]
    fn test_text_edge_cases() {
        assert_eq!(coerce_text(""), Value::String(String::new()));
        assert_eq!(coerce_text(" 42"), Value::String(" 42".to_string()));
        assert_eq!(coerce_text("i-0abc"), Value::String("i-0abc".to_string()));
    }

    #[test]
    fn test_native_values() {
        assert_eq!(coerce(ValueRef::Null), Value::Null);
        assert_eq!(coerce(ValueRef::Integer(7)), Value::Number(7.0));
        assert_eq!(coerce(ValueRef::Real(2.5)), Value::Number(2.5));
        assert_eq!(coerce(ValueRef::Text(b"12.5")), Value::Number(12.5));
        assert_eq!(coerce(ValueRef::Blob(b"false")), Value::Boolean(false));
    }

    #[test]
    fn test_invalid_utf8_degrades_to_string() {
        let value = coerce_bytes(&[0x61, 0xff, 0x62]);
        assert_eq!(value, Value::String("a\u{fffd}b".to_string()));
    }

    #[test]
    fn test_record_serializes_in_column_order() {
        let mut record = Record::default();
        record.insert("id", Value::String("i-1".to_string()));
        record.insert("price", Value::Number(1.5));
        record.insert("spot", Value::Boolean(false));
        record.insert("tag", Value::Null);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"i-1","price":1.5,"spot":false,"tag":null}"#);
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["id", "price", "spot", "tag"]);
    }
}
