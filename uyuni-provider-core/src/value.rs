//! Value - Attribute values exchanged with the orchestrator
//!
//! Configuration values can be null (not set) or unknown (derived from a
//! resource that has not been applied yet), so plain Rust primitives are
//! not enough. `Value` carries both states explicitly and `Attributes`
//! wraps the name/value map every operation receives and returns.

use std::collections::HashMap;

/// A single attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// Explicitly absent (not set in configuration)
    Null,
    /// Depends on a value that has not been resolved yet
    Unknown,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// Named attribute values for one resource, data source or provider block
///
/// A key that was never inserted behaves like `Value::Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: HashMap<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set(key, value);
        self
    }

    /// Get a raw value; absent keys read as null
    pub fn get(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&Value::Null)
    }

    /// Get a string attribute value
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).as_str()
    }

    /// Get an integer attribute value
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).as_int()
    }

    /// Get a boolean attribute value
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).as_bool()
    }

    /// Get a list attribute value
    pub fn get_list(&self, key: &str) -> Option<&[Value]> {
        self.get(key).as_list()
    }

    /// True if the attribute is present but not yet resolved
    pub fn is_unknown(&self, key: &str) -> bool {
        self.get(key).is_unknown()
    }

    /// True if the attribute is absent or explicitly null
    pub fn is_null(&self, key: &str) -> bool {
        self.get(key).is_null()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_reads_as_null() {
        let attrs = Attributes::new();
        assert!(attrs.is_null("host"));
        assert!(!attrs.is_unknown("host"));
        assert_eq!(attrs.get_string("host"), None);
    }

    #[test]
    fn test_typed_accessors() {
        let attrs = Attributes::new()
            .with("login", Value::string("sgiertz"))
            .with("id", Value::Int(42))
            .with("enabled", Value::Bool(true));

        assert_eq!(attrs.get_string("login"), Some("sgiertz"));
        assert_eq!(attrs.get_int("id"), Some(42));
        assert_eq!(attrs.get_bool("enabled"), Some(true));
        // Wrong type reads as None
        assert_eq!(attrs.get_string("id"), None);
    }

    #[test]
    fn test_unknown_is_not_null() {
        let attrs = Attributes::new().with("host", Value::Unknown);
        assert!(attrs.is_unknown("host"));
        assert!(!attrs.is_null("host"));
        assert_eq!(attrs.get_string("host"), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut attrs = Attributes::new().with("email", Value::string("a@b.c"));
        attrs.set("email", Value::string("d@e.f"));
        assert_eq!(attrs.get_string("email"), Some("d@e.f"));
        assert_eq!(attrs.len(), 1);
    }
}
