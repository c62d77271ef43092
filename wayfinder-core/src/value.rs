//! Typed values captured from URL placeholders.

use std::{collections::HashMap, fmt};
use uuid::Uuid;

/// A value captured by a placeholder segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Raw text (`<key>` without a kind, or `<string:key>`).
    String(String),
    /// `<int:key>`.
    Int(i64),
    /// `<float:key>`.
    Float(f64),
    /// `<uuid:key>`.
    Uuid(Uuid),
    /// `<path:key>`: every remaining segment joined with `/`.
    Path(String),
}

impl Value {
    /// The text of a `String` or `Path` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Path(s) => Some(s),
            _ => None,
        }
    }

    /// The integer of an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The number of a `Float` value; `Int` values widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The UUID of a `Uuid` value.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(u) => Some(*u),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::Path(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Uuid(u) => write!(f, "{u}"),
        }
    }
}

/// Placeholder key to captured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchValues {
    values: HashMap<String, Value>,
}

impl MatchValues {
    /// Create an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. A repeated key overwrites the earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Get the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a text value (`String` or `Path`).
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Get an integer value.
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    /// Get a numeric value.
    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    /// Get a UUID value.
    pub fn uuid(&self, key: &str) -> Option<Uuid> {
        self.get(key).and_then(Value::as_uuid)
    }

    /// Whether a key was captured.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over captured keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate over captured pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of captured values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for MatchValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
