//! Canonical attribute values.
//!
//! [`Attributes`] is what the validation engine produces: a map from schema-declared
//! attribute names to typed [`AttributeValue`]s, kept in schema declaration order.
//! It serializes back to SCIM JSON, with binary values encoded as standard base64 and
//! timestamps as RFC 3339.

use crate::schema::attribute::fold;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Binary(Vec<u8>),
    DateTime(DateTime<FixedOffset>),
    Reference(String),
    Complex(Attributes),
    Multi(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Text content of string and reference values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) | AttributeValue::Reference(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&Attributes> {
        match self {
            AttributeValue::Complex(attributes) => Some(attributes),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::String(s) | AttributeValue::Reference(s) => Value::String(s.clone()),
            AttributeValue::Boolean(b) => Value::Bool(*b),
            AttributeValue::Integer(i) => Value::from(*i),
            AttributeValue::Decimal(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttributeValue::Binary(bytes) => Value::String(STANDARD.encode(bytes)),
            AttributeValue::DateTime(instant) => {
                Value::String(instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            AttributeValue::Complex(attributes) => attributes.to_json(),
            AttributeValue::Multi(values) => {
                Value::Array(values.iter().map(AttributeValue::to_json).collect())
            }
        }
    }

    /// Best-effort typing of untyped JSON, without a schema.
    ///
    /// Text stays text (binary and dateTime values are not recognized), integral
    /// numbers become integers, objects become complex values. Returns `None` for
    /// `null`. Used by collaborators that edit stored resources as JSON.
    pub fn infer(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Null => return None,
            Value::Bool(b) => AttributeValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttributeValue::Integer(i),
                None => AttributeValue::Decimal(n.as_f64()?),
            },
            Value::String(s) => AttributeValue::String(s.clone()),
            Value::Array(items) => {
                AttributeValue::Multi(items.iter().filter_map(AttributeValue::infer).collect())
            }
            Value::Object(map) => AttributeValue::Complex(Attributes::infer(map)),
        })
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttributeValue::String(s) | AttributeValue::Reference(s) => serializer.serialize_str(s),
            AttributeValue::Boolean(b) => serializer.serialize_bool(*b),
            AttributeValue::Integer(i) => serializer.serialize_i64(*i),
            AttributeValue::Decimal(d) => serializer.serialize_f64(*d),
            AttributeValue::Binary(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            AttributeValue::DateTime(instant) => serializer
                .serialize_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            AttributeValue::Complex(attributes) => attributes.serialize(serializer),
            AttributeValue::Multi(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

/// Ordered attribute map keyed by declared attribute name.
///
/// Lookups are case-insensitive; inserting a name that folds onto an existing entry
/// replaces that entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    entries: Vec<(String, AttributeValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        let name = name.into();
        let key = fold(&name);
        match self.entries.iter().position(|(n, _)| fold(n) == key) {
            Some(index) => self.entries[index] = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        let key = fold(name);
        self.entries
            .iter()
            .find(|(n, _)| fold(n) == key)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        let key = fold(name);
        let position = self.entries.iter().position(|(n, _)| fold(n) == key)?;
        Some(self.entries.remove(position).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Merge `other` into `self`, replacing entries with the same folded name.
    pub fn extend(&mut self, other: Attributes) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.to_json_map())
    }

    pub fn to_json_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }

    /// Schema-less typing of a JSON object. See [`AttributeValue::infer`].
    pub fn infer(map: &Map<String, Value>) -> Self {
        let mut attributes = Self::new();
        for (name, value) in map {
            if let Some(value) = AttributeValue::infer(value) {
                attributes.insert(name.clone(), value);
            }
        }
        attributes
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl From<Attributes> for Value {
    fn from(attributes: Attributes) -> Self {
        attributes.to_json()
    }
}

impl FromIterator<(String, AttributeValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}
