//! Domain models shared by the flattening core and its collaborators.
//!
//! - [`Value`] - Tagged union for nested metadata (scalar, mapping, sequence)
//! - [`Record`] - One work/fileset's metadata, key order preserved
//! - [`SearchHit`] - A record as returned by the search backend (`_id` + `_source`)
//! - [`Row`] - One record's flattened cells, in requested-field order
//!
//! JSON is converted into [`Value`] exactly once, when a record is deserialized.
//! Everything downstream matches on the variants instead of probing shapes.

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::ops::Deref;

// =============================================================================
// Value
// =============================================================================

/// Ordered mapping used for nested metadata objects.
pub type Mapping = IndexMap<String, Value>;

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// Nested metadata value.
///
/// JSON `null` and absent keys both become [`Value::Missing`], which always
/// renders as an empty string.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Value {
    #[default]
    Missing,
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Vec<Value>),
}

impl Value {
    /// Shorthand for a string scalar.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// String contents of a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Value under `key` if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Elements of a sequence whose elements are all mappings.
    ///
    /// An empty sequence qualifies.
    pub fn as_mapping_sequence(&self) -> Option<Vec<&Mapping>> {
        match self {
            Value::Sequence(items) => items.iter().map(Value::as_mapping).collect(),
            _ => None,
        }
    }

    /// Missing, blank string, or an empty container.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Scalar(Scalar::String(s)) => s.trim().is_empty(),
            Value::Scalar(_) => false,
            Value::Mapping(m) => m.is_empty(),
            Value::Sequence(items) => items.is_empty(),
        }
    }

    /// Convert back to JSON, e.g. for rendering structures as text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Missing => serde_json::Value::Null,
            Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            Value::Scalar(Scalar::Number(n)) => serde_json::Value::Number(n.clone()),
            Value::Scalar(Scalar::String(s)) => serde_json::Value::String(s.clone()),
            Value::Mapping(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Value::Scalar(Scalar::Number(n)),
            serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

/// Text form of a value: empty for missing, plain text for scalars,
/// compact JSON for structures.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Scalar(s) => write!(f, "{}", s),
            Value::Mapping(_) | Value::Sequence(_) => write!(f, "{}", self.to_json()),
        }
    }
}

// =============================================================================
// Record
// =============================================================================

/// One work or fileset's metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Mapping,
}

impl Record {
    pub fn new(fields: Mapping) -> Self {
        Self { fields }
    }

    /// Build a record from a JSON object. Anything else yields an empty record.
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Mapping(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Top-level keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

// =============================================================================
// Search Hit
// =============================================================================

/// A single document from the search index.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchHit {
    /// Document id (`_id`).
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Document metadata (`_source`).
    #[serde(rename = "_source", default)]
    pub source: Record,
}

impl SearchHit {
    /// Ids listed under the record's `member_ids` field.
    pub fn member_ids(&self) -> Vec<&str> {
        self.source
            .get("member_ids")
            .and_then(Value::as_sequence)
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl AsRef<Record> for SearchHit {
    fn as_ref(&self) -> &Record {
        &self.source
    }
}

// =============================================================================
// Row
// =============================================================================

/// One record's flattened cells. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn into_cells(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Row {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}
