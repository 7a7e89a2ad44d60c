//! Delta operation model
//!
//! A delta is an ordered list of insert operations. Each operation carries either
//! literal text (which may contain line breaks) or an opaque embed value, plus an
//! ordered set of formatting attributes.
//!
//! The JSON shape follows the usual rich text editor convention:
//!
//! ```text
//! { "ops": [
//!     { "insert": "Hello, " },
//!     { "insert": "World!", "attributes": { "bold": true } },
//!     { "insert": 1, "attributes": { "image": "http://example.com/a.gif" } },
//!     { "insert": "\n", "attributes": { "list": true } }
//! ] }
//! ```
//!
//! Only inserts can be converted. Operations without an `insert` (retain, delete)
//! still deserialize, so the converter can reject them with their position.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Content of an insert operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    /// Literal text, possibly containing `\n` line breaks
    Text(String),
    /// Any non-string value (image reference, formula, ...), treated as one atomic unit
    Embed(Value),
}

/// Formatting attributes of an operation, in the order they were written.
///
/// Application order of formats follows this order, so it is kept explicitly
/// instead of relying on map iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Map<String, Value>>", into = "Map<String, Value>")]
pub struct Attributes(Vec<(String, Value)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder form of [`Attributes::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set an attribute. An existing attribute keeps its position and gets the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Option<Map<String, Value>>> for Attributes {
    fn from(map: Option<Map<String, Value>>) -> Self {
        Self(map.map(|map| map.into_iter().collect()).unwrap_or_default())
    }
}

impl From<Attributes> for Map<String, Value> {
    fn from(attributes: Attributes) -> Self {
        attributes.0.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

/// A single delta operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// `None` when the operation is not an insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert: Option<Insert>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Operation {
    /// Text insert without attributes
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            insert: Some(Insert::Text(text.into())),
            attributes: Attributes::new(),
        }
    }

    /// Embed insert without attributes
    pub fn embed(value: impl Into<Value>) -> Self {
        Self {
            insert: Some(Insert::Embed(value.into())),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// An ordered list of operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DeltaRepr")]
pub struct Delta {
    pub ops: Vec<Operation>,
}

/// Accepted input shapes: `{"ops": [...]}` or a bare array of operations
#[derive(Deserialize)]
#[serde(untagged)]
enum DeltaRepr {
    Wrapped { ops: Vec<Operation> },
    Bare(Vec<Operation>),
}

impl From<DeltaRepr> for Delta {
    fn from(repr: DeltaRepr) -> Self {
        match repr {
            DeltaRepr::Wrapped { ops } | DeltaRepr::Bare(ops) => Delta { ops },
        }
    }
}

impl Delta {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Decode a delta from JSON text
    pub fn from_json(source: &str) -> Result<Self, ConvertError> {
        Ok(serde_json::from_str(source)?)
    }
}

impl From<Vec<Operation>> for Delta {
    fn from(ops: Vec<Operation>) -> Self {
        Self { ops }
    }
}
