// Graph-side shapes: node identifiers, nodes and edges
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Person;

pub const PERSON_LABEL: &str = "person";
pub const FRIEND_RELATIONSHIP: &str = "FRIEND";

pub const PERSON_ID_KEY: &str = "person_id";
pub const NAME_KEY: &str = "name";
pub const SURNAME_KEY: &str = "surname";
pub const EMAIL_KEY: &str = "email";
pub const SINCE_KEY: &str = "since";

/// Internal identifier the database assigns to a node.
///
/// `NodeId::default()` (zero) is also what `know` yields when the statement
/// returned no record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    #[serde(rename = "ID")]
    pub id: i64,
}

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { id }
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub properties: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: i64,
    pub from: NodeId,
    pub to: NodeId,
    pub label: String,
    pub properties: HashMap<String, serde_json::Value>,
}

impl Node {
    #[inline]
    #[must_use]
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            properties: HashMap::new(),
        }
    }

    /// A `person` node carrying the person's fields.
    #[must_use]
    pub fn person(id: NodeId, person: &Person) -> Self {
        Self::new(id, PERSON_LABEL)
            .with_property(PERSON_ID_KEY, person.id().into())
            .with_property(NAME_KEY, person.firstname().into())
            .with_property(SURNAME_KEY, person.surname().into())
            .with_property(EMAIL_KEY, person.email().into())
    }

    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn person_id(&self) -> Option<&str> {
        self.properties.get(PERSON_ID_KEY).and_then(|v| v.as_str())
    }
}

impl Edge {
    #[inline]
    #[must_use]
    pub fn new(id: i64, from: NodeId, to: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            from,
            to,
            label: label.into(),
            properties: HashMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}
