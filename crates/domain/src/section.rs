//! Hierarchical key-value tree backing persistence sections.
//!
//! A [`SectionTree`] is plain data: named values plus named child sections.
//! Storage adapters share one tree behind a lock and hand out path-scoped
//! section handles over it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    String(String),
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Int(_) => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::String(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// One level of the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionTree {
    pub values: BTreeMap<String, Value>,
    pub sections: BTreeMap<String, SectionTree>,
}

impl SectionTree {
    /// Walk `path` without creating anything.
    #[must_use]
    pub fn node(&self, path: &[String]) -> Option<&SectionTree> {
        path.iter()
            .try_fold(self, |node, key| node.sections.get(key))
    }

    /// Walk `path`, creating missing sections on the way.
    pub fn node_mut(&mut self, path: &[String]) -> &mut SectionTree {
        path.iter().fold(self, |node, key| {
            node.sections.entry(key.clone()).or_default()
        })
    }
}
