use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical, rename-stable identifier of a stored asset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AssetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// How an input asset is entered by the builder.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Reusable prefabricated hierarchy, scanned through a transient instance.
    Structure,
    /// Scene container, scanned by opening it in the host environment.
    Scene,
    /// State-machine container, scanned layer by layer.
    StateMachine,
    Generic,
}

/// References gathered for one input asset.
///
/// `references` is a set: duplicates, empty ids and the record's own id are
/// rejected on insert.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub path: String,
    pub id: AssetId,
    pub references: IndexSet<AssetId>,
}

impl AssetRecord {
    pub fn new(path: impl Into<String>, id: AssetId) -> Self {
        Self {
            path: path.into(),
            id,
            references: IndexSet::new(),
        }
    }

    /// Adds a reference, returning `true` if it was not already present.
    pub fn add_reference(&mut self, id: AssetId) -> bool {
        if id.is_empty() || id == self.id {
            return false;
        }
        self.references.insert(id)
    }

    pub fn has_reference(&self, id: &AssetId) -> bool {
        self.references.contains(id)
    }
}
