use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an object owned by the host.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub u64);

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A kind declared by the host, with its direct base kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KindDecl {
    pub name: String,
    #[serde(default)]
    pub base: Option<String>,
}

impl KindDecl {
    pub fn new(name: impl Into<String>, base: Option<&str>) -> Self {
        Self {
            name: name.into(),
            base: base.map(str::to_string),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MemberOrigin {
    Field,
    Property,
}

/// Runtime value of a reference-bearing member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValue {
    Null,
    Object(ObjectRef),
    /// Array-like value; `None` entries are null elements.
    Collection(Vec<Option<ObjectRef>>),
    /// Value of a kind that cannot hold asset references.
    Opaque,
}

impl MemberValue {
    /// Non-null candidates carried by this value, in element order.
    pub fn candidates(&self) -> Vec<ObjectRef> {
        match self {
            MemberValue::Object(obj) => vec![*obj],
            MemberValue::Collection(items) => items.iter().flatten().copied().collect(),
            MemberValue::Null | MemberValue::Opaque => Vec::new(),
        }
    }
}

/// One named member exposed by a composite object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub origin: MemberOrigin,
    pub value: MemberValue,
}

impl Member {
    pub fn field(name: impl Into<String>, value: MemberValue) -> Self {
        Self {
            name: name.into(),
            origin: MemberOrigin::Field,
            value,
        }
    }

    pub fn property(name: impl Into<String>, value: MemberValue) -> Self {
        Self {
            name: name.into(),
            origin: MemberOrigin::Property,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_candidates_drop_nulls() {
        let value = MemberValue::Collection(vec![Some(ObjectRef(1)), None, Some(ObjectRef(3))]);
        assert_eq!(value.candidates(), vec![ObjectRef(1), ObjectRef(3)]);
    }

    #[test]
    fn test_opaque_has_no_candidates() {
        assert!(MemberValue::Opaque.candidates().is_empty());
        assert!(MemberValue::Null.candidates().is_empty());
    }
}
