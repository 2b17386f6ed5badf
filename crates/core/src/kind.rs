//! Kind hierarchy with precomputed ancestry.
//!
//! Subtype checks happen for every member of every visited object, so the
//! ancestor set of each declared kind is resolved once up front.

use assetscope_api::KindDecl;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub struct KindHierarchy {
    /// kind -> itself plus every transitive base
    ancestry: HashMap<String, HashSet<String>>,
}

impl KindHierarchy {
    pub fn new(decls: &[KindDecl]) -> Self {
        let bases: HashMap<&str, Option<&str>> = decls
            .iter()
            .map(|d| (d.name.as_str(), d.base.as_deref()))
            .collect();

        let mut ancestry = HashMap::with_capacity(decls.len());
        for decl in decls {
            let mut chain = HashSet::new();
            let mut current = Some(decl.name.as_str());
            while let Some(kind) = current {
                // Stop on a declaration cycle
                if !chain.insert(kind.to_string()) {
                    break;
                }
                current = bases.get(kind).copied().flatten();
            }
            ancestry.insert(decl.name.clone(), chain);
        }

        Self { ancestry }
    }

    /// `true` if `kind` is `base` or derives from it. Undeclared kinds only
    /// match themselves.
    pub fn is_a(&self, kind: &str, base: &str) -> bool {
        if kind == base {
            return true;
        }
        self.ancestry
            .get(kind)
            .is_some_and(|chain| chain.contains(base))
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.ancestry.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ancestry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestry.is_empty()
    }
}
