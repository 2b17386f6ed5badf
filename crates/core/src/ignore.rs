//! Traversal pruning rules.

use crate::config::IgnoreConfig;
use crate::kind::KindHierarchy;
use std::collections::{HashMap, HashSet};

/// Immutable exclusion tables, resolved against a [`KindHierarchy`] once.
#[derive(Debug, Default, Clone)]
pub struct IgnoreRules {
    kinds: HashSet<String>,
    members: HashMap<String, HashSet<String>>,
}

impl IgnoreRules {
    /// Rules that exclude nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn compile(config: &IgnoreConfig, hierarchy: &KindHierarchy) -> Self {
        let mut rules = Self::default();

        // A rule always matches its own kind name, declared or not.
        for rule in &config.kinds {
            rules.kinds.insert(rule.kind.clone());
        }
        for rule in &config.members {
            rules
                .members
                .entry(rule.kind.clone())
                .or_default()
                .insert(rule.member.clone());
        }

        for kind in hierarchy.kinds() {
            if config
                .kinds
                .iter()
                .any(|r| r.include_subtypes && hierarchy.is_a(kind, &r.kind))
            {
                rules.kinds.insert(kind.to_string());
            }

            let inherited: Vec<&str> = config
                .members
                .iter()
                .filter(|r| r.include_subtypes && hierarchy.is_a(kind, &r.kind))
                .map(|r| r.member.as_str())
                .collect();
            if !inherited.is_empty() {
                rules
                    .members
                    .entry(kind.to_string())
                    .or_default()
                    .extend(inherited.into_iter().map(str::to_string));
            }
        }

        rules
    }

    pub fn is_excluded_kind(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    pub fn is_excluded_member(&self, kind: &str, member: &str) -> bool {
        self.members
            .get(kind)
            .is_some_and(|names| names.contains(member))
    }
}
