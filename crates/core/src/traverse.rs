//! Object graph traversal.
//!
//! Three entry points, one per way an asset exposes its references:
//!
//! - [`ObjectGraphTraverser::traverse`]: members of a single composite
//! - [`ObjectGraphTraverser::traverse_hierarchy`]: a node, its attached
//!   components and all descendant nodes
//! - [`ObjectGraphTraverser::traverse_state_machine`]: the motions of every
//!   state of every layer

use crate::config::ScriptConfig;
use crate::error::{Result, ScanError};
use crate::ignore::IgnoreRules;
use crate::kind::KindHierarchy;
use crate::resolver::ReferenceResolver;
use assetscope_api::{AssetRecord, Host, MemberOrigin, ObjectRef};
use std::collections::HashSet;

pub struct ObjectGraphTraverser<'a, H: Host + ?Sized> {
    host: &'a H,
    rules: &'a IgnoreRules,
    resolver: ReferenceResolver<'a, H>,
}

impl<'a, H: Host + ?Sized> ObjectGraphTraverser<'a, H> {
    pub fn new(
        host: &'a H,
        kinds: &'a KindHierarchy,
        rules: &'a IgnoreRules,
        scripts: &'a ScriptConfig,
    ) -> Self {
        Self {
            host,
            rules,
            resolver: ReferenceResolver::new(host, kinds, scripts),
        }
    }

    /// Collect the references held by the members of `composite`.
    pub fn traverse(
        &self,
        composite: ObjectRef,
        record: &mut AssetRecord,
        scene_context: bool,
    ) -> Result<()> {
        let Some(kind) = self.host.kind_of(composite) else {
            return Ok(());
        };
        if self.rules.is_excluded_kind(&kind) {
            return Ok(());
        }

        let members = self
            .host
            .members(composite)
            .map_err(|source| ScanError::Members {
                object: format!("{kind} {composite}"),
                source,
            })?;

        for member in members {
            if member.origin == MemberOrigin::Property
                && self.rules.is_excluded_member(&kind, &member.name)
            {
                continue;
            }
            for candidate in member.value.candidates() {
                self.add(candidate, record, scene_context);
            }
        }

        Ok(())
    }

    /// Walk `root` depth-first: each node's components are recorded
    /// themselves, then traversed, then the node's children follow.
    pub fn traverse_hierarchy(
        &self,
        root: ObjectRef,
        record: &mut AssetRecord,
        scene_context: bool,
    ) -> Result<()> {
        let mut visited = HashSet::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }

            for component in self.host.components(node) {
                if !self.host.is_alive(component) {
                    continue;
                }
                self.add(component, record, scene_context);
                self.traverse(component, record, scene_context)?;
            }

            stack.extend(self.host.children(node).into_iter().rev());
        }

        Ok(())
    }

    /// State machines keep their motions below layers and states, out of
    /// reach of the container's own members.
    pub fn traverse_state_machine(&self, container: ObjectRef, record: &mut AssetRecord) {
        for layer in self.host.layers(container) {
            for state in self.host.states(layer) {
                if let Some(motion) = self.host.motion_of(state) {
                    self.add(motion, record, false);
                }
            }
        }
    }

    fn add(&self, candidate: ObjectRef, record: &mut AssetRecord, scene_context: bool) {
        if let Some(id) = self.resolver.resolve(candidate, scene_context) {
            record.add_reference(id);
        }
    }
}
