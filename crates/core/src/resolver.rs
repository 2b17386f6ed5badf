use crate::config::ScriptConfig;
use crate::kind::KindHierarchy;
use assetscope_api::{AssetId, Host, ObjectRef};
use tracing::trace;

/// Maps one referenced object to the canonical id of the asset it stands for.
pub struct ReferenceResolver<'a, H: Host + ?Sized> {
    host: &'a H,
    kinds: &'a KindHierarchy,
    scripts: &'a ScriptConfig,
}

impl<'a, H: Host + ?Sized> ReferenceResolver<'a, H> {
    pub fn new(host: &'a H, kinds: &'a KindHierarchy, scripts: &'a ScriptConfig) -> Self {
        Self {
            host,
            kinds,
            scripts,
        }
    }

    /// Best-effort resolution; anything that has no persisted identity
    /// yields `None`.
    pub fn resolve(&self, raw: ObjectRef, scene_context: bool) -> Option<AssetId> {
        let target = self.substitute(raw, scene_context)?;

        let Some(path) = self.host.path_of(target).filter(|p| !p.is_empty()) else {
            trace!("Dropping {}: not a stored object", target);
            return None;
        };

        let id = self.host.path_to_id(&path).filter(|id| !id.is_empty());
        if id.is_none() {
            trace!("Dropping {}: no id for {}", target, path);
        }
        id
    }

    fn substitute(&self, raw: ObjectRef, scene_context: bool) -> Option<ObjectRef> {
        let kind = self.host.kind_of(raw)?;

        // Behaviours and scriptable data stand for the script they run.
        if self.kinds.is_a(&kind, &self.scripts.behaviour_base)
            || self.kinds.is_a(&kind, &self.scripts.scriptable_base)
        {
            return self.host.backing_script_of(raw);
        }

        if scene_context {
            if let Some(origin) = self.host.origin_of(raw) {
                return Some(origin);
            }
        }

        Some(raw)
    }
}
