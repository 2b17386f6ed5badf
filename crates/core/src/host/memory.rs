//! In-memory host loaded from a JSON manifest.
//!
//! ## Manifest shape
//!
//! ```json
//! {
//!   "kinds":   [{ "name": "MeshRenderer", "base": "Renderer" }],
//!   "assets":  [{ "path": "Assets/Hero.prefab", "id": "1f2e", "main": "hero" }],
//!   "objects": {
//!     "hero":      { "kind": "GameObject", "asset": "Assets/Hero.prefab",
//!                    "components": ["hero_mesh"], "children": [] },
//!     "hero_mesh": { "kind": "MeshRenderer", "asset": "Assets/Hero.prefab",
//!                    "members": [{ "name": "sharedMaterial", "value": "skin" }] }
//!   },
//!   "scenes":  { "Assets/Main.unity": ["hero_in_scene"] }
//! }
//! ```
//!
//! Objects without an `asset` exist in memory only and resolve to nothing.

use crate::error::{Result, ScanError};
use assetscope_api::{
    AssetId, AssetLoader, HostError, HostResult, IdentityService, Instantiator, KindDecl, Member,
    MemberOrigin, MemberValue, ObjectModel, ObjectRef, PrefabLinks, SceneEnvironment, ScriptLinks,
    StateMachines,
};
use dashmap::DashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

// ==================== Manifest ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub kinds: Vec<KindDecl>,
    #[serde(default)]
    pub assets: Vec<AssetSpec>,
    #[serde(default)]
    pub objects: IndexMap<String, ObjectSpec>,
    #[serde(default)]
    pub scenes: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSpec {
    pub path: String,
    pub id: String,
    /// Key of the object `load_asset` returns.
    #[serde(default)]
    pub main: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectSpec {
    pub kind: String,
    pub asset: Option<String>,
    pub members: Vec<MemberSpec>,
    pub components: Vec<String>,
    pub children: Vec<String>,
    pub origin: Option<String>,
    pub script: Option<String>,
    pub layers: Vec<String>,
    pub states: Vec<String>,
    pub motion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSpec {
    pub name: String,
    #[serde(default = "default_origin")]
    pub origin: MemberOrigin,
    #[serde(default)]
    pub value: Option<ValueSpec>,
    /// `false` for members whose declared kind cannot hold a reference.
    #[serde(default = "default_true")]
    pub reference: bool,
    /// Makes the accessor fail with this message.
    #[serde(default)]
    pub error: Option<String>,
}

fn default_origin() -> MemberOrigin {
    MemberOrigin::Property
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    One(String),
    Many(Vec<Option<String>>),
}

// ==================== Host ====================

#[derive(Debug, Clone)]
struct Node {
    kind: String,
    asset: Option<String>,
    members: Vec<NodeMember>,
    components: Vec<ObjectRef>,
    children: Vec<ObjectRef>,
    origin: Option<ObjectRef>,
    script: Option<ObjectRef>,
    layers: Vec<ObjectRef>,
    states: Vec<ObjectRef>,
    motion: Option<ObjectRef>,
}

#[derive(Debug, Clone)]
struct NodeMember {
    name: String,
    origin: MemberOrigin,
    value: MemberValue,
    error: Option<String>,
}

pub struct MemoryHost {
    kinds: Vec<KindDecl>,
    ids: HashMap<String, AssetId>,
    /// path -> main object, in manifest order
    assets: IndexMap<String, Option<ObjectRef>>,
    stored: Vec<Arc<Node>>,
    keys: HashMap<String, ObjectRef>,
    scenes: HashMap<String, Vec<ObjectRef>>,
    live: DashMap<ObjectRef, Arc<Node>>,
    /// instance root -> every live object created with it
    instances: DashMap<ObjectRef, Vec<ObjectRef>>,
    next_live: AtomicU64,
    active_scene: RwLock<Option<String>>,
}

impl MemoryHost {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)?;
        Self::from_manifest(manifest)
    }

    pub fn from_manifest(manifest: Manifest) -> Result<Self> {
        let keys: HashMap<String, ObjectRef> = manifest
            .objects
            .keys()
            .enumerate()
            .map(|(i, key)| (key.clone(), ObjectRef(i as u64)))
            .collect();

        let lookup = |key: &str, context: &str| -> Result<ObjectRef> {
            keys.get(key)
                .copied()
                .ok_or_else(|| ScanError::Manifest(format!("{context} names unknown object `{key}`")))
        };
        let lookup_all = |list: &[String], context: &str| -> Result<Vec<ObjectRef>> {
            list.iter().map(|key| lookup(key, context)).collect()
        };

        let mut stored = Vec::with_capacity(manifest.objects.len());
        for (key, spec) in &manifest.objects {
            let members = spec
                .members
                .iter()
                .map(|m| -> Result<NodeMember> {
                    let context = format!("member `{}` of `{key}`", m.name);
                    let value = if !m.reference {
                        MemberValue::Opaque
                    } else {
                        match &m.value {
                            None => MemberValue::Null,
                            Some(ValueSpec::One(target)) => MemberValue::Object(lookup(target, &context)?),
                            Some(ValueSpec::Many(items)) => MemberValue::Collection(
                                items
                                    .iter()
                                    .map(|item| item.as_deref().map(|t| lookup(t, &context)).transpose())
                                    .collect::<Result<Vec<_>>>()?,
                            ),
                        }
                    };
                    Ok(NodeMember {
                        name: m.name.clone(),
                        origin: m.origin,
                        value,
                        error: m.error.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let context = format!("object `{key}`");
            stored.push(Arc::new(Node {
                kind: spec.kind.clone(),
                asset: spec.asset.clone().filter(|p| !p.is_empty()),
                members,
                components: lookup_all(&spec.components, &context)?,
                children: lookup_all(&spec.children, &context)?,
                origin: spec.origin.as_deref().map(|k| lookup(k, &context)).transpose()?,
                script: spec.script.as_deref().map(|k| lookup(k, &context)).transpose()?,
                layers: lookup_all(&spec.layers, &context)?,
                states: lookup_all(&spec.states, &context)?,
                motion: spec.motion.as_deref().map(|k| lookup(k, &context)).transpose()?,
            }));
        }

        let mut ids = HashMap::with_capacity(manifest.assets.len());
        let mut assets = IndexMap::with_capacity(manifest.assets.len());
        for asset in &manifest.assets {
            let context = format!("asset `{}`", asset.path);
            let main = asset.main.as_deref().map(|k| lookup(k, &context)).transpose()?;
            ids.insert(asset.path.clone(), AssetId::new(asset.id.clone()));
            assets.insert(asset.path.clone(), main);
        }

        let scenes = manifest
            .scenes
            .iter()
            .map(|(path, roots)| -> Result<(String, Vec<ObjectRef>)> {
                Ok((path.clone(), lookup_all(roots, &format!("scene `{path}`"))?))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            kinds: manifest.kinds,
            ids,
            assets,
            next_live: AtomicU64::new(stored.len() as u64),
            stored,
            keys,
            scenes,
            live: DashMap::new(),
            instances: DashMap::new(),
            active_scene: RwLock::new(None),
        })
    }

    /// Handle of the manifest object named `key`.
    pub fn object(&self, key: &str) -> Option<ObjectRef> {
        self.keys.get(key).copied()
    }

    /// Every asset path, in manifest order.
    pub fn asset_paths(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }

    /// Live objects created by `instantiate` and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn active_scene(&self) -> Option<String> {
        self.active_scene.read().ok().and_then(|s| s.clone())
    }

    fn node(&self, obj: ObjectRef) -> Option<Arc<Node>> {
        match self.stored.get(obj.0 as usize) {
            Some(node) => Some(node.clone()),
            None => self.live.get(&obj).map(|n| Arc::clone(n.value())),
        }
    }

    fn collect_subtree(&self, root: ObjectRef, out: &mut Vec<ObjectRef>) {
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(obj) = stack.pop() {
            if !seen.insert(obj) {
                continue;
            }
            out.push(obj);
            if let Some(node) = self.node(obj) {
                for &component in &node.components {
                    if seen.insert(component) {
                        out.push(component);
                    }
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }
}

impl IdentityService for MemoryHost {
    fn path_to_id(&self, path: &str) -> Option<AssetId> {
        self.ids.get(path).cloned()
    }

    fn path_of(&self, obj: ObjectRef) -> Option<String> {
        self.node(obj).and_then(|n| n.asset.clone())
    }
}

impl AssetLoader for MemoryHost {
    fn load_asset(&self, path: &str) -> HostResult<ObjectRef> {
        match self.assets.get(path) {
            Some(Some(main)) => Ok(*main),
            Some(None) => Err(HostError::Load {
                path: path.to_string(),
                reason: "asset has no main object".to_string(),
            }),
            None => Err(HostError::NotFound(path.to_string())),
        }
    }
}

impl Instantiator for MemoryHost {
    fn instantiate(&self, handle: ObjectRef) -> HostResult<ObjectRef> {
        if self.node(handle).is_none() {
            return Err(HostError::Instantiate(handle.to_string()));
        }

        let mut subtree = Vec::new();
        self.collect_subtree(handle, &mut subtree);

        let remap: HashMap<ObjectRef, ObjectRef> = subtree
            .iter()
            .map(|&old| (old, ObjectRef(self.next_live.fetch_add(1, Ordering::Relaxed))))
            .collect();
        let map = |obj: ObjectRef| remap.get(&obj).copied().unwrap_or(obj);

        for &old in &subtree {
            let Some(source) = self.node(old) else {
                continue;
            };
            let members = source
                .members
                .iter()
                .map(|m| NodeMember {
                    value: match &m.value {
                        MemberValue::Object(obj) => MemberValue::Object(map(*obj)),
                        MemberValue::Collection(items) => {
                            MemberValue::Collection(items.iter().map(|i| i.map(map)).collect())
                        }
                        other => other.clone(),
                    },
                    ..m.clone()
                })
                .collect();

            let copy = Node {
                kind: source.kind.clone(),
                asset: None,
                members,
                components: source.components.iter().copied().map(map).collect(),
                children: source.children.iter().copied().map(map).collect(),
                origin: Some(old),
                script: source.script,
                layers: source.layers.clone(),
                states: source.states.clone(),
                motion: source.motion,
            };
            self.live.insert(map(old), Arc::new(copy));
        }

        let root = map(handle);
        self.instances
            .insert(root, subtree.iter().map(|&old| map(old)).collect());
        debug!("Instantiated {} as {} ({} objects)", handle, root, subtree.len());
        Ok(root)
    }

    fn release(&self, instance: ObjectRef) {
        if let Some((_, objects)) = self.instances.remove(&instance) {
            for obj in objects {
                self.live.remove(&obj);
            }
        }
    }
}

impl SceneEnvironment for MemoryHost {
    fn open_container(&self, path: &str) -> bool {
        if !self.scenes.contains_key(path) {
            return false;
        }
        match self.active_scene.write() {
            Ok(mut active) => {
                *active = Some(path.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn top_level_nodes(&self) -> Vec<ObjectRef> {
        self.active_scene()
            .and_then(|path| self.scenes.get(&path).cloned())
            .unwrap_or_default()
    }
}

impl PrefabLinks for MemoryHost {
    fn origin_of(&self, obj: ObjectRef) -> Option<ObjectRef> {
        self.node(obj).and_then(|n| n.origin)
    }
}

impl ScriptLinks for MemoryHost {
    fn backing_script_of(&self, obj: ObjectRef) -> Option<ObjectRef> {
        self.node(obj).and_then(|n| n.script)
    }
}

impl StateMachines for MemoryHost {
    fn layers(&self, container: ObjectRef) -> Vec<ObjectRef> {
        self.node(container).map(|n| n.layers.clone()).unwrap_or_default()
    }

    fn states(&self, layer: ObjectRef) -> Vec<ObjectRef> {
        self.node(layer).map(|n| n.states.clone()).unwrap_or_default()
    }

    fn motion_of(&self, state: ObjectRef) -> Option<ObjectRef> {
        self.node(state).and_then(|n| n.motion)
    }
}

impl ObjectModel for MemoryHost {
    fn kind_decls(&self) -> Vec<KindDecl> {
        self.kinds.clone()
    }

    fn kind_of(&self, obj: ObjectRef) -> Option<String> {
        self.node(obj).map(|n| n.kind.clone())
    }

    fn members(&self, obj: ObjectRef) -> HostResult<Vec<Member>> {
        let node = self.node(obj).ok_or(HostError::StaleHandle(obj.0))?;
        node.members
            .iter()
            .map(|m| match &m.error {
                Some(reason) => Err(HostError::Accessor {
                    kind: node.kind.clone(),
                    member: m.name.clone(),
                    reason: reason.clone(),
                }),
                None => Ok(Member {
                    name: m.name.clone(),
                    origin: m.origin,
                    value: m.value.clone(),
                }),
            })
            .collect()
    }

    fn components(&self, node: ObjectRef) -> Vec<ObjectRef> {
        self.node(node).map(|n| n.components.clone()).unwrap_or_default()
    }

    fn children(&self, node: ObjectRef) -> Vec<ObjectRef> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn host() -> MemoryHost {
        let manifest = json!({
            "kinds": [{ "name": "GameObject" }, { "name": "MeshRenderer" }, { "name": "Material" }],
            "assets": [
                { "path": "Assets/A.prefab", "id": "a", "main": "a_root" },
                { "path": "Assets/X.mat", "id": "x", "main": "x" },
                { "path": "Assets/Empty.asset", "id": "e" }
            ],
            "objects": {
                "a_root": { "kind": "GameObject", "asset": "Assets/A.prefab",
                            "components": ["a_mr"], "children": ["a_child"] },
                "a_child": { "kind": "GameObject", "asset": "Assets/A.prefab", "components": ["a_child_mr"] },
                "a_mr": { "kind": "MeshRenderer", "asset": "Assets/A.prefab",
                          "members": [
                              { "name": "sharedMaterial", "value": "x" },
                              { "name": "probeAnchor", "origin": "field", "value": "a_child" }
                          ] },
                "a_child_mr": { "kind": "MeshRenderer", "asset": "Assets/A.prefab",
                                "members": [{ "name": "materials", "value": ["x", null] }] },
                "x": { "kind": "Material", "asset": "Assets/X.mat" },
                "broken": { "kind": "MeshRenderer",
                            "members": [{ "name": "bounds", "error": "not in play mode" }] }
            },
            "scenes": { "Assets/B.unity": ["a_root"] }
        });
        MemoryHost::from_json(&manifest.to_string()).unwrap()
    }

    #[test]
    fn test_identity_and_loading() {
        let host = host();
        assert_eq!(host.path_to_id("Assets/X.mat"), Some(AssetId::from("x")));
        assert!(host.id_exists("Assets/A.prefab"));
        assert!(!host.id_exists("Assets/Missing.mat"));
        assert_eq!(host.load_asset("Assets/X.mat").unwrap(), host.object("x").unwrap());
        assert!(matches!(host.load_asset("Assets/Missing.mat"), Err(HostError::NotFound(_))));
        assert!(matches!(host.load_asset("Assets/Empty.asset"), Err(HostError::Load { .. })));
    }

    #[test]
    fn test_member_values() {
        let host = host();
        let members = host.members(host.object("a_child_mr").unwrap()).unwrap();
        assert_eq!(
            members[0].value,
            MemberValue::Collection(vec![host.object("x"), None])
        );
    }

    #[test]
    fn test_failing_accessor() {
        let host = host();
        let err = host.members(host.object("broken").unwrap()).unwrap_err();
        assert!(matches!(err, HostError::Accessor { .. }));
    }

    #[test]
    fn test_instantiate_copies_and_remaps() {
        let host = host();
        let root = host.object("a_root").unwrap();
        let instance = host.instantiate(root).unwrap();
        assert_eq!(host.live_count(), 4);

        assert_eq!(host.path_of(instance), None);
        assert_eq!(host.origin_of(instance), Some(root));

        let renderer = host.components(instance)[0];
        assert_ne!(renderer, host.object("a_mr").unwrap());
        let members = host.members(renderer).unwrap();
        // External references survive, internal ones point into the copy
        assert_eq!(members[0].value, MemberValue::Object(host.object("x").unwrap()));
        assert_eq!(members[1].value, MemberValue::Object(host.children(instance)[0]));

        host.release(instance);
        assert_eq!(host.live_count(), 0);
        assert!(!host.is_alive(renderer));
    }

    #[test]
    fn test_open_container() {
        let host = host();
        assert!(host.top_level_nodes().is_empty());
        assert!(!host.open_container("Assets/Missing.unity"));
        assert!(host.open_container("Assets/B.unity"));
        assert_eq!(host.top_level_nodes(), vec![host.object("a_root").unwrap()]);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let manifest = json!({
            "objects": { "a": { "kind": "GameObject", "children": ["ghost"] } }
        });
        let err = MemoryHost::from_json(&manifest.to_string()).err().unwrap();
        assert!(matches!(err, ScanError::Manifest(_)));
    }
}
