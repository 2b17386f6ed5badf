//! Contracts the scanner expects from the host environment.
//!
//! The scanner never loads, opens or instantiates anything itself; every
//! interaction with stored content goes through these traits. A host
//! implements all of them and gets [`Host`] for free.

use crate::error::HostResult;
use crate::models::{AssetId, KindDecl, Member, ObjectRef};

/// Canonical path <-> identifier mapping.
pub trait IdentityService: Send + Sync {
    /// Canonical identifier of the asset stored at `path`, if any.
    fn path_to_id(&self, path: &str) -> Option<AssetId>;

    fn id_exists(&self, path: &str) -> bool {
        self.path_to_id(path).is_some()
    }

    /// Storage path of the asset `obj` belongs to. `None` (or an empty path)
    /// means the object only exists in memory.
    fn path_of(&self, obj: ObjectRef) -> Option<String>;
}

pub trait AssetLoader: Send + Sync {
    /// Load the main object stored at `path` without touching the live
    /// environment.
    fn load_asset(&self, path: &str) -> HostResult<ObjectRef>;
}

/// Creation and teardown of transient, hidden, non-persisted copies.
pub trait Instantiator: Send + Sync {
    fn instantiate(&self, handle: ObjectRef) -> HostResult<ObjectRef>;
    fn release(&self, instance: ObjectRef);
}

/// The live environment holding one active scene container.
pub trait SceneEnvironment: Send + Sync {
    fn open_container(&self, path: &str) -> bool;
    fn top_level_nodes(&self) -> Vec<ObjectRef>;
}

pub trait PrefabLinks: Send + Sync {
    /// Source object of a scene-placed instanced copy, or `None` if `obj`
    /// is not part of an instance.
    fn origin_of(&self, obj: ObjectRef) -> Option<ObjectRef>;
}

pub trait ScriptLinks: Send + Sync {
    /// The script asset backing a behaviour or scriptable instance.
    fn backing_script_of(&self, obj: ObjectRef) -> Option<ObjectRef>;
}

pub trait StateMachines: Send + Sync {
    fn layers(&self, container: ObjectRef) -> Vec<ObjectRef>;
    fn states(&self, layer: ObjectRef) -> Vec<ObjectRef>;
    fn motion_of(&self, state: ObjectRef) -> Option<ObjectRef>;
}

/// Structural view over host objects, replacing runtime reflection.
pub trait ObjectModel: Send + Sync {
    /// Every kind the host knows about, with its base kind.
    fn kind_decls(&self) -> Vec<KindDecl>;

    /// Concrete kind of `obj`; `None` for null or destroyed objects.
    fn kind_of(&self, obj: ObjectRef) -> Option<String>;

    fn is_alive(&self, obj: ObjectRef) -> bool {
        self.kind_of(obj).is_some()
    }

    /// Reference-bearing fields and readable properties of `obj`.
    fn members(&self, obj: ObjectRef) -> HostResult<Vec<Member>>;

    /// Components attached to a hierarchy node.
    fn components(&self, node: ObjectRef) -> Vec<ObjectRef>;

    /// Child hierarchy nodes, in order.
    fn children(&self, node: ObjectRef) -> Vec<ObjectRef>;
}

/// Receives per-identifier progress while a batch runs.
pub trait ProgressSink: Sync {
    fn report(&self, path: &str, fraction: f32);

    /// Called once after the whole batch.
    fn finish(&self);
}

/// Progress sink that discards everything.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _path: &str, _fraction: f32) {}

    fn finish(&self) {}
}

/// Everything the scanner needs from a host.
pub trait Host:
    IdentityService
    + AssetLoader
    + Instantiator
    + SceneEnvironment
    + PrefabLinks
    + ScriptLinks
    + StateMachines
    + ObjectModel
{
}

impl<T> Host for T where
    T: IdentityService
        + AssetLoader
        + Instantiator
        + SceneEnvironment
        + PrefabLinks
        + ScriptLinks
        + StateMachines
        + ObjectModel
{
}
