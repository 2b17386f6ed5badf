mod common;

use assetscope_api::{
    AssetId, AssetLoader, HostResult, IdentityService, Instantiator, KindDecl, Member, NoProgress,
    ObjectModel, ObjectRef, PrefabLinks, SceneEnvironment, ScriptLinks, StateMachines,
};
use assetscope_core::host::MemoryHost;
use assetscope_core::{AssetGraphBuilder, ScanError};
use common::{paths, scenario_config, scenario_host};
use std::sync::Arc;

/// Wraps the scenario host and panics when members of `Holder` objects are
/// read.
struct PanickingHost {
    inner: MemoryHost,
}

impl IdentityService for PanickingHost {
    fn path_to_id(&self, path: &str) -> Option<AssetId> {
        self.inner.path_to_id(path)
    }

    fn path_of(&self, obj: ObjectRef) -> Option<String> {
        self.inner.path_of(obj)
    }
}

impl AssetLoader for PanickingHost {
    fn load_asset(&self, path: &str) -> HostResult<ObjectRef> {
        self.inner.load_asset(path)
    }
}

impl Instantiator for PanickingHost {
    fn instantiate(&self, handle: ObjectRef) -> HostResult<ObjectRef> {
        self.inner.instantiate(handle)
    }

    fn release(&self, instance: ObjectRef) {
        self.inner.release(instance)
    }
}

impl SceneEnvironment for PanickingHost {
    fn open_container(&self, path: &str) -> bool {
        self.inner.open_container(path)
    }

    fn top_level_nodes(&self) -> Vec<ObjectRef> {
        self.inner.top_level_nodes()
    }
}

impl PrefabLinks for PanickingHost {
    fn origin_of(&self, obj: ObjectRef) -> Option<ObjectRef> {
        self.inner.origin_of(obj)
    }
}

impl ScriptLinks for PanickingHost {
    fn backing_script_of(&self, obj: ObjectRef) -> Option<ObjectRef> {
        self.inner.backing_script_of(obj)
    }
}

impl StateMachines for PanickingHost {
    fn layers(&self, container: ObjectRef) -> Vec<ObjectRef> {
        self.inner.layers(container)
    }

    fn states(&self, layer: ObjectRef) -> Vec<ObjectRef> {
        self.inner.states(layer)
    }

    fn motion_of(&self, state: ObjectRef) -> Option<ObjectRef> {
        self.inner.motion_of(state)
    }
}

impl ObjectModel for PanickingHost {
    fn kind_decls(&self) -> Vec<KindDecl> {
        self.inner.kind_decls()
    }

    fn kind_of(&self, obj: ObjectRef) -> Option<String> {
        self.inner.kind_of(obj)
    }

    fn members(&self, obj: ObjectRef) -> HostResult<Vec<Member>> {
        if self.inner.kind_of(obj).as_deref() == Some("Holder") {
            panic!("holder accessor exploded");
        }
        self.inner.members(obj)
    }

    fn components(&self, node: ObjectRef) -> Vec<ObjectRef> {
        self.inner.components(node)
    }

    fn children(&self, node: ObjectRef) -> Vec<ObjectRef> {
        self.inner.children(node)
    }
}

#[test]
fn test_panic_is_contained_to_one_asset() {
    let host = Arc::new(PanickingHost {
        inner: scenario_host(),
    });
    let builder = AssetGraphBuilder::new(host.clone(), scenario_config()).unwrap();
    let input = paths(&["Assets/A.struct", "Assets/C.controller"]);

    let output = builder.scan(&input, &NoProgress);

    assert_eq!(output.records.len(), 2);
    assert!(output.records[0].references.is_empty());
    assert_eq!(output.records[1].references.len(), 1);
    assert_eq!(output.failures.len(), 1);
    match &output.failures[0].error {
        ScanError::Panic(message) => assert_eq!(message, "holder accessor exploded"),
        other => panic!("unexpected error: {other:?}"),
    }
    // The transient instance is released while unwinding.
    assert_eq!(host.inner.live_count(), 0);
}

#[test]
fn test_scene_lock_survives_a_panicking_scan() {
    let host = Arc::new(PanickingHost {
        inner: scenario_host(),
    });
    let builder = AssetGraphBuilder::new(host, scenario_config()).unwrap();
    let input = paths(&["Assets/B.scene", "Assets/Empty.scene"]);

    let output = builder.scan(&input, &NoProgress);

    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].index, 0);
    // b_transform resolved before the holder blew up
    assert_eq!(output.records[0].references.len(), 1);
    assert!(output.records[1].references.is_empty());
}
