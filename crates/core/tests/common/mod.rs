#![allow(dead_code)]

use assetscope_api::ProgressSink;
use assetscope_core::ScanConfig;
use assetscope_core::config::SuffixConfig;
use assetscope_core::host::MemoryHost;
use serde_json::{Value, json};
use std::sync::Mutex;

/// Structure A references X through a plain field, scene B holds one
/// instance of A, controller C has a single state playing Y.
pub fn scenario_manifest() -> Value {
    json!({
        "kinds": [
            { "name": "Object" },
            { "name": "GameObject", "base": "Object" },
            { "name": "Component", "base": "Object" },
            { "name": "Transform", "base": "Component" },
            { "name": "Behaviour", "base": "Component" },
            { "name": "MonoBehaviour", "base": "Behaviour" },
            { "name": "Holder", "base": "Component" },
            { "name": "Renderer", "base": "Component" },
            { "name": "MeshRenderer", "base": "Renderer" },
            { "name": "MonoScript", "base": "Object" },
            { "name": "Material", "base": "Object" },
            { "name": "AnimationClip", "base": "Object" },
            { "name": "AnimatorController", "base": "Object" }
        ],
        "assets": [
            { "path": "Assets/A.struct", "id": "A", "main": "a_root" },
            { "path": "Assets/B.scene", "id": "B" },
            { "path": "Assets/C.controller", "id": "C", "main": "c" },
            { "path": "Assets/X.mat", "id": "X", "main": "x" },
            { "path": "Assets/Y.anim", "id": "Y", "main": "y" },
            { "path": "Assets/Spin.cs", "id": "S", "main": "spin_script" },
            { "path": "Assets/Faulty.struct", "id": "F", "main": "f_root" },
            { "path": "Assets/Empty.scene", "id": "E" }
        ],
        "objects": {
            "a_root": { "kind": "GameObject", "asset": "Assets/A.struct",
                        "components": ["a_transform", "a_holder"] },
            "a_transform": { "kind": "Transform", "asset": "Assets/A.struct" },
            "a_holder": { "kind": "Holder", "asset": "Assets/A.struct",
                          "members": [{ "name": "target", "origin": "field", "value": "x" }] },

            "b_root": { "kind": "GameObject", "origin": "a_root",
                        "components": ["b_transform", "b_holder"] },
            "b_transform": { "kind": "Transform", "origin": "a_transform" },
            "b_holder": { "kind": "Holder", "origin": "a_holder",
                          "members": [{ "name": "target", "origin": "field", "value": "x" }] },

            "c": { "kind": "AnimatorController", "asset": "Assets/C.controller", "layers": ["c_layer"] },
            "c_layer": { "kind": "Object", "states": ["c_state"] },
            "c_state": { "kind": "Object", "motion": "y" },

            "x": { "kind": "Material", "asset": "Assets/X.mat" },
            "y": { "kind": "AnimationClip", "asset": "Assets/Y.anim" },
            "spin_script": { "kind": "MonoScript", "asset": "Assets/Spin.cs" },

            "f_root": { "kind": "GameObject", "asset": "Assets/Faulty.struct",
                        "components": ["f_spin", "f_renderer", "f_broken"] },
            "f_spin": { "kind": "MonoBehaviour", "asset": "Assets/Faulty.struct", "script": "spin_script" },
            "f_renderer": { "kind": "MeshRenderer", "asset": "Assets/Faulty.struct",
                            "members": [
                                { "name": "material", "value": "y" },
                                { "name": "sharedMaterial", "value": "x" }
                            ] },
            "f_broken": { "kind": "Holder", "asset": "Assets/Faulty.struct",
                          "members": [{ "name": "target", "error": "accessor threw" }] }
        },
        "scenes": {
            "Assets/B.scene": ["b_root"],
            "Assets/Empty.scene": []
        }
    })
}

pub fn scenario_host() -> MemoryHost {
    MemoryHost::from_json(&scenario_manifest().to_string()).expect("valid manifest")
}

pub fn scenario_config() -> ScanConfig {
    ScanConfig {
        suffixes: SuffixConfig {
            structure: vec![".struct".to_string()],
            scene: vec![".scene".to_string()],
            state_machine: vec![".controller".to_string()],
        },
        ..ScanConfig::default()
    }
}

pub fn paths(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| p.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Report(String, f32),
    Complete(usize),
    Finish,
}

/// Progress sink that keeps every call in order.
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingProgress {
    pub fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn fractions(&self) -> Vec<f32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Report(_, f) => Some(f),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, path: &str, fraction: f32) {
        self.push(Event::Report(path.to_string(), fraction));
    }

    fn finish(&self) {
        self.push(Event::Finish);
    }
}
