//! Scan configuration.
//!
//! Every table here has a built-in default; a JSON file only needs to name
//! the parts it overrides.

use crate::error::{Result, ScanError};
use assetscope_api::AssetKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindRule {
    pub kind: String,
    #[serde(default)]
    pub include_subtypes: bool,
}

impl KindRule {
    pub fn exact(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            include_subtypes: false,
        }
    }

    pub fn with_subtypes(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            include_subtypes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRule {
    pub kind: String,
    pub member: String,
    #[serde(default = "default_true")]
    pub include_subtypes: bool,
}

impl MemberRule {
    pub fn new(kind: &str, member: &str) -> Self {
        Self {
            kind: kind.to_string(),
            member: member.to_string(),
            include_subtypes: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Kinds whose members are never traversed.
    pub kinds: Vec<KindRule>,
    /// Properties holding shared defaults rather than per-instance references.
    pub members: Vec<MemberRule>,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            kinds: vec![
                KindRule::exact("Rigidbody"),
                KindRule::exact("Rigidbody2D"),
                KindRule::exact("Transform"),
                KindRule::exact("Object"),
                // Reading its members outside play mode is not supported.
                KindRule::with_subtypes("NavMeshAgent"),
            ],
            members: vec![
                MemberRule::new("MeshFilter", "mesh"),
                MemberRule::new("Renderer", "material"),
                MemberRule::new("WheelCollider", "material"),
                MemberRule::new("TerrainCollider", "material"),
                MemberRule::new("GUIElement", "material"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub behaviour_base: String,
    pub scriptable_base: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            behaviour_base: "MonoBehaviour".to_string(),
            scriptable_base: "ScriptableObject".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuffixConfig {
    pub structure: Vec<String>,
    pub scene: Vec<String>,
    pub state_machine: Vec<String>,
}

impl Default for SuffixConfig {
    fn default() -> Self {
        Self {
            structure: vec![".prefab".to_string()],
            scene: vec![".unity".to_string()],
            state_machine: vec![".controller".to_string()],
        }
    }
}

impl SuffixConfig {
    pub fn classify(&self, path: &str) -> AssetKind {
        let lower = path.to_ascii_lowercase();
        let matches =
            |suffixes: &[String]| suffixes.iter().any(|s| lower.ends_with(&s.to_ascii_lowercase()));

        if matches(&self.structure) {
            AssetKind::Structure
        } else if matches(&self.scene) {
            AssetKind::Scene
        } else if matches(&self.state_machine) {
            AssetKind::StateMachine
        } else {
            AssetKind::Generic
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub ignore: IgnoreConfig,
    pub scripts: ScriptConfig,
    pub suffixes: SuffixConfig,
    /// Worker threads for per-asset scans; 1 keeps the batch sequential.
    pub jobs: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore: IgnoreConfig::default(),
            scripts: ScriptConfig::default(),
            suffixes: SuffixConfig::default(),
            jobs: 1,
        }
    }
}

impl ScanConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: ScanConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(ScanError::Config("jobs must be at least 1".to_string()));
        }
        if let Some(rule) = self.ignore.kinds.iter().find(|r| r.kind.is_empty()) {
            return Err(ScanError::Config(format!("empty kind in ignore rule {rule:?}")));
        }
        if let Some(rule) = self
            .ignore
            .members
            .iter()
            .find(|r| r.kind.is_empty() || r.member.is_empty())
        {
            return Err(ScanError::Config(format!("incomplete member rule {rule:?}")));
        }
        Ok(())
    }
}
