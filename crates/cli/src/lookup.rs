use assetscope_api::{AssetId, AssetRecord};
use assetscope_core::ReferenceGraph;
use std::path::Path;
use tracing::warn;

pub enum Lookup {
    Dependents,
    Dependencies,
}

pub fn run(records: &Path, id: &str, lookup: Lookup) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(records)?;
    let parsed: Vec<AssetRecord> = serde_json::from_str(&content)?;
    let graph = ReferenceGraph::from_records(&parsed);

    let id = AssetId::from(id);
    if !graph.contains(&id) {
        warn!("{} does not appear in {}", id, records.display());
    }

    let found = match lookup {
        Lookup::Dependents => graph.dependents(&id),
        Lookup::Dependencies => graph.dependencies(&id),
    };
    for other in found {
        println!("{other}");
    }
    Ok(())
}
