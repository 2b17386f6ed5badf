//! Reference graph over scanned records.
//!
//! Records only store outgoing references; this graph answers the reverse
//! question of which assets point at a given one.

use assetscope_api::{AssetId, AssetRecord};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct ReferenceGraph {
    topology: DiGraph<AssetId, ()>,
    index: HashMap<AssetId, NodeIndex>,
    scanned: Vec<NodeIndex>,
}

impl ReferenceGraph {
    /// Edges run from an asset to every asset it references. Referenced ids
    /// without a record of their own become leaf nodes.
    pub fn from_records(records: &[AssetRecord]) -> Self {
        let mut graph = Self::default();

        for record in records {
            if record.id.is_empty() {
                continue;
            }
            let from = graph.intern(&record.id);
            if !graph.scanned.contains(&from) {
                graph.scanned.push(from);
            }
            for reference in &record.references {
                let to = graph.intern(reference);
                graph.topology.update_edge(from, to, ());
            }
        }

        graph
    }

    fn intern(&mut self, id: &AssetId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.topology.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        idx
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.index.contains_key(id)
    }

    /// Assets `id` references, sorted.
    pub fn dependencies(&self, id: &AssetId) -> Vec<&AssetId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Assets referencing `id`, sorted.
    pub fn dependents(&self, id: &AssetId) -> Vec<&AssetId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Scanned assets no other scanned asset references.
    pub fn unreferenced(&self) -> Vec<&AssetId> {
        let mut ids: Vec<&AssetId> = self
            .scanned
            .iter()
            .filter(|&&idx| {
                self.topology
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|&idx| &self.topology[idx])
            .collect();
        ids.sort();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.topology.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    fn neighbors(&self, id: &AssetId, direction: Direction) -> Vec<&AssetId> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<&AssetId> = self
            .topology
            .neighbors_directed(idx, direction)
            .map(|n| &self.topology[n])
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
