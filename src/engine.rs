mod dagre;

use std::collections::BTreeMap;

use crate::assemble::{AssembledGraph, EdgeKind};
use crate::config::LayoutConfig;
use crate::error::Result;

pub use dagre::DagreEngine;

/// A node as registered with the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineNode {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

/// An edge as registered with the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEdge {
    pub source: String,
    pub target: String,
    pub weight: f32,
    pub minlen: f32,
}

/// Center point and size the engine assigned to a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A layered placement algorithm.
///
/// Implementations must return geometry for every node they were given.
/// Anything satisfying that is interchangeable, which keeps assembly and
/// projection testable without running dagre.
pub trait LayoutEngine {
    fn compute_layout(
        &self,
        nodes: &[EngineNode],
        edges: &[EngineEdge],
        config: &LayoutConfig,
    ) -> Result<BTreeMap<String, NodeGeometry>>;
}

pub const CONTAINMENT_WEIGHT: f32 = 3.0;
pub const CONTAINMENT_MINLEN: f32 = 1.0;
pub const RELATION_WEIGHT: f32 = 1.0;
pub const RELATION_MINLEN: f32 = 2.0;

/// Containment edges pull hard and stay short; everything else is a looser
/// constraint spanning at least two ranks.
pub fn edge_weighting(kind: EdgeKind) -> (f32, f32) {
    match kind {
        EdgeKind::Containment => (CONTAINMENT_WEIGHT, CONTAINMENT_MINLEN),
        EdgeKind::Provided | EdgeKind::Relationship(_) => (RELATION_WEIGHT, RELATION_MINLEN),
    }
}

pub fn engine_nodes(graph: &AssembledGraph<'_>, config: &LayoutConfig) -> Vec<EngineNode> {
    graph
        .nodes
        .iter()
        .map(|node| {
            let size = config.sizes.get(node.size_class());
            EngineNode {
                id: node.id().to_string(),
                width: size.width,
                height: size.height,
            }
        })
        .collect()
}

pub fn engine_edges(graph: &AssembledGraph<'_>) -> Vec<EngineEdge> {
    graph
        .edges
        .iter()
        .map(|assembled| {
            let (weight, minlen) = edge_weighting(assembled.kind);
            EngineEdge {
                source: assembled.edge.source.clone(),
                target: assembled.edge.target.clone(),
                weight,
                minlen,
            }
        })
        .collect()
}
