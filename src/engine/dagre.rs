use std::collections::{BTreeMap, HashMap, HashSet};

use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

use super::{EngineEdge, EngineNode, LayoutEngine, NodeGeometry};
use crate::config::LayoutConfig;
use crate::error::Result;

/// Layered layout backed by `dagre_rust`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreEngine;

impl LayoutEngine for DagreEngine {
    fn compute_layout(
        &self,
        nodes: &[EngineNode],
        edges: &[EngineEdge],
        config: &LayoutConfig,
    ) -> Result<BTreeMap<String, NodeGeometry>> {
        if nodes.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
            DagreGraph::new(Some(GraphOption {
                directed: Some(true),
                multigraph: Some(false),
                compound: Some(false),
            }));

        let mut graph_config = DagreConfig::default();
        graph_config.rankdir = Some(config.direction.rankdir().to_string());
        graph_config.nodesep = Some(config.node_spacing);
        graph_config.ranksep = Some(config.rank_spacing);
        graph_config.edgesep = Some(config.edge_spacing);
        graph_config.marginx = Some(config.margin_x);
        graph_config.marginy = Some(config.margin_y);
        dagre_graph.set_graph(graph_config);

        let mut node_set: HashSet<&str> = HashSet::with_capacity(nodes.len());
        for (order, engine_node) in nodes.iter().enumerate() {
            let mut node = DagreNode::default();
            node.width = engine_node.width;
            node.height = engine_node.height;
            node.order = Some(order);
            dagre_graph.set_node(engine_node.id.clone(), Some(node));
            node_set.insert(&engine_node.id);
        }

        for edge in simplify_edges(edges, &node_set) {
            let mut edge_label = DagreEdge::default();
            edge_label.weight = Some(edge.weight);
            edge_label.minlen = Some(edge.minlen);
            let _ = dagre_graph.set_edge(&edge.source, &edge.target, Some(edge_label), None);
        }

        dagre_layout::run_layout(&mut dagre_graph);

        let mut geometry = BTreeMap::new();
        for engine_node in nodes {
            let Some(dagre_node) = dagre_graph.node(&engine_node.id) else {
                continue;
            };
            geometry.insert(
                engine_node.id.clone(),
                NodeGeometry {
                    x: dagre_node.x,
                    y: dagre_node.y,
                    width: dagre_node.width,
                    height: dagre_node.height,
                },
            );
        }

        tracing::debug!(nodes = nodes.len(), placed = geometry.len(), "dagre layout finished");
        Ok(geometry)
    }
}

/// Collapses parallel edges into one per ordered pair, summing weights and
/// keeping the largest minlen. Self-loops and edges touching unregistered
/// nodes are skipped so dagre never invents zero-sized nodes.
fn simplify_edges(edges: &[EngineEdge], node_set: &HashSet<&str>) -> Vec<EngineEdge> {
    let mut merged: Vec<EngineEdge> = Vec::with_capacity(edges.len());
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    for edge in edges {
        if !node_set.contains(edge.source.as_str()) || !node_set.contains(edge.target.as_str()) {
            tracing::debug!(source = %edge.source, target = %edge.target, "skipping edge with unknown endpoint");
            continue;
        }
        if edge.source == edge.target {
            continue;
        }
        match index.get(&(edge.source.as_str(), edge.target.as_str())) {
            Some(&idx) => {
                let existing = &mut merged[idx];
                existing.weight += edge.weight;
                existing.minlen = existing.minlen.max(edge.minlen);
            }
            None => {
                index.insert((edge.source.as_str(), edge.target.as_str()), merged.len());
                merged.push(edge.clone());
            }
        }
    }
    merged
}
