use crate::assemble::assemble_graph;
use crate::config::LayoutConfig;
use crate::engine::{DagreEngine, LayoutEngine, engine_edges, engine_nodes};
use crate::error::Result;
use crate::model::{TieredGraph, TieredLayout};
use crate::project::{layout_extent, project_tier, top_left};

/// Lays out `graph` with the dagre engine.
pub fn compute_layout(graph: &TieredGraph, config: &LayoutConfig) -> Result<TieredLayout> {
    compute_layout_with(&DagreEngine, graph, config)
}

/// Lays out `graph` with a caller-supplied engine.
///
/// The call is all-or-nothing: any error aborts it and no positions are
/// returned.
pub fn compute_layout_with<E: LayoutEngine + ?Sized>(
    engine: &E,
    graph: &TieredGraph,
    config: &LayoutConfig,
) -> Result<TieredLayout> {
    let assembled = assemble_graph(graph, config)?;

    let nodes = engine_nodes(&assembled, config);
    let edges = engine_edges(&assembled);
    let geometry = engine.compute_layout(&nodes, &edges, config)?;

    let positioned_nodes = project_tier(&graph.nodes, &geometry)?;
    let categories = project_tier(&graph.categories, &geometry)?;
    let subcategories = project_tier(&graph.subcategories, &geometry)?;

    let (width, height) = layout_extent(
        nodes
            .iter()
            .filter_map(|node| geometry.get(&node.id))
            .map(|geom| (top_left(geom), geom)),
        config,
    );

    Ok(TieredLayout {
        nodes: positioned_nodes,
        categories,
        subcategories,
        edges: assembled.output_edges(),
        dropped_relationships: assembled.dropped,
        width,
        height,
    })
}
