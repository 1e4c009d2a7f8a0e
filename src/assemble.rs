use std::collections::{HashMap, HashSet};

use crate::config::{DuplicateNamePolicy, LayoutConfig, SizeClass};
use crate::error::{LayoutError, Result};
use crate::model::{
    Category, DroppedRelationship, Edge, LeafNode, Relationship, RelationshipKind, Subcategory,
    TieredGraph,
};

pub const CONTAINS_LABEL: &str = "contains";

/// One entry of the flattened node set handed to the layout engine.
#[derive(Debug, Clone, Copy)]
pub enum LayoutNode<'a> {
    Leaf(&'a LeafNode),
    Category(&'a Category),
    Subcategory(&'a Subcategory),
}

impl<'a> LayoutNode<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            Self::Leaf(node) => &node.id,
            Self::Category(category) => &category.id,
            Self::Subcategory(sub) => &sub.id,
        }
    }

    pub fn size_class(&self) -> SizeClass {
        match self {
            Self::Leaf(_) => SizeClass::Leaf,
            Self::Category(_) => SizeClass::Category,
            Self::Subcategory(_) => SizeClass::Subcategory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Supplied by the caller.
    Provided,
    Containment,
    Relationship(RelationshipKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledEdge {
    pub edge: Edge,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone)]
pub struct AssembledGraph<'a> {
    pub nodes: Vec<LayoutNode<'a>>,
    pub edges: Vec<AssembledEdge>,
    pub dropped: Vec<DroppedRelationship>,
}

impl AssembledGraph<'_> {
    pub fn output_edges(&self) -> Vec<Edge> {
        self.edges.iter().map(|e| e.edge.clone()).collect()
    }
}

pub fn assemble_graph<'a>(
    graph: &'a TieredGraph,
    config: &LayoutConfig,
) -> Result<AssembledGraph<'a>> {
    let names = subcategory_name_index(&graph.subcategories, config.duplicate_names)?;

    let mut nodes: Vec<LayoutNode<'a>> = Vec::with_capacity(
        graph.nodes.len() + graph.categories.len() + graph.subcategories.len(),
    );
    nodes.extend(graph.nodes.iter().map(LayoutNode::Leaf));
    nodes.extend(graph.categories.iter().map(LayoutNode::Category));
    nodes.extend(graph.subcategories.iter().map(LayoutNode::Subcategory));

    let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in &nodes {
        if !seen.insert(node.id()) {
            return Err(LayoutError::DuplicateNodeId {
                id: node.id().to_string(),
            });
        }
    }

    let mut edges: Vec<AssembledEdge> = graph
        .edges
        .iter()
        .map(|edge| AssembledEdge {
            edge: edge.clone(),
            kind: EdgeKind::Provided,
        })
        .collect();

    let mut ids = EdgeIds::seeded(&graph.edges);
    for sub in &graph.subcategories {
        edges.push(containment_edge(&mut ids, &sub.parent_category_id, &sub.id));
    }
    for sub in &graph.subcategories {
        let mut members: HashSet<&str> = HashSet::with_capacity(sub.node_ids.len());
        for node_id in &sub.node_ids {
            if !members.insert(node_id) {
                continue;
            }
            edges.push(containment_edge(&mut ids, &sub.id, node_id));
        }
    }

    let mut dropped = Vec::new();
    let relationships = graph
        .intra_tier
        .iter()
        .map(|rel| (rel, RelationshipKind::IntraTier))
        .chain(graph.cross_tier.iter().map(|rel| (rel, RelationshipKind::CrossTier)));
    for (rel, kind) in relationships {
        match resolve_relationship(&mut ids, rel, kind, &names) {
            Ok(edge) => edges.push(edge),
            Err(missing) => {
                tracing::warn!(
                    relationship = %rel.id,
                    kind = kind.id_prefix(),
                    missing = ?missing,
                    "dropping relationship with unknown subcategory name"
                );
                dropped.push(DroppedRelationship {
                    id: rel.id.clone(),
                    kind,
                    missing,
                });
            }
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        dropped = dropped.len(),
        "assembled tiered graph"
    );

    Ok(AssembledGraph {
        nodes,
        edges,
        dropped,
    })
}

fn subcategory_name_index(
    subcategories: &[Subcategory],
    policy: DuplicateNamePolicy,
) -> Result<HashMap<&str, &str>> {
    let mut names: HashMap<&str, &str> = HashMap::with_capacity(subcategories.len());
    for sub in subcategories {
        if let Some(previous) = names.insert(&sub.name, &sub.id) {
            match policy {
                DuplicateNamePolicy::Reject => {
                    return Err(LayoutError::DuplicateSubcategoryName {
                        name: sub.name.clone(),
                        first: previous.to_string(),
                        second: sub.id.clone(),
                    });
                }
                DuplicateNamePolicy::LastWins => {
                    tracing::debug!(
                        name = %sub.name,
                        replaced = previous,
                        by = %sub.id,
                        "subcategory name reused"
                    );
                }
            }
        }
    }
    Ok(names)
}

/// Ids handed out to edges so far. Caller ids are taken as given; generated
/// ids that clash get a `#n` suffix.
struct EdgeIds {
    taken: HashSet<String>,
}

impl EdgeIds {
    fn seeded(edges: &[Edge]) -> Self {
        Self {
            taken: edges.iter().map(|e| e.id.clone()).collect(),
        }
    }

    fn claim(&mut self, base: String) -> String {
        if !self.taken.contains(&base) {
            self.taken.insert(base.clone());
            return base;
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}#{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn containment_edge(ids: &mut EdgeIds, parent: &str, child: &str) -> AssembledEdge {
    AssembledEdge {
        edge: Edge::new(
            ids.claim(format!("{CONTAINS_LABEL}:{parent}->{child}")),
            parent,
            child,
            CONTAINS_LABEL,
        ),
        kind: EdgeKind::Containment,
    }
}

/// Returns the resolved edge, or the endpoint names that did not resolve.
fn resolve_relationship(
    ids: &mut EdgeIds,
    rel: &Relationship,
    kind: RelationshipKind,
    names: &HashMap<&str, &str>,
) -> std::result::Result<AssembledEdge, Vec<String>> {
    let from = names.get(rel.from_name.as_str());
    let to = names.get(rel.to_name.as_str());
    match (from, to) {
        (Some(from), Some(to)) => Ok(AssembledEdge {
            edge: Edge::new(
                ids.claim(format!("{}:{}", kind.id_prefix(), rel.id)),
                *from,
                *to,
                rel.label.clone(),
            ),
            kind: EdgeKind::Relationship(kind),
        }),
        _ => {
            let mut missing = Vec::new();
            if from.is_none() {
                missing.push(rel.from_name.clone());
            }
            if to.is_none() && rel.to_name != rel.from_name {
                missing.push(rel.to_name.clone());
            }
            Err(missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> TieredGraph {
        TieredGraph {
            nodes: vec![LeafNode::new("n1"), LeafNode::new("n2"), LeafNode::new("n3")],
            edges: vec![Edge::new("e1", "n1", "n2", "calls")],
            categories: vec![Category::new("c1"), Category::new("c2")],
            subcategories: vec![
                Subcategory::new("s1", "A", "c1").with_nodes(["n1", "n2"]),
                Subcategory::new("s2", "B", "c2").with_nodes(["n3"]),
            ],
            intra_tier: vec![Relationship::new("r1", "A", "B", "uses")],
            cross_tier: Vec::new(),
        }
    }

    fn edges_between<'e>(
        edges: &'e [AssembledEdge],
        from: &str,
        to: &str,
    ) -> Vec<&'e AssembledEdge> {
        edges
            .iter()
            .filter(|e| e.edge.source == from && e.edge.target == to)
            .collect()
    }

    #[test]
    fn node_set_covers_all_tiers_with_size_classes() {
        let graph = sample_graph();
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(assembled.nodes.len(), 7);
        let class_of = |id: &str| {
            assembled
                .nodes
                .iter()
                .find(|n| n.id() == id)
                .map(|n| n.size_class())
        };
        assert_eq!(class_of("n1"), Some(SizeClass::Leaf));
        assert_eq!(class_of("c2"), Some(SizeClass::Category));
        assert_eq!(class_of("s1"), Some(SizeClass::Subcategory));
    }

    #[test]
    fn emits_one_containment_edge_per_parent_child_pair() {
        let graph = sample_graph();
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        for (from, to) in [("c1", "s1"), ("c2", "s2"), ("s1", "n1"), ("s1", "n2"), ("s2", "n3")] {
            let found = edges_between(&assembled.edges, from, to);
            assert_eq!(found.len(), 1, "{from}->{to}");
            assert_eq!(found[0].edge.label, CONTAINS_LABEL);
            assert_eq!(found[0].kind, EdgeKind::Containment);
        }
    }

    #[test]
    fn resolves_relationship_names_to_ids() {
        let graph = sample_graph();
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        let found = edges_between(&assembled.edges, "s1", "s2");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].edge.label, "uses");
        assert_eq!(found[0].edge.id, "intra:r1");
        assert!(assembled.dropped.is_empty());
    }

    #[test]
    fn drops_relationships_with_unknown_names() {
        let mut graph = sample_graph();
        graph.cross_tier.push(Relationship::new("r2", "A", "Z", "feeds"));
        graph.cross_tier.push(Relationship::new("r3", "Y", "Y", "loops"));
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        assert!(assembled.edges.iter().all(|e| e.edge.id != "cross:r2"));
        assert!(
            assembled
                .edges
                .iter()
                .all(|e| e.edge.source != "Z" && e.edge.target != "Z")
        );
        assert_eq!(
            assembled.dropped,
            vec![
                DroppedRelationship {
                    id: "r2".to_string(),
                    kind: RelationshipKind::CrossTier,
                    missing: vec!["Z".to_string()],
                },
                DroppedRelationship {
                    id: "r3".to_string(),
                    kind: RelationshipKind::CrossTier,
                    missing: vec!["Y".to_string()],
                },
            ]
        );
    }

    #[test]
    fn keeps_parallel_intra_and_cross_edges() {
        let mut graph = sample_graph();
        graph.cross_tier.push(Relationship::new("r1", "A", "B", "depends on"));
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        let found = edges_between(&assembled.edges, "s1", "s2");
        let ids: Vec<&str> = found.iter().map(|e| e.edge.id.as_str()).collect();
        assert_eq!(ids, vec!["intra:r1", "cross:r1"]);
    }

    #[test]
    fn caller_edges_come_first_and_unchanged() {
        let graph = sample_graph();
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(assembled.edges[0].edge, graph.edges[0]);
        assert_eq!(assembled.edges[0].kind, EdgeKind::Provided);
    }

    fn assert_unique_ids(edges: &[AssembledEdge]) {
        let ids: HashSet<&str> = edges.iter().map(|e| e.edge.id.as_str()).collect();
        assert_eq!(ids.len(), edges.len(), "duplicate edge ids in {edges:?}");
    }

    #[test]
    fn generated_ids_step_around_caller_ids() {
        let mut graph = sample_graph();
        graph.edges.push(Edge::new("intra:r1", "n2", "n3", "taken"));
        graph.edges.push(Edge::new("contains:c1->s1", "n3", "n1", "taken"));
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        assert_unique_ids(&assembled.edges);

        let rel = edges_between(&assembled.edges, "s1", "s2");
        assert_eq!(rel[0].edge.id, "intra:r1#2");
        let contains = edges_between(&assembled.edges, "c1", "s1");
        assert_eq!(contains[0].edge.id, "contains:c1->s1#2");
        // caller ids are left alone
        assert_eq!(assembled.edges[1].edge.id, "intra:r1");
        assert_eq!(assembled.edges[2].edge.id, "contains:c1->s1");
    }

    #[test]
    fn repeated_member_yields_one_containment_edge() {
        let mut graph = sample_graph();
        graph.subcategories[0].node_ids.push("n1".to_string());
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(edges_between(&assembled.edges, "s1", "n1").len(), 1);
        assert_unique_ids(&assembled.edges);
    }

    #[test]
    fn arrow_in_ids_does_not_alias_containment_ids() {
        let graph = TieredGraph {
            categories: vec![Category::new("a->b"), Category::new("a")],
            subcategories: vec![
                Subcategory::new("c", "First", "a->b"),
                Subcategory::new("b->c", "Second", "a"),
            ],
            ..TieredGraph::default()
        };
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        let ids: Vec<&str> = assembled.edges.iter().map(|e| e.edge.id.as_str()).collect();
        assert_eq!(ids, vec!["contains:a->b->c", "contains:a->b->c#2"]);
    }

    #[test]
    fn reject_policy_fails_on_duplicate_subcategory_names() {
        let mut graph = sample_graph();
        graph.subcategories.push(Subcategory::new("s3", "A", "c2"));
        let config = LayoutConfig {
            duplicate_names: DuplicateNamePolicy::Reject,
            ..LayoutConfig::default()
        };
        let err = assemble_graph(&graph, &config).unwrap_err();
        match err {
            LayoutError::DuplicateSubcategoryName { name, first, second } => {
                assert_eq!(name, "A");
                assert_eq!(first, "s1");
                assert_eq!(second, "s3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_names_resolve_to_later_subcategory_by_default() {
        let mut graph = sample_graph();
        graph.subcategories.push(Subcategory::new("s3", "A", "c2"));
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(edges_between(&assembled.edges, "s3", "s2").len(), 1);
        assert!(edges_between(&assembled.edges, "s1", "s2").is_empty());
    }

    #[test]
    fn rejects_ids_shared_across_tiers() {
        let mut graph = sample_graph();
        graph.categories.push(Category::new("n1"));
        let err = assemble_graph(&graph, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateNodeId { id } if id == "n1"));
    }

    #[test]
    fn empty_input_assembles_to_caller_edges_only() {
        let graph = TieredGraph {
            edges: vec![Edge::new("e1", "x", "y", "")],
            ..TieredGraph::default()
        };
        let assembled = assemble_graph(&graph, &LayoutConfig::default()).unwrap();
        assert!(assembled.nodes.is_empty());
        assert_eq!(assembled.output_edges(), graph.edges);
    }
}
