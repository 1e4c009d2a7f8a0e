pub mod assemble;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod model;
pub mod project;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Direction, DuplicateNamePolicy, LayoutConfig, NodeSize, NodeSizes, load_config};
pub use engine::{DagreEngine, EngineEdge, EngineNode, LayoutEngine, NodeGeometry};
pub use error::{LayoutError, Result};
pub use layout::{compute_layout, compute_layout_with};
pub use model::{
    Category, DroppedRelationship, Edge, LeafNode, Position, Positioned, Relationship,
    RelationshipKind, Subcategory, TierItem, TieredGraph, TieredLayout,
};
