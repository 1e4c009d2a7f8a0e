use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "tb", alias = "TB", alias = "TD")]
    TopDown,
    #[serde(rename = "lr", alias = "LR")]
    LeftRight,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TD" | "TB" | "td" | "tb" => Some(Self::TopDown),
            "LR" | "lr" => Some(Self::LeftRight),
            _ => None,
        }
    }

    pub fn rankdir(self) -> &'static str {
        match self {
            Self::TopDown => "tb",
            Self::LeftRight => "lr",
        }
    }
}

/// Footprint class of a node, decided by its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Category,
    Subcategory,
    Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    pub width: f32,
    pub height: f32,
}

impl NodeSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSizes {
    pub category: NodeSize,
    pub subcategory: NodeSize,
    pub leaf: NodeSize,
}

impl NodeSizes {
    pub fn get(&self, class: SizeClass) -> NodeSize {
        match class {
            SizeClass::Category => self.category,
            SizeClass::Subcategory => self.subcategory,
            SizeClass::Leaf => self.leaf,
        }
    }
}

impl Default for NodeSizes {
    fn default() -> Self {
        Self {
            category: NodeSize::new(240.0, 80.0),
            subcategory: NodeSize::new(220.0, 70.0),
            leaf: NodeSize::new(200.0, 60.0),
        }
    }
}

/// What to do when two subcategories share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateNamePolicy {
    /// The subcategory seen last owns the name.
    #[default]
    LastWins,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub edge_spacing: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub sizes: NodeSizes,
    pub duplicate_names: DuplicateNamePolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopDown,
            node_spacing: 60.0,
            rank_spacing: 120.0,
            edge_spacing: 20.0,
            margin_x: 40.0,
            margin_y: 40.0,
            sizes: NodeSizes::default(),
            duplicate_names: DuplicateNamePolicy::LastWins,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SizesFile {
    category: Option<NodeSize>,
    subcategory: Option<NodeSize>,
    leaf: Option<NodeSize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    direction: Option<Direction>,
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    edge_spacing: Option<f32>,
    margin_x: Option<f32>,
    margin_y: Option<f32>,
    sizes: Option<SizesFile>,
    duplicate_names: Option<DuplicateNamePolicy>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Applies a JSON5 config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(v) = parsed.direction {
        config.direction = v;
    }
    if let Some(v) = parsed.node_spacing {
        config.node_spacing = v;
    }
    if let Some(v) = parsed.rank_spacing {
        config.rank_spacing = v;
    }
    if let Some(v) = parsed.edge_spacing {
        config.edge_spacing = v;
    }
    if let Some(v) = parsed.margin_x {
        config.margin_x = v;
    }
    if let Some(v) = parsed.margin_y {
        config.margin_y = v;
    }
    if let Some(sizes) = parsed.sizes {
        if let Some(v) = sizes.category {
            config.sizes.category = v;
        }
        if let Some(v) = sizes.subcategory {
            config.sizes.subcategory = v;
        }
        if let Some(v) = sizes.leaf {
            config.sizes.leaf = v;
        }
    }
    if let Some(v) = parsed.duplicate_names {
        config.duplicate_names = v;
    }

    Ok(config)
}
