use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extra caller fields carried through layout untouched.
pub type Payload = Map<String, Value>;

/// Key under which the computed position is emitted.
pub const POSITION_KEY: &str = "position";

/// Accessors shared by the three input tiers.
pub trait TierItem: Clone {
    fn id(&self) -> &str;
    fn payload_mut(&mut self) -> &mut Payload;
}

macro_rules! impl_tier_item {
    ($($ty:ty),*) => {
        $(impl TierItem for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn payload_mut(&mut self) -> &mut Payload {
                &mut self.data
            }
        })*
    };
}

impl_tier_item!(LeafNode, Category, Subcategory);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    pub id: String,
    #[serde(flatten)]
    pub data: Payload,
}

impl LeafNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Payload::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// Tier 1 grouping. Members are inferred from `Subcategory::parent_category_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(flatten)]
    pub data: Payload,
}

impl Category {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Payload::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// Tier 2 grouping, owned by one category and owning zero or more leaf nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    /// Key used to resolve relationships.
    pub name: String,
    pub parent_category_id: String,
    #[serde(default)]
    pub node_ids: Vec<String>,
    #[serde(flatten)]
    pub data: Payload,
}

impl Subcategory {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        parent_category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_category_id: parent_category_id.into(),
            node_ids: Vec::new(),
            data: Payload::new(),
        }
    }

    pub fn with_nodes<I, S>(mut self, node_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_ids = node_ids.into_iter().map(Into::into).collect();
        self
    }
}

/// A directed link between two subcategories, addressed by subcategory name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    #[serde(alias = "fromC2")]
    pub from_name: String,
    #[serde(alias = "toC2")]
    pub to_name: String,
    pub label: String,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        from_name: impl Into<String>,
        to_name: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from_name: from_name.into(),
            to_name: to_name.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    IntraTier,
    CrossTier,
}

impl RelationshipKind {
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::IntraTier => "intra",
            Self::CrossTier => "cross",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }
}

/// Top-left anchor in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// An input object together with the position computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Positioned<T> {
    #[serde(flatten)]
    pub item: T,
    pub position: Position,
}

/// Everything one layout call consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TieredGraph {
    pub nodes: Vec<LeafNode>,
    pub edges: Vec<Edge>,
    pub categories: Vec<Category>,
    pub subcategories: Vec<Subcategory>,
    pub intra_tier: Vec<Relationship>,
    pub cross_tier: Vec<Relationship>,
}

/// A relationship left out of the layout because an endpoint name did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRelationship {
    pub id: String,
    pub kind: RelationshipKind,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieredLayout {
    pub nodes: Vec<Positioned<LeafNode>>,
    pub categories: Vec<Positioned<Category>>,
    pub subcategories: Vec<Positioned<Subcategory>>,
    pub edges: Vec<Edge>,
    pub dropped_relationships: Vec<DroppedRelationship>,
    pub width: f32,
    pub height: f32,
}
