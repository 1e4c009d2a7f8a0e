#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("subcategory name {name:?} is shared by {first} and {second}")]
    DuplicateSubcategoryName {
        name: String,
        first: String,
        second: String,
    },
    #[error("node id {id:?} is registered more than once")]
    DuplicateNodeId { id: String },
    #[error("layout engine returned no geometry for node {id:?}")]
    MissingLayoutGeometry { id: String },
    #[error("layout engine failed: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
