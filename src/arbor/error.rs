use crate::model::NodeId;
use thiserror::Error;

/// Why a persisted document was rejected.
///
/// Load is all-or-nothing: any of these leaves the in-memory document untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Document is not a tree: top-level value must be an object")]
    NotATree,

    #[error("Node {node} has no children array")]
    MissingChildren { node: String },

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Reserved id used by a non-root node: {0}")]
    ReservedId(String),

    #[error("Document nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Node ids run past the id counter limit ({limit})")]
    IdsExhausted { limit: u64 },
}

#[derive(Error, Debug)]
pub enum ArborError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Load failed: {0}")]
    Load(#[from] LoadError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ArborError>;
