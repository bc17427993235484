use crate::tree::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TreeSelectError>;

#[derive(Debug, Error)]
pub enum TreeSelectError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Invalid configuration: {0}")]
    InvalidModeOperation(String),
    #[error("Malformed tree: {0}")]
    MalformedTree(#[from] MalformedTree),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Command error: {0}")]
    Command(String),
    #[error("Script error: {0}")]
    Script(String),
    #[error("Error: {0}")]
    Generic(String),
}

/// Structural problems found while validating a forest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTree {
    #[error("id {0} appears more than once")]
    DuplicateId(NodeId),
    #[error("node {id} is nested deeper than {max_depth} levels")]
    TooDeep { id: NodeId, max_depth: usize },
    #[error("node {id} declares parent {declared} but sits under {actual}")]
    ParentMismatch {
        id: NodeId,
        declared: String,
        actual: String,
    },
}

impl From<String> for TreeSelectError {
    fn from(error: String) -> Self {
        TreeSelectError::Generic(error)
    }
}

impl From<&str> for TreeSelectError {
    fn from(error: &str) -> Self {
        TreeSelectError::Generic(error.to_string())
    }
}
