use crate::graph::NodeId;
use crate::run::ExecutionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("Run error: {0}")]
    Run(#[from] RunError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Rejections from graph editing operations. Raised before any
/// mutation, so the graph never holds a dangling or invalid edge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Connection would form a self-loop on node {0}")]
    SelfLoop(NodeId),

    #[error("Node {node} ({block_type}) does not accept incoming connections")]
    InputNotAccepted { node: NodeId, block_type: String },

    // Field is not named `source` so thiserror does not treat it as
    // an error source.
    #[error("Connection {from_node} -> {to_node} already exists")]
    DuplicateConnection { from_node: NodeId, to_node: NodeId },
}

/// One inline message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub key: String,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    #[error("Node {0} no longer exists")]
    NodeGone(NodeId),

    #[error("Save failed: {0}")]
    SaveFailed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("A run is already active: {0}")]
    AlreadyRunning(ExecutionId),

    #[error("A run start request is already in flight")]
    StartPending,

    #[error("No run is active")]
    NoActiveRun,

    #[error("Replay rejected: {0}")]
    ReplayRejected(String),

    #[error("Backend request failed: {0}")]
    Backend(String),
}
