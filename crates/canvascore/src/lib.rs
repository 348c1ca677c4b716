//! Core abstractions for the workflow canvas editor
//!
//! This crate provides the block-type schema registry, the editable
//! workflow graph, and the execution log/status types that the state
//! store and visualization crates build on. It has no async runtime
//! dependencies.

mod error;
mod graph;
mod run;
mod schema;
mod topology;
mod value;
pub mod wire;

pub use error::{CanvasError, FieldIssue, FormError, GraphError, RunError};
pub use graph::{Edge, EdgeId, Node, NodeId, NodePatch, Position, WorkflowGraph};
pub use run::{
    ExecutionId, ExecutionLogEntry, NodeRunStatus, RunSummary, RunUpdate,
};
pub use schema::{
    BlockRegistry, BlockTypeDefinition, FieldDefinition, FieldKind, NodeShape,
};
pub use topology::{downstream_of, has_cycle};
pub use value::ConfigValue;

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
