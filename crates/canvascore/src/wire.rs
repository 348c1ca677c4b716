//! Persisted JSON shapes exchanged with the host application.
//!
//! The canvas format nests label/type/config under `data`, mirroring
//! what the host's canvas library stores. Conversions go through the
//! in-memory `WorkflowGraph` and preserve unknown config keys.

use crate::graph::{Edge, EdgeId, Node, NodeId, Position, WorkflowGraph};
use crate::value::ConfigValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedNodeData {
    pub label: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub content: HashMap<String, ConfigValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub block_type: String,
    pub position: Position,
    pub data: PersistedNodeData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedGraph {
    pub nodes: Vec<PersistedNode>,
    pub edges: Vec<PersistedEdge>,
}

impl From<&Node> for PersistedNode {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            block_type: node.block_type.clone(),
            position: node.position,
            data: PersistedNodeData {
                label: node.label.clone(),
                block_type: node.block_type.clone(),
                content: node.config.clone(),
            },
        }
    }
}

impl From<PersistedNode> for Node {
    fn from(persisted: PersistedNode) -> Self {
        Self {
            id: persisted.id,
            // The outer `type` wins if the two copies ever disagree.
            block_type: persisted.block_type,
            position: persisted.position,
            label: persisted.data.label,
            config: persisted.data.content,
        }
    }
}

impl From<&Edge> for PersistedEdge {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id,
            source: edge.source,
            target: edge.target,
        }
    }
}

impl PersistedGraph {
    pub fn from_graph(graph: &WorkflowGraph) -> Self {
        let mut nodes: Vec<PersistedNode> = graph.nodes().map(PersistedNode::from).collect();
        let mut edges: Vec<PersistedEdge> = graph.edges().map(PersistedEdge::from).collect();
        // Map iteration order is arbitrary; keep the document stable.
        nodes.sort_by_key(|n| n.id);
        edges.sort_by_key(|e| e.id);
        Self { nodes, edges }
    }

    /// Rebuild the editable graph. Edges referencing missing nodes are
    /// dropped with a warning rather than failing the whole load.
    pub fn into_graph(self) -> WorkflowGraph {
        let mut graph = WorkflowGraph::new();
        for persisted in self.nodes {
            graph.restore_node(Node::from(persisted));
        }
        for persisted in self.edges {
            if !graph.restore_edge(Edge {
                id: persisted.id,
                source: persisted.source,
                target: persisted.target,
            }) {
                tracing::warn!(
                    "Dropping persisted edge {} with missing endpoint",
                    persisted.id
                );
            }
        }
        graph
    }
}
