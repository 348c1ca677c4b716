use crate::error::GraphError;
use crate::schema::BlockRegistry;
use crate::value::ConfigValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub type NodeId = Uuid;
pub type EdgeId = Uuid;

/// Node position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// A placed block instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub block_type: String,
    pub position: Position,
    pub label: String,
    pub config: HashMap<String, ConfigValue>,
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// Partial update applied to a node through `update_node`.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    pub label: Option<String>,
    pub position: Option<Position>,
    pub config: Option<HashMap<String, ConfigValue>>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn config(config: HashMap<String, ConfigValue>) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The editable workflow graph. Nodes and edges are keyed by id so
/// cascading deletes happen in one step with no transiently dangling
/// edge visible to observers. All mutation goes through the named
/// operations below; rejections happen before any state change.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    selected: Option<NodeId>,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new block on the canvas. The config is seeded from the
    /// schema's field defaults and the label from the display name, so
    /// an unknown block type still yields a usable (empty) node.
    pub fn add_node(
        &mut self,
        registry: &BlockRegistry,
        block_type: &str,
        position: Position,
    ) -> NodeId {
        let definition = registry.definition(block_type);

        let mut config = HashMap::new();
        for field in &definition.fields {
            if let Some(default) = &field.default {
                config.insert(field.key.clone(), default.clone());
            }
        }

        let label = if registry.is_known(block_type) {
            definition.display_label.clone()
        } else {
            humanize(block_type)
        };

        let node = Node {
            id: Uuid::new_v4(),
            block_type: block_type.to_string(),
            position,
            label,
            config,
        };
        let id = node.id;

        tracing::info!("Adding node {} ({})", id, block_type);
        self.nodes.insert(id, node);
        id
    }

    /// Draw a connection. Rejected without mutation when either id is
    /// unknown, the edge would be a self-loop, the target does not
    /// accept input (trigger), or the same connection already exists.
    pub fn connect(
        &mut self,
        registry: &BlockRegistry,
        source: NodeId,
        target: NodeId,
    ) -> Result<EdgeId, GraphError> {
        if !self.nodes.contains_key(&source) {
            return Err(GraphError::UnknownNode(source));
        }
        let target_node = self
            .nodes
            .get(&target)
            .ok_or(GraphError::UnknownNode(target))?;

        if source == target {
            tracing::warn!("Rejected self-loop on node {}", source);
            return Err(GraphError::SelfLoop(source));
        }

        let target_def = registry.definition(&target_node.block_type);
        if !target_def.accepts_input() {
            tracing::warn!(
                "Rejected connection into {} ({}): type accepts no input",
                target,
                target_node.block_type
            );
            return Err(GraphError::InputNotAccepted {
                node: target,
                block_type: target_node.block_type.clone(),
            });
        }

        if self
            .edges
            .values()
            .any(|e| e.source == source && e.target == target)
        {
            return Err(GraphError::DuplicateConnection {
                from_node: source,
                to_node: target,
            });
        }

        let edge = Edge {
            id: Uuid::new_v4(),
            source,
            target,
        };
        let id = edge.id;
        self.edges.insert(id, edge);
        Ok(id)
    }

    pub fn select_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::UnknownNode(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Remove a node and every edge referencing it, as one step. The
    /// selection is cleared if it pointed at the deleted node.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        let node = self.nodes.remove(&id).ok_or(GraphError::UnknownNode(id))?;
        self.edges.retain(|_, e| e.source != id && e.target != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        tracing::info!("Deleted node {} ({})", id, node.block_type);
        Ok(node)
    }

    /// Apply a partial update to a node. A config patch replaces the
    /// whole bag: the panel hands back the full draft on save.
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        if let Some(label) = patch.label {
            node.label = label;
        }
        if let Some(position) = patch.position {
            node.position = position;
        }
        if let Some(config) = patch.config {
            node.config = config;
        }
        Ok(())
    }

    /// Reinsert a node from a persisted document, keeping its id.
    pub(crate) fn restore_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    /// Reinsert a persisted edge. Returns false (edge dropped) when
    /// either endpoint is missing from the document.
    pub(crate) fn restore_edge(&mut self, edge: Edge) -> bool {
        if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
            return false;
        }
        self.edges.insert(edge.id, edge);
        true
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn selected(&self) -> Option<&Node> {
        self.selected.and_then(|id| self.nodes.get(&id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// "set_variable" -> "Set variable"
fn humanize(block_type: &str) -> String {
    let spaced = block_type.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
