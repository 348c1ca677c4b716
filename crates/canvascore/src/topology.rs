use crate::error::GraphError;
use crate::graph::{NodeId, WorkflowGraph};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use std::collections::{HashMap, HashSet};

fn build_digraph(graph: &WorkflowGraph) -> (DiGraph<NodeId, ()>, HashMap<NodeId, NodeIndex>) {
    let mut digraph = DiGraph::new();
    let mut index = HashMap::new();
    for node in graph.nodes() {
        let idx = digraph.add_node(node.id);
        index.insert(node.id, idx);
    }
    for edge in graph.edges() {
        // Graph ops guarantee both endpoints exist.
        if let (Some(&from), Some(&to)) = (index.get(&edge.source), index.get(&edge.target)) {
            digraph.add_edge(from, to, ());
        }
    }
    (digraph, index)
}

/// All nodes reachable from `start` along edge direction, excluding
/// `start` itself. This is the set a replay-from-node would touch.
pub fn downstream_of(graph: &WorkflowGraph, start: NodeId) -> Result<HashSet<NodeId>, GraphError> {
    let (digraph, index) = build_digraph(graph);
    let start_idx = *index.get(&start).ok_or(GraphError::UnknownNode(start))?;

    let mut reached = HashSet::new();
    let mut bfs = Bfs::new(&digraph, start_idx);
    while let Some(idx) = bfs.next(&digraph) {
        if idx != start_idx {
            reached.insert(digraph[idx]);
        }
    }
    Ok(reached)
}

/// Cycles are representable on the canvas; this only powers a warning
/// in the host UI.
pub fn has_cycle(graph: &WorkflowGraph) -> bool {
    let (digraph, _) = build_digraph(graph);
    toposort(&digraph, None).is_err()
}
