use crate::pins::PinBoard;
use canvascore::{ExecutionLogEntry, NodeId, NodeRunStatus};
use canvasstate::ExecutionStateStore;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// One row of the execution side panel: the latest entry for a node
/// touched by the current run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    pub node_id: NodeId,
    pub node_label: String,
    pub node_type: String,
    pub status: NodeRunStatus,
    pub started_at: DateTime<Utc>,
    pub duration_ms: Option<u64>,
    pub output_data: Option<serde_json::Value>,
    pub error_details: Option<String>,
    pub pinned: bool,
    pub expanded: bool,
}

/// Which rows are expanded. Row content itself always comes fresh from
/// the store; this only tracks the user's open/closed choices and the
/// badge-click expand requests.
#[derive(Debug, Default)]
pub struct RunPanelState {
    expanded: HashSet<NodeId>,
}

impl RunPanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_expanded(&mut self, node_id: NodeId) {
        if !self.expanded.remove(&node_id) {
            self.expanded.insert(node_id);
        }
    }

    /// Expand a node's row; this is what a badge click requests.
    pub fn expand(&mut self, node_id: NodeId) {
        self.expanded.insert(node_id);
    }

    pub fn is_expanded(&self, node_id: NodeId) -> bool {
        self.expanded.contains(&node_id)
    }

    /// Rows for every node touched by the current run, in start order.
    pub fn rows(&self, store: &ExecutionStateStore, pins: &PinBoard) -> Vec<RunRow> {
        store
            .latest_entries()
            .into_iter()
            .map(|entry| RunRow {
                node_id: entry.node_id,
                node_label: entry.node_label.clone(),
                node_type: entry.node_type.clone(),
                status: entry.status,
                started_at: entry.started_at,
                duration_ms: entry.duration_ms,
                output_data: entry.output_data.clone(),
                error_details: entry.error_details.clone(),
                pinned: pins.is_pinned(entry.node_id),
                expanded: self.expanded.contains(&entry.node_id),
            })
            .collect()
    }
}

/// Pretty JSON for the copy-output affordance.
pub fn copy_output_text(entry: &ExecutionLogEntry) -> Option<String> {
    entry
        .output_data
        .as_ref()
        .and_then(|output| serde_json::to_string_pretty(output).ok())
}
