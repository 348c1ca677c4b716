use canvascore::{NodeId, NodeRunStatus};
use canvasstate::ExecutionStateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeGlyph {
    Spinner,
    Check,
    Alert,
    Dash,
}

/// Small status glyph overlaid on a node. Clicking it is handled by
/// the host, which forwards to `RunPanelState::expand`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBadge {
    pub node_id: NodeId,
    pub glyph: BadgeGlyph,
    pub tooltip: Option<String>,
}

impl StatusBadge {
    /// Badge for a node, `None` while the node is idle: untouched by
    /// the current run, or pending without a started entry.
    pub fn for_node(store: &ExecutionStateStore, node_id: NodeId) -> Option<StatusBadge> {
        let status = store.status(node_id)?;
        let entry = store.latest_entry(node_id);

        let (glyph, tooltip) = match status {
            NodeRunStatus::Pending => return None,
            NodeRunStatus::Running => (BadgeGlyph::Spinner, None),
            NodeRunStatus::Success => (
                BadgeGlyph::Check,
                entry
                    .and_then(|e| e.duration_ms)
                    .map(|ms| format!("{} ms", ms)),
            ),
            NodeRunStatus::Error => (
                BadgeGlyph::Alert,
                entry.and_then(|e| e.error_details.clone()),
            ),
            NodeRunStatus::Skipped => (BadgeGlyph::Dash, None),
        };

        Some(StatusBadge {
            node_id,
            glyph,
            tooltip,
        })
    }
}
