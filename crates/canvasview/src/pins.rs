use canvascore::{ExecutionLogEntry, NodeId, NodeRunStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A captured output snapshot for one node. Held independent of the
/// run that produced it; survives new runs until unpinned or the node
/// is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct PinSnapshot {
    pub node_id: NodeId,
    pub output: serde_json::Value,
    pub captured_at: DateTime<Utc>,
}

/// Downstream consumer notified on pin changes. `None` means the pin
/// was cleared.
pub type PinSink = Box<dyn Fn(NodeId, Option<&serde_json::Value>) + Send + Sync>;

/// Local client state for pinned outputs: at most one snapshot per
/// node. Not part of the execution state store.
#[derive(Default)]
pub struct PinBoard {
    pins: HashMap<NodeId, PinSnapshot>,
    sink: Option<PinSink>,
}

impl PinBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: PinSink) -> Self {
        Self {
            pins: HashMap::new(),
            sink: Some(sink),
        }
    }

    /// Pin a successful entry's output. Idempotent: re-pinning the
    /// same output is a no-op (no re-notify); a different entry for
    /// the same node replaces the snapshot. Entries without a
    /// successful output are refused.
    pub fn pin(&mut self, entry: &ExecutionLogEntry) -> bool {
        let output = match (&entry.status, &entry.output_data) {
            (NodeRunStatus::Success, Some(output)) => output.clone(),
            _ => {
                tracing::warn!(
                    "Refusing to pin node {} without a successful output",
                    entry.node_id
                );
                return false;
            }
        };

        if let Some(existing) = self.pins.get(&entry.node_id) {
            if existing.output == output {
                return true;
            }
        }

        let snapshot = PinSnapshot {
            node_id: entry.node_id,
            output,
            captured_at: Utc::now(),
        };
        if let Some(sink) = &self.sink {
            sink(entry.node_id, Some(&snapshot.output));
        }
        self.pins.insert(entry.node_id, snapshot);
        true
    }

    /// Clear a pin, notifying the sink with `None`. Returns false when
    /// nothing was pinned.
    pub fn unpin(&mut self, node_id: NodeId) -> bool {
        if self.pins.remove(&node_id).is_none() {
            return false;
        }
        if let Some(sink) = &self.sink {
            sink(node_id, None);
        }
        true
    }

    /// The panel's pin toggle. Returns whether the node is pinned
    /// afterwards.
    pub fn toggle(&mut self, entry: &ExecutionLogEntry) -> bool {
        if self.pins.contains_key(&entry.node_id) {
            self.unpin(entry.node_id);
            false
        } else {
            self.pin(entry)
        }
    }

    /// Drop a deleted node's pin (cascade from node deletion).
    pub fn forget(&mut self, node_id: NodeId) {
        self.unpin(node_id);
    }

    pub fn is_pinned(&self, node_id: NodeId) -> bool {
        self.pins.contains_key(&node_id)
    }

    pub fn snapshot(&self, node_id: NodeId) -> Option<&PinSnapshot> {
        self.pins.get(&node_id)
    }
}
