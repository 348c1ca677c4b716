use crate::graph::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ExecutionId = Uuid;

/// Per-node status within one run. Transitions are monotonic: once a
/// terminal status is reached the node does not revert for that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRunStatus {
    Pending,
    Running,
    Success,
    Error,
    Skipped,
}

impl NodeRunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NodeRunStatus::Success | NodeRunStatus::Error | NodeRunStatus::Skipped
        )
    }

    /// Whether moving from `self` to `next` respects the
    /// pending -> running -> terminal ordering. Re-reporting the same
    /// status is allowed, and a replay may flip one terminal outcome
    /// into another; falling back to pending or running is not
    /// allowed.
    pub fn can_advance_to(&self, next: NodeRunStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            NodeRunStatus::Pending => true,
            _ => next.is_terminal(),
        }
    }
}

/// One record in the append-only run log, as reported by the backend.
/// Several entries may exist for the same node across retries and
/// replays; consumers pick the latest for "current" status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    pub node_id: NodeId,
    pub node_label: String,
    pub node_type: String,
    pub status: NodeRunStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl ExecutionLogEntry {
    pub fn started(node_id: NodeId, node_label: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            node_id,
            node_label: node_label.into(),
            node_type: node_type.into(),
            status: NodeRunStatus::Running,
            started_at: Utc::now(),
            duration_ms: None,
            output_data: None,
            error_details: None,
        }
    }

    pub fn succeeded(mut self, output: serde_json::Value, duration_ms: u64) -> Self {
        self.status = NodeRunStatus::Success;
        self.output_data = Some(output);
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn failed(mut self, error: impl Into<String>, duration_ms: u64) -> Self {
        self.status = NodeRunStatus::Error;
        self.error_details = Some(error.into());
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn skipped(mut self) -> Self {
        self.status = NodeRunStatus::Skipped;
        self
    }
}

/// Messages pushed from the backend through the run-update feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunUpdate {
    RunStarted {
        execution_id: ExecutionId,
        timestamp: DateTime<Utc>,
    },
    Record {
        execution_id: ExecutionId,
        entry: ExecutionLogEntry,
    },
    RunFinished {
        execution_id: ExecutionId,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

/// Summary returned by the backend's get-execution call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub execution_id: ExecutionId,
    pub is_running: bool,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}
