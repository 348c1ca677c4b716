use crate::feed::RunFeed;
use canvascore::wire::PersistedGraph;
use canvascore::{ExecutionId, ExecutionLogEntry, NodeId, RunError, RunSummary, RunUpdate};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

/// Boundary to the server-side execution engine. The editor only ever
/// issues these requests; progress comes back through the run feed.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Kick off a run, returning its execution id.
    async fn start_run(
        &self,
        workflow_id: Uuid,
        input: Option<serde_json::Value>,
    ) -> Result<ExecutionId, RunError>;

    /// Fetch a run summary (used for polling completion).
    async fn fetch_run(&self, execution_id: ExecutionId) -> Result<RunSummary, RunError>;

    /// Request a replay of the given run starting at a node.
    /// Accepted/rejected only; results arrive through the feed.
    async fn replay(&self, execution_id: ExecutionId, from_node: NodeId) -> Result<(), RunError>;

    /// Persist the graph document.
    async fn save_graph(&self, workflow_id: Uuid, graph: &PersistedGraph) -> Result<(), RunError>;
}

/// In-memory backend that plays a prepared script of log entries
/// through the feed. Stands in for the real engine in tests and demos.
pub struct ScriptedBackend {
    feed: RunFeed,
    script: Vec<ExecutionLogEntry>,
    active: Mutex<Option<ExecutionId>>,
    fail_start: bool,
    start_delay: Option<std::time::Duration>,
}

impl ScriptedBackend {
    pub fn new(feed: RunFeed, script: Vec<ExecutionLogEntry>) -> Self {
        Self {
            feed,
            script,
            active: Mutex::new(None),
            fail_start: false,
            start_delay: None,
        }
    }

    /// Make `start_run` fail, for exercising error surfaces.
    pub fn failing(feed: RunFeed) -> Self {
        Self {
            feed,
            script: Vec::new(),
            active: Mutex::new(None),
            fail_start: true,
            start_delay: None,
        }
    }

    /// Hold `start_run` for the given duration before acknowledging,
    /// simulating a slow engine round trip.
    pub fn with_start_delay(mut self, delay: std::time::Duration) -> Self {
        self.start_delay = Some(delay);
        self
    }

    fn play(&self, execution_id: ExecutionId, entries: &[ExecutionLogEntry]) {
        for entry in entries {
            self.feed.push(RunUpdate::Record {
                execution_id,
                entry: entry.clone(),
            });
        }
    }
}

#[async_trait]
impl ExecutionBackend for ScriptedBackend {
    async fn start_run(
        &self,
        workflow_id: Uuid,
        _input: Option<serde_json::Value>,
    ) -> Result<ExecutionId, RunError> {
        if self.fail_start {
            return Err(RunError::Backend("engine unavailable".to_string()));
        }
        if let Some(delay) = self.start_delay {
            tokio::time::sleep(delay).await;
        }

        let execution_id = Uuid::new_v4();
        tracing::info!("Scripted run {} for workflow {}", execution_id, workflow_id);
        *self
            .active
            .lock()
            .map_err(|_| RunError::Backend("backend state poisoned".to_string()))? =
            Some(execution_id);

        self.feed.push(RunUpdate::RunStarted {
            execution_id,
            timestamp: Utc::now(),
        });
        self.play(execution_id, &self.script);

        let success = !self
            .script
            .iter()
            .any(|e| e.status == canvascore::NodeRunStatus::Error);
        let duration_ms = self.script.iter().filter_map(|e| e.duration_ms).sum();
        self.feed.push(RunUpdate::RunFinished {
            execution_id,
            success,
            duration_ms,
            timestamp: Utc::now(),
        });
        Ok(execution_id)
    }

    async fn fetch_run(&self, execution_id: ExecutionId) -> Result<RunSummary, RunError> {
        let active = self
            .active
            .lock()
            .map_err(|_| RunError::Backend("backend state poisoned".to_string()))?;
        if *active != Some(execution_id) {
            return Err(RunError::Backend(format!(
                "unknown execution {}",
                execution_id
            )));
        }
        Ok(RunSummary {
            execution_id,
            is_running: false,
            started_at: Utc::now(),
            duration_ms: self.script.iter().filter_map(|e| e.duration_ms).sum::<u64>().into(),
        })
    }

    async fn replay(&self, execution_id: ExecutionId, from_node: NodeId) -> Result<(), RunError> {
        {
            let active = self
                .active
                .lock()
                .map_err(|_| RunError::Backend("backend state poisoned".to_string()))?;
            if *active != Some(execution_id) {
                return Err(RunError::ReplayRejected(format!(
                    "execution {} is not active",
                    execution_id
                )));
            }
        }
        let entries: Vec<ExecutionLogEntry> = self
            .script
            .iter()
            .filter(|e| e.node_id == from_node)
            .cloned()
            .collect();
        if entries.is_empty() {
            return Err(RunError::ReplayRejected(format!(
                "node {} was not part of the run",
                from_node
            )));
        }
        self.play(execution_id, &entries);
        Ok(())
    }

    async fn save_graph(
        &self,
        _workflow_id: Uuid,
        _graph: &PersistedGraph,
    ) -> Result<(), RunError> {
        if self.fail_start {
            return Err(RunError::Backend("persistence unavailable".to_string()));
        }
        Ok(())
    }
}
