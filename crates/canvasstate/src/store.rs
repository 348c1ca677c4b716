use canvascore::{ExecutionId, ExecutionLogEntry, NodeId, NodeRunStatus, RunError, RunUpdate};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Run-scoped state: active execution, busy flag, per-node status map
/// and the append-only log. One live run at a time; starting a new run
/// replaces everything here.
#[derive(Debug, Default)]
pub struct ExecutionStateStore {
    active_execution_id: Option<ExecutionId>,
    is_running: bool,
    node_statuses: HashMap<NodeId, NodeRunStatus>,
    log: Vec<ExecutionLogEntry>,
}

impl ExecutionStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a run start request as in flight. The busy flag goes up
    /// here, before the backend has handed out an execution id, so a
    /// second start cannot slip through while the request is pending.
    pub fn request_run(&mut self) -> Result<(), RunError> {
        if self.is_running {
            return Err(match self.active_execution_id {
                Some(active) => RunError::AlreadyRunning(active),
                None => RunError::StartPending,
            });
        }
        self.is_running = true;
        Ok(())
    }

    /// Roll back a run start request whose backend call failed. Only
    /// clears the busy flag while no execution actually began.
    pub fn cancel_run_request(&mut self) {
        if self.active_execution_id.is_none() {
            self.is_running = false;
        }
    }

    /// Reset run-scoped state for a fresh run. Idempotent for an
    /// execution id already seen, so the controller and the feed's
    /// `RunStarted` can race in either order without wiping records
    /// or resurrecting the busy flag after the run finished.
    pub fn begin_run(&mut self, execution_id: ExecutionId) {
        if self.active_execution_id == Some(execution_id) {
            return;
        }
        tracing::info!("Run {} started, clearing previous run state", execution_id);
        self.active_execution_id = Some(execution_id);
        self.is_running = true;
        self.node_statuses.clear();
        self.log.clear();
    }

    pub fn finish_run(&mut self, execution_id: ExecutionId, success: bool) {
        if self.active_execution_id != Some(execution_id) {
            tracing::warn!("Ignoring finish for non-active run {}", execution_id);
            return;
        }
        tracing::info!("Run {} finished (success: {})", execution_id, success);
        self.is_running = false;
    }

    /// Apply one backend record. Records for a non-active run, and
    /// records that would move a node backwards through
    /// pending -> running -> terminal, are ignored with a warning and
    /// never appended.
    pub fn apply(&mut self, execution_id: ExecutionId, entry: ExecutionLogEntry) {
        if self.active_execution_id != Some(execution_id) {
            tracing::warn!(
                "Ignoring record for non-active run {} (node {})",
                execution_id,
                entry.node_id
            );
            return;
        }

        if let Some(current) = self.node_statuses.get(&entry.node_id) {
            if !current.can_advance_to(entry.status) {
                tracing::warn!(
                    "Ignoring stale status {:?} -> {:?} for node {}",
                    current,
                    entry.status,
                    entry.node_id
                );
                return;
            }
        }

        self.node_statuses.insert(entry.node_id, entry.status);
        self.log.push(entry);
    }

    pub fn apply_update(&mut self, update: RunUpdate) {
        match update {
            RunUpdate::RunStarted { execution_id, .. } => self.begin_run(execution_id),
            RunUpdate::Record {
                execution_id,
                entry,
            } => self.apply(execution_id, entry),
            RunUpdate::RunFinished {
                execution_id,
                success,
                ..
            } => self.finish_run(execution_id, success),
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn active_execution_id(&self) -> Option<ExecutionId> {
        self.active_execution_id
    }

    /// Current status for a node, `None` when the run has not touched
    /// it (idle, pre-run).
    pub fn status(&self, node_id: NodeId) -> Option<NodeRunStatus> {
        self.node_statuses.get(&node_id).copied()
    }

    /// Latest log entry for a node, across retries and replays.
    pub fn latest_entry(&self, node_id: NodeId) -> Option<&ExecutionLogEntry> {
        self.log.iter().rev().find(|e| e.node_id == node_id)
    }

    /// The latest entry per touched node, ordered by when each node's
    /// first attempt started: rows keep the position of the node's
    /// earliest `started_at` while showing its most recent entry, even
    /// when records arrive out of order.
    pub fn latest_entries(&self) -> Vec<&ExecutionLogEntry> {
        let mut rows: Vec<(DateTime<Utc>, usize, &ExecutionLogEntry)> = Vec::new();
        let mut index: HashMap<NodeId, usize> = HashMap::new();
        for (arrival, entry) in self.log.iter().enumerate() {
            match index.get(&entry.node_id) {
                Some(&slot) => {
                    let row = &mut rows[slot];
                    row.0 = row.0.min(entry.started_at);
                    row.2 = entry;
                }
                None => {
                    index.insert(entry.node_id, rows.len());
                    rows.push((entry.started_at, arrival, entry));
                }
            }
        }
        rows.sort_by_key(|(first_started, arrival, _)| (*first_started, *arrival));
        rows.into_iter().map(|(_, _, entry)| entry).collect()
    }

    pub fn log(&self) -> &[ExecutionLogEntry] {
        &self.log
    }
}
