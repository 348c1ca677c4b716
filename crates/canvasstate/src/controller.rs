use crate::backend::ExecutionBackend;
use crate::feed::{spawn_ingest, RunFeed, SharedStore};
use crate::store::ExecutionStateStore;
use canvascore::wire::PersistedGraph;
use canvascore::{ExecutionId, NodeId, RunError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Ties the store, the feed and the backend together and owns the
/// ingest task. Gates run control: one active run at a time, replay
/// only against the active run. Backend failures surface as errors
/// and never touch store state.
pub struct RunController {
    backend: Arc<dyn ExecutionBackend>,
    store: SharedStore,
    feed: RunFeed,
    token: CancellationToken,
}

impl RunController {
    pub fn new(backend: Arc<dyn ExecutionBackend>, feed: RunFeed) -> Self {
        let store: SharedStore = Arc::new(RwLock::new(ExecutionStateStore::new()));
        let token = CancellationToken::new();
        let _ingest = spawn_ingest(store.clone(), feed.subscribe(), token.clone());
        Self {
            backend,
            store,
            feed,
            token,
        }
    }

    /// Shared handle both visualization views read from.
    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub fn feed(&self) -> &RunFeed {
        &self.feed
    }

    /// Start a run for the given workflow. Rejected while another run
    /// is active or a start request is still in flight.
    pub async fn start_run(
        &self,
        workflow_id: Uuid,
        input: Option<serde_json::Value>,
    ) -> Result<ExecutionId, RunError> {
        // Claim the busy flag before awaiting the backend so a second
        // start cannot interleave with the in-flight request.
        self.store.write().await.request_run()?;

        let execution_id = match self.backend.start_run(workflow_id, input).await {
            Ok(id) => id,
            Err(e) => {
                self.store.write().await.cancel_run_request();
                return Err(e);
            }
        };
        // The feed's own RunStarted is a no-op against this.
        self.store.write().await.begin_run(execution_id);
        Ok(execution_id)
    }

    /// Fire-and-forget replay from a node, scoped to the active run.
    /// Local status state is left alone; fresh records arrive through
    /// the feed like any other update.
    pub async fn replay_from(&self, node_id: NodeId) -> Result<(), RunError> {
        let execution_id = self
            .store
            .read()
            .await
            .active_execution_id()
            .ok_or(RunError::NoActiveRun)?;
        self.backend.replay(execution_id, node_id).await
    }

    /// Poll the backend for run completion, for hosts without a push
    /// channel. Only flips the busy flag; records still come in
    /// through the feed.
    pub async fn sync_with_backend(&self) -> Result<(), RunError> {
        let execution_id = self
            .store
            .read()
            .await
            .active_execution_id()
            .ok_or(RunError::NoActiveRun)?;
        let summary = self.backend.fetch_run(execution_id).await?;
        if !summary.is_running {
            self.store.write().await.finish_run(execution_id, true);
        }
        Ok(())
    }

    /// Persist the graph document through the backend.
    pub async fn save_graph(
        &self,
        workflow_id: Uuid,
        graph: &PersistedGraph,
    ) -> Result<(), RunError> {
        self.backend.save_graph(workflow_id, graph).await.map_err(|e| {
            tracing::error!("Graph save failed: {}", e);
            e
        })
    }

    /// Stop the ingest task. Does not cancel an in-flight backend run.
    pub fn shutdown(&self) {
        self.token.cancel();
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
