use crate::store::ExecutionStateStore;
use canvascore::RunUpdate;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub type SharedStore = Arc<RwLock<ExecutionStateStore>>;

/// Broadcast channel carrying run updates from whatever transport the
/// host wires up (websocket pump, poller, scripted backend).
#[derive(Clone)]
pub struct RunFeed {
    sender: broadcast::Sender<RunUpdate>,
}

impl RunFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RunUpdate> {
        self.sender.subscribe()
    }

    pub fn push(&self, update: RunUpdate) {
        let _ = self.sender.send(update);
    }
}

/// The designated update path: a single task draining feed updates
/// into the store. Everything else holds the store read-only.
pub fn spawn_ingest(
    store: SharedStore,
    mut receiver: broadcast::Receiver<RunUpdate>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                received = receiver.recv() => match received {
                    Ok(update) => store.write().await.apply_update(update),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!("Run feed lagged, {} update(s) dropped", missed);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    })
}
