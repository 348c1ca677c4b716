use canvascore::{ExecutionLogEntry, NodeRunStatus, RunError};
use canvasstate::{RunController, RunFeed, ScriptedBackend};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn script(node_a: Uuid, node_b: Uuid) -> Vec<ExecutionLogEntry> {
    vec![
        ExecutionLogEntry::started(node_a, "Trigger", "trigger").succeeded(json!({"ok": true}), 3),
        ExecutionLogEntry::started(node_b, "Send Email", "send_email"),
        ExecutionLogEntry::started(node_b, "Send Email", "send_email")
            .succeeded(json!({"count": 3}), 40),
    ]
}

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

async fn settle() {
    // Let the ingest task drain the broadcast feed.
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_scripted_run_flows_into_store() {
    init_logging();
    let node_a = Uuid::new_v4();
    let node_b = Uuid::new_v4();
    let feed = RunFeed::new(256);
    let backend = Arc::new(ScriptedBackend::new(feed.clone(), script(node_a, node_b)));
    let controller = RunController::new(backend, feed);

    let execution_id = controller.start_run(Uuid::new_v4(), None).await.unwrap();
    settle().await;

    let store = controller.store();
    let store = store.read().await;
    assert_eq!(store.active_execution_id(), Some(execution_id));
    assert!(!store.is_running(), "scripted run finishes immediately");
    assert_eq!(store.status(node_a), Some(NodeRunStatus::Success));
    assert_eq!(store.status(node_b), Some(NodeRunStatus::Success));
    assert_eq!(
        store.latest_entry(node_b).unwrap().output_data,
        Some(json!({"count": 3}))
    );
}

#[tokio::test]
async fn test_start_is_gated_while_running() {
    init_logging();
    let feed = RunFeed::new(256);
    let backend = Arc::new(ScriptedBackend::new(feed.clone(), Vec::new()));
    let controller = RunController::new(backend, feed);

    // A run is in flight; nothing has been pushed through the feed.
    let active = Uuid::new_v4();
    controller.store().write().await.begin_run(active);

    let second = controller.start_run(Uuid::new_v4(), None).await;
    assert!(matches!(second, Err(RunError::AlreadyRunning(id)) if id == active));
}

#[tokio::test]
async fn test_start_is_gated_while_request_in_flight() {
    init_logging();
    let feed = RunFeed::new(256);
    let backend = Arc::new(
        ScriptedBackend::new(feed.clone(), Vec::new())
            .with_start_delay(Duration::from_millis(50)),
    );
    let controller = Arc::new(RunController::new(backend, feed));

    // First start is held inside the backend round trip.
    let racing = controller.clone();
    let first = tokio::spawn(async move { racing.start_run(Uuid::new_v4(), None).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    // The gate is already closed even though no execution id exists yet.
    let second = controller.start_run(Uuid::new_v4(), None).await;
    assert!(matches!(second, Err(RunError::StartPending)));

    first.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_replay_requires_active_run_and_replays_node() {
    init_logging();
    let node_a = Uuid::new_v4();
    let node_b = Uuid::new_v4();
    let feed = RunFeed::new(256);
    let backend = Arc::new(ScriptedBackend::new(feed.clone(), script(node_a, node_b)));
    let controller = RunController::new(backend, feed);

    // No run yet.
    assert!(matches!(
        controller.replay_from(node_a).await,
        Err(RunError::NoActiveRun)
    ));

    controller.start_run(Uuid::new_v4(), None).await.unwrap();
    settle().await;
    let log_len_before = controller.store().read().await.log().len();

    // Fire-and-forget: accepted, results come through the feed.
    controller.replay_from(node_b).await.unwrap();
    settle().await;

    let store = controller.store();
    let store = store.read().await;
    assert!(store.log().len() > log_len_before);
    assert_eq!(store.status(node_b), Some(NodeRunStatus::Success));

    // A node the run never touched is rejected by the backend.
    drop(store);
    let ghost = Uuid::new_v4();
    assert!(matches!(
        controller.replay_from(ghost).await,
        Err(RunError::ReplayRejected(_))
    ));
}

#[tokio::test]
async fn test_backend_failure_leaves_store_untouched() {
    init_logging();
    let feed = RunFeed::new(256);
    let backend = Arc::new(ScriptedBackend::failing(feed.clone()));
    let controller = RunController::new(backend, feed);

    let result = controller.start_run(Uuid::new_v4(), None).await;
    assert!(matches!(result, Err(RunError::Backend(_))));

    let store = controller.store();
    {
        let store = store.read().await;
        assert!(!store.is_running());
        assert_eq!(store.active_execution_id(), None);
        assert!(store.log().is_empty());
    }

    // A failed persistence request surfaces without touching state.
    let graph = canvascore::WorkflowGraph::new();
    let doc = canvascore::wire::PersistedGraph::from_graph(&graph);
    let saved = controller.save_graph(Uuid::new_v4(), &doc).await;
    assert!(matches!(saved, Err(RunError::Backend(_))));
    assert!(store.read().await.log().is_empty());
}
