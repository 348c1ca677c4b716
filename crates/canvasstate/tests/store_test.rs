use canvascore::{ExecutionLogEntry, NodeRunStatus, RunError};
use chrono::{Duration, Utc};
use canvasstate::ExecutionStateStore;
use serde_json::json;
use uuid::Uuid;

fn entry(node: Uuid, status: NodeRunStatus) -> ExecutionLogEntry {
    let mut e = ExecutionLogEntry::started(node, "Node", "condition");
    e.status = status;
    e
}

#[test]
fn test_status_is_monotonic_within_a_run() {
    let run = Uuid::new_v4();
    let node = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();
    store.begin_run(run);

    store.apply(run, entry(node, NodeRunStatus::Running));
    store.apply(run, entry(node, NodeRunStatus::Success));
    assert_eq!(store.status(node), Some(NodeRunStatus::Success));

    // Terminal never reverts; the regressive record is not appended.
    store.apply(run, entry(node, NodeRunStatus::Running));
    assert_eq!(store.status(node), Some(NodeRunStatus::Success));
    assert_eq!(store.log().len(), 2);

    store.apply(run, entry(node, NodeRunStatus::Pending));
    assert_eq!(store.status(node), Some(NodeRunStatus::Success));
    assert_eq!(store.log().len(), 2);
}

#[test]
fn test_same_terminal_status_may_be_re_reported() {
    let run = Uuid::new_v4();
    let node = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();
    store.begin_run(run);

    store.apply(run, entry(node, NodeRunStatus::Running));
    store.apply(
        run,
        entry(node, NodeRunStatus::Running).succeeded(json!({"v": 1}), 10),
    );
    // A replay result lands as a fresh success record.
    store.apply(
        run,
        entry(node, NodeRunStatus::Running).succeeded(json!({"v": 2}), 12),
    );

    let latest = store.latest_entry(node).unwrap();
    assert_eq!(latest.output_data, Some(json!({"v": 2})));
    assert_eq!(store.log().len(), 3);
}

#[test]
fn test_records_for_non_active_run_are_ignored() {
    let run = Uuid::new_v4();
    let stale_run = Uuid::new_v4();
    let node = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();
    store.begin_run(run);

    store.apply(stale_run, entry(node, NodeRunStatus::Running));
    assert_eq!(store.status(node), None);
    assert!(store.log().is_empty());
}

#[test]
fn test_new_run_replaces_previous_state() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let node = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();

    store.begin_run(first);
    store.apply(first, entry(node, NodeRunStatus::Error));
    store.finish_run(first, false);
    assert!(!store.is_running());

    store.begin_run(second);
    assert!(store.is_running());
    assert_eq!(store.status(node), None);
    assert!(store.log().is_empty());

    // The error status is free to become running again in the new run.
    store.apply(second, entry(node, NodeRunStatus::Running));
    assert_eq!(store.status(node), Some(NodeRunStatus::Running));
}

#[test]
fn test_terminal_outcome_may_flip_on_replay() {
    let run = Uuid::new_v4();
    let node = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();
    store.begin_run(run);

    store.apply(run, entry(node, NodeRunStatus::Running));
    store.apply(
        run,
        entry(node, NodeRunStatus::Running).succeeded(json!({"v": 1}), 10),
    );
    // A replayed node may fail where the original attempt succeeded.
    store.apply(run, entry(node, NodeRunStatus::Running).failed("boom", 12));

    assert_eq!(store.status(node), Some(NodeRunStatus::Error));
    let latest = store.latest_entry(node).unwrap();
    assert_eq!(latest.error_details.as_deref(), Some("boom"));
    assert_eq!(store.log().len(), 3);
}

#[test]
fn test_repeated_begin_run_after_finish_leaves_state_alone() {
    let run = Uuid::new_v4();
    let node = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();

    store.begin_run(run);
    store.apply(run, entry(node, NodeRunStatus::Running).succeeded(json!(1), 5));
    store.finish_run(run, true);
    assert!(!store.is_running());

    // A late begin_run for the same execution (controller catching up
    // after the feed already drained the run) changes nothing.
    store.begin_run(run);
    assert!(!store.is_running());
    assert_eq!(store.log().len(), 1);
    assert_eq!(store.status(node), Some(NodeRunStatus::Success));
}

#[test]
fn test_request_run_holds_the_gate_until_resolved() {
    let run = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();

    store.request_run().unwrap();
    assert!(store.is_running());
    // A second start while the request is still pending is rejected.
    assert!(matches!(store.request_run(), Err(RunError::StartPending)));

    // A failed backend call releases the gate.
    store.cancel_run_request();
    assert!(!store.is_running());
    store.request_run().unwrap();

    // Once a run is live, the rejection names it.
    store.begin_run(run);
    assert!(matches!(
        store.request_run(),
        Err(RunError::AlreadyRunning(id)) if id == run
    ));
    // Cancel is a no-op against a live run.
    store.cancel_run_request();
    assert!(store.is_running());
}

#[test]
fn test_latest_entries_keep_start_order() {
    let run = Uuid::new_v4();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();
    store.begin_run(run);

    store.apply(run, entry(a, NodeRunStatus::Running));
    store.apply(run, entry(b, NodeRunStatus::Running));
    store.apply(run, entry(a, NodeRunStatus::Running).succeeded(json!(1), 5));
    store.apply(run, entry(b, NodeRunStatus::Running).failed("boom", 7));

    let rows = store.latest_entries();
    assert_eq!(rows.len(), 2);
    // a started first, so it stays first even though b's latest entry
    // arrived last.
    assert_eq!(rows[0].node_id, a);
    assert_eq!(rows[0].status, NodeRunStatus::Success);
    assert_eq!(rows[1].node_id, b);
    assert_eq!(rows[1].error_details.as_deref(), Some("boom"));
}

#[test]
fn test_latest_entries_order_by_started_at_not_arrival() {
    let run = Uuid::new_v4();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut store = ExecutionStateStore::new();
    store.begin_run(run);

    let base = Utc::now();
    let mut first = entry(b, NodeRunStatus::Running);
    first.started_at = base;
    let mut second = entry(a, NodeRunStatus::Running);
    second.started_at = base + Duration::milliseconds(20);

    // b started earlier but its record arrives after a's.
    store.apply(run, second);
    store.apply(run, first);

    let rows = store.latest_entries();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].node_id, b);
    assert_eq!(rows[1].node_id, a);
}
