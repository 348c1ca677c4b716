use canvascore::wire::PersistedGraph;
use canvascore::{BlockRegistry, ConfigValue, ExecutionLogEntry, Position};
use serde_json::json;

#[test]
fn test_persisted_node_shape() {
    let registry = BlockRegistry::builtin();
    let mut graph = canvascore::WorkflowGraph::new();
    let id = graph.add_node(&registry, "condition", Position { x: 10.0, y: 20.0 });

    let doc = serde_json::to_value(PersistedGraph::from_graph(&graph)).unwrap();
    let node = &doc["nodes"][0];

    assert_eq!(node["id"], json!(id.to_string()));
    assert_eq!(node["type"], json!("condition"));
    assert_eq!(node["position"], json!({"x": 10.0, "y": 20.0}));
    assert_eq!(node["data"]["type"], json!("condition"));
    assert_eq!(node["data"]["label"], json!("Condition"));
    assert_eq!(node["data"]["content"]["operator"], json!("equals"));
}

#[test]
fn test_round_trip_preserves_unknown_config_keys() {
    let registry = BlockRegistry::builtin();
    let mut graph = canvascore::WorkflowGraph::new();
    let id = graph.add_node(&registry, "http_request", Position { x: 0.0, y: 0.0 });

    // A key no schema field declares must survive a save/load cycle.
    let mut config = graph.node(id).unwrap().config.clone();
    config.insert(
        "x_legacy_retries".to_string(),
        ConfigValue::from(serde_json::json!({"max": 5})),
    );
    graph
        .update_node(id, canvascore::NodePatch::config(config))
        .unwrap();

    let text = serde_json::to_string(&PersistedGraph::from_graph(&graph)).unwrap();
    let reloaded: PersistedGraph = serde_json::from_str(&text).unwrap();
    let graph2 = reloaded.into_graph();

    let node = graph2.node(id).unwrap();
    let legacy = node.config.get("x_legacy_retries").unwrap();
    assert_eq!(legacy.to_json(), json!({"max": 5.0}));
}

#[test]
fn test_load_drops_dangling_edges() {
    let doc = json!({
        "nodes": [{
            "id": "7b2e7f2a-8d1f-4f7a-9c9a-111111111111",
            "type": "condition",
            "position": {"x": 0.0, "y": 0.0},
            "data": {"label": "Condition", "type": "condition", "content": {}}
        }],
        "edges": [{
            "id": "7b2e7f2a-8d1f-4f7a-9c9a-222222222222",
            "source": "7b2e7f2a-8d1f-4f7a-9c9a-111111111111",
            "target": "7b2e7f2a-8d1f-4f7a-9c9a-333333333333"
        }]
    });

    let graph = serde_json::from_value::<PersistedGraph>(doc)
        .unwrap()
        .into_graph();
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_log_entry_wire_names() {
    let entry = ExecutionLogEntry::started(uuid::Uuid::new_v4(), "Send Email", "send_email")
        .succeeded(json!({"count": 3}), 42);

    let wire = serde_json::to_value(&entry).unwrap();
    assert_eq!(wire["status"], json!("success"));
    assert_eq!(wire["duration_ms"], json!(42));
    assert_eq!(wire["output_data"], json!({"count": 3}));
    assert_eq!(wire["node_type"], json!("send_email"));
    assert!(wire.get("error_details").is_none());
}
