use canvascore::{BlockRegistry, ConfigValue, Node, NodeId, NodeShape};

/// Which connection handles a node exposes, from the registry's arity
/// declaration. Triggers expose only an output handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleLayout {
    pub input: bool,
    pub output: bool,
}

/// Last-known delivery counters some block kinds show in a footer.
/// Static node-local data, read from the node's own config bag, never
/// from the live run store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryStats {
    pub sent: u64,
    pub delivered: u64,
}

/// Visual descriptor for one node on the canvas. The live status badge
/// is layered separately on top.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRenderer {
    pub node_id: NodeId,
    pub label: String,
    pub block_type: String,
    pub shape: NodeShape,
    pub color: String,
    pub icon: String,
    pub handles: HandleLayout,
    pub stats: Option<DeliveryStats>,
}

impl NodeRenderer {
    /// Descriptor for a node. Total over block types: unknown ones get
    /// the registry's neutral fallback appearance.
    pub fn for_node(registry: &BlockRegistry, node: &Node) -> NodeRenderer {
        let definition = registry.definition(&node.block_type);
        NodeRenderer {
            node_id: node.id,
            label: node.label.clone(),
            block_type: node.block_type.clone(),
            shape: definition.shape,
            color: definition.color.clone(),
            icon: definition.icon.clone(),
            handles: HandleLayout {
                input: definition.input_arity > 0,
                output: definition.output_arity > 0,
            },
            stats: delivery_stats(node),
        }
    }
}

fn delivery_stats(node: &Node) -> Option<DeliveryStats> {
    let stats = match node.config.get("stats") {
        Some(ConfigValue::Map(map)) => map,
        _ => return None,
    };
    let count = |key: &str| stats.get(key).and_then(|v| v.as_f64()).map(|n| n as u64);
    Some(DeliveryStats {
        sent: count("sent")?,
        delivered: count("delivered")?,
    })
}
