use canvascore::{
    BlockRegistry, ConfigValue, FieldDefinition, FieldIssue, FormError, GraphError, Node, NodeId,
    NodePatch, WorkflowGraph,
};
use std::collections::HashMap;

/// Live value of one schema field inside the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldState {
    /// A typed value, valid for the field's kind.
    Committed(ConfigValue),
    /// Text typed into a json editor that does not parse yet. The
    /// literal text is retained, never silently discarded; only a save
    /// attempt surfaces the error.
    RawJson { text: String, error: String },
}

impl FieldState {
    fn to_value(&self) -> Option<ConfigValue> {
        match self {
            FieldState::Committed(value) => Some(value.clone()),
            FieldState::RawJson { .. } => None,
        }
    }
}

/// Draft copy of a node's label and config, plus the last-saved
/// baseline. Save validates and writes through to the graph; reset
/// restores the baseline, not registry defaults. Switching selection
/// simply drops the draft.
#[derive(Debug, Clone)]
pub struct ConfigDraft {
    node_id: NodeId,
    block_type: String,
    fields: Vec<FieldDefinition>,
    name: String,
    content: HashMap<String, FieldState>,
    baseline_name: String,
    baseline: HashMap<String, ConfigValue>,
}

impl ConfigDraft {
    /// Open a draft for a node, snapshotting its current state as the
    /// baseline. Unknown block types yield an empty field list; the
    /// node stays renameable and deletable.
    pub fn open(registry: &BlockRegistry, node: &Node) -> Self {
        let definition = registry.definition(&node.block_type);
        let mut draft = Self {
            node_id: node.id,
            block_type: node.block_type.clone(),
            fields: definition.fields.clone(),
            name: node.label.clone(),
            content: HashMap::new(),
            baseline_name: node.label.clone(),
            baseline: node.config.clone(),
        };
        draft.load_content_from_baseline();
        draft
    }

    fn load_content_from_baseline(&mut self) {
        self.content.clear();
        for field in &self.fields {
            if let Some(value) = self.baseline.get(&field.key) {
                self.content
                    .insert(field.key.clone(), FieldState::Committed(value.clone()));
            }
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field_state(&self, key: &str) -> Option<&FieldState> {
        self.content.get(key)
    }

    fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Set a text-like field (text, textarea, variable reference).
    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.content.insert(
            key.to_string(),
            FieldState::Committed(ConfigValue::Text(value.into())),
        );
    }

    /// Set a number field, clamped to the schema's [min, max].
    pub fn set_number(&mut self, key: &str, value: f64) {
        let mut value = value;
        if let Some(field) = self.field(key) {
            if let Some(min) = field.min {
                value = value.max(min);
            }
            if let Some(max) = field.max {
                value = value.min(max);
            }
        }
        self.content.insert(
            key.to_string(),
            FieldState::Committed(ConfigValue::Number(value)),
        );
    }

    /// Pick a select option. The option set is closed: anything not
    /// declared by the schema is rejected without touching the draft.
    pub fn set_select(&mut self, key: &str, option: &str) -> Result<(), FormError> {
        let allowed = self
            .field(key)
            .map(|f| f.options.iter().any(|o| o == option))
            .unwrap_or(false);
        if !allowed {
            return Err(FormError::Validation(vec![FieldIssue {
                key: key.to_string(),
                message: format!("'{}' is not one of the allowed options", option),
            }]));
        }
        self.set_text(key, option);
        Ok(())
    }

    pub fn set_boolean(&mut self, key: &str, enabled: bool) {
        self.content.insert(
            key.to_string(),
            FieldState::Committed(ConfigValue::Bool(enabled)),
        );
    }

    /// Edit a json field with optimistic parsing: parseable text
    /// becomes the parsed structure, unparsable text is retained
    /// literally so the user never loses what they typed.
    pub fn edit_json(&mut self, key: &str, text: impl Into<String>) {
        let text = text.into();
        let state = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(parsed) => FieldState::Committed(ConfigValue::from(parsed)),
            Err(e) => FieldState::RawJson {
                text,
                error: e.to_string(),
            },
        };
        self.content.insert(key.to_string(), state);
    }

    /// Inline per-field problems that would block a save: empty
    /// required fields and unparsable json text.
    pub fn issues(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        for field in &self.fields {
            match self.content.get(&field.key) {
                Some(FieldState::RawJson { error, .. }) => issues.push(FieldIssue {
                    key: field.key.clone(),
                    message: format!("{} is not valid JSON: {}", field.label, error),
                }),
                Some(FieldState::Committed(value)) => {
                    if field.required && value.is_empty() {
                        issues.push(FieldIssue {
                            key: field.key.clone(),
                            message: format!("{} is required", field.label),
                        });
                    } else if !value.matches_kind(field.kind) {
                        // A persisted document can carry a value of the
                        // wrong type; setters never produce one.
                        issues.push(FieldIssue {
                            key: field.key.clone(),
                            message: format!("{} has the wrong type", field.label),
                        });
                    }
                }
                None => {
                    if field.required {
                        issues.push(FieldIssue {
                            key: field.key.clone(),
                            message: format!("{} is required", field.label),
                        });
                    }
                }
            }
        }
        issues
    }

    /// Validate and write the draft through to the graph, then adopt
    /// it as the new baseline. On any error the draft is untouched and
    /// the graph unchanged.
    pub fn save(&mut self, graph: &mut WorkflowGraph) -> Result<(), FormError> {
        let issues = self.issues();
        if !issues.is_empty() {
            return Err(FormError::Validation(issues));
        }

        // Unknown keys in the baseline are carried through untouched.
        let mut config = self.baseline.clone();
        for field in &self.fields {
            if let Some(value) = self.content.get(&field.key).and_then(FieldState::to_value) {
                config.insert(field.key.clone(), value);
            }
        }

        graph
            .update_node(
                self.node_id,
                NodePatch::config(config.clone()).with_label(self.name.clone()),
            )
            .map_err(|e| match e {
                GraphError::UnknownNode(id) => FormError::NodeGone(id),
                other => FormError::SaveFailed(other.to_string()),
            })?;

        self.baseline = config;
        self.baseline_name = self.name.clone();
        tracing::info!("Saved config for node {}", self.node_id);
        Ok(())
    }

    /// Restore the draft to the last-saved state (or the state at
    /// open, if never saved).
    pub fn reset(&mut self) {
        self.name = self.baseline_name.clone();
        self.load_content_from_baseline();
    }

    pub fn is_dirty(&self) -> bool {
        if self.name != self.baseline_name {
            return true;
        }
        for field in &self.fields {
            let current = self.content.get(&field.key);
            let saved = self.baseline.get(&field.key);
            match (current, saved) {
                (None, None) => {}
                (Some(FieldState::Committed(v)), Some(s)) if v == s => {}
                _ => return true,
            }
        }
        false
    }

    /// Delete the node behind this draft. Terminal: consumes the draft
    /// since the node no longer exists, and the caller must drop the
    /// panel's open state.
    pub fn delete(self, graph: &mut WorkflowGraph) -> Result<Node, FormError> {
        graph
            .delete_node(self.node_id)
            .map_err(|_| FormError::NodeGone(self.node_id))
    }
}
