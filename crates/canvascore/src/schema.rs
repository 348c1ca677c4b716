use crate::value::ConfigValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed set of field editor kinds. Dispatching on this enum is what
/// drives the schema-generated configuration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Select,
    Boolean,
    Json,
    #[serde(rename = "variable-reference")]
    VariableRef,
}

/// One entry in a block type's configuration schema. Immutable,
/// registry-owned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ConfigValue>,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
            placeholder: None,
            description: None,
            required: false,
            min: None,
            max: None,
            step: None,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self.step = Some(step);
        self
    }

    pub fn with_default(mut self, value: impl Into<ConfigValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Canvas silhouette for a block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Hexagon,
    Rounded,
    Diamond,
    Pill,
}

/// Schema plus presentation descriptor for one block type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTypeDefinition {
    pub block_type: String,
    pub display_label: String,
    pub fields: Vec<FieldDefinition>,
    pub shape: NodeShape,
    pub color: String,
    pub icon: String,
    /// 0 for triggers (no incoming edges are valid), 1 otherwise.
    pub input_arity: u8,
    pub output_arity: u8,
}

impl BlockTypeDefinition {
    pub fn new(
        block_type: impl Into<String>,
        display_label: impl Into<String>,
        shape: NodeShape,
    ) -> Self {
        Self {
            block_type: block_type.into(),
            display_label: display_label.into(),
            fields: Vec::new(),
            shape,
            color: "#64748b".to_string(),
            icon: "box".to_string(),
            input_arity: 1,
            output_arity: 1,
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_appearance(mut self, color: impl Into<String>, icon: impl Into<String>) -> Self {
        self.color = color.into();
        self.icon = icon.into();
        self
    }

    /// Marks the type as a trigger: output only, no incoming edges.
    pub fn source_only(mut self) -> Self {
        self.input_arity = 0;
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn accepts_input(&self) -> bool {
        self.input_arity > 0
    }
}

/// Catalog of block types and their configuration schemas.
///
/// Lookup is total: an unregistered block type resolves to a neutral
/// fallback definition (no fields, generic appearance) so that a graph
/// holding legacy types still renders and stays editable.
pub struct BlockRegistry {
    definitions: HashMap<String, BlockTypeDefinition>,
    fallback: BlockTypeDefinition,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
            fallback: BlockTypeDefinition::new("unknown", "Unknown block", NodeShape::Rounded),
        }
    }

    /// Register a block type definition, replacing any previous entry
    /// for the same type.
    pub fn register(&mut self, definition: BlockTypeDefinition) {
        tracing::info!("Registering block type: {}", definition.block_type);
        self.definitions
            .insert(definition.block_type.clone(), definition);
    }

    /// Resolve a block type to its definition. Never fails: unknown
    /// types get the fallback.
    pub fn definition(&self, block_type: &str) -> &BlockTypeDefinition {
        self.definitions.get(block_type).unwrap_or(&self.fallback)
    }

    pub fn is_known(&self, block_type: &str) -> bool {
        self.definitions.contains_key(block_type)
    }

    pub fn list_block_types(&self) -> Vec<String> {
        self.definitions.keys().cloned().collect()
    }

    /// The built-in catalog shipped with the editor.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register(
            BlockTypeDefinition::new("trigger", "Trigger", NodeShape::Hexagon)
                .source_only()
                .with_appearance("#f59e0b", "zap")
                .with_field(
                    FieldDefinition::new("event", "Event", FieldKind::Select)
                        .with_options(&["manual", "webhook", "schedule"])
                        .with_default("manual"),
                )
                .with_field(
                    FieldDefinition::new("payload", "Seed payload", FieldKind::Json)
                        .with_description("Initial data handed to the first block"),
                ),
        );

        registry.register(
            BlockTypeDefinition::new("ai_model", "AI Model", NodeShape::Rounded)
                .with_appearance("#8b5cf6", "cpu")
                .with_field(
                    FieldDefinition::new("model", "Model", FieldKind::Select)
                        .with_options(&["gpt-4o", "claude-sonnet", "llama-3"])
                        .with_default("gpt-4o"),
                )
                .with_field(
                    FieldDefinition::new("prompt", "Prompt", FieldKind::Textarea)
                        .required()
                        .with_placeholder("Describe what the model should do"),
                )
                .with_field(
                    FieldDefinition::new("temperature", "Temperature", FieldKind::Number)
                        .with_range(0.0, 2.0, 0.1)
                        .with_default(0.7),
                )
                .with_field(
                    FieldDefinition::new("output_variable", "Output variable", FieldKind::VariableRef)
                        .with_placeholder("result"),
                ),
        );

        registry.register(
            BlockTypeDefinition::new("condition", "Condition", NodeShape::Diamond)
                .with_appearance("#0ea5e9", "git-branch")
                .with_field(FieldDefinition::new("variable", "Variable", FieldKind::VariableRef))
                .with_field(
                    FieldDefinition::new("operator", "Operator", FieldKind::Select)
                        .with_options(&["equals", "not_equals", "greater_than", "less_than", "contains"])
                        .with_default("equals"),
                )
                .with_field(FieldDefinition::new("value", "Value", FieldKind::Text)),
        );

        registry.register(
            BlockTypeDefinition::new("set_variable", "Set Variable", NodeShape::Rounded)
                .with_appearance("#10b981", "variable")
                .with_field(
                    FieldDefinition::new("variable", "Variable", FieldKind::Text)
                        .required()
                        .with_placeholder("variable_name"),
                )
                .with_field(FieldDefinition::new("value", "Value", FieldKind::Text)),
        );

        registry.register(
            BlockTypeDefinition::new("http_request", "HTTP Request", NodeShape::Rounded)
                .with_appearance("#ec4899", "globe")
                .with_field(
                    FieldDefinition::new("url", "URL", FieldKind::Text)
                        .required()
                        .with_placeholder("https://example.com/api"),
                )
                .with_field(
                    FieldDefinition::new("method", "Method", FieldKind::Select)
                        .with_options(&["GET", "POST", "PUT", "DELETE"])
                        .with_default("GET"),
                )
                .with_field(FieldDefinition::new("headers", "Headers", FieldKind::Json))
                .with_field(FieldDefinition::new("body", "Body", FieldKind::Json)),
        );

        registry.register(
            BlockTypeDefinition::new("delay", "Delay", NodeShape::Pill)
                .with_appearance("#64748b", "clock")
                .with_field(
                    FieldDefinition::new("duration_secs", "Duration (seconds)", FieldKind::Number)
                        .with_range(0.0, 86_400.0, 1.0)
                        .with_default(1.0),
                ),
        );

        registry.register(
            BlockTypeDefinition::new("send_email", "Send Email", NodeShape::Rounded)
                .with_appearance("#f43f5e", "mail")
                .with_field(
                    FieldDefinition::new("to", "Recipient", FieldKind::Text)
                        .required()
                        .with_placeholder("user@example.com"),
                )
                .with_field(FieldDefinition::new("subject", "Subject", FieldKind::Text))
                .with_field(FieldDefinition::new("body", "Body", FieldKind::Textarea))
                .with_field(
                    FieldDefinition::new("track_opens", "Track opens", FieldKind::Boolean)
                        .with_default(false),
                ),
        );

        registry
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
