use crate::draft::{ConfigDraft, FieldState};
use canvascore::{ConfigValue, FieldDefinition, FieldKind};

/// Widget descriptor for one field, dispatched on the closed
/// `FieldKind` set. The host canvas maps these onto its own controls.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorWidget {
    TextInput {
        value: String,
        placeholder: Option<String>,
    },
    TextArea {
        value: String,
    },
    NumberInput {
        value: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    SelectInput {
        options: Vec<String>,
        selected: Option<String>,
    },
    /// Toggle always carries the fixed "Enabled" caption.
    Toggle {
        caption: &'static str,
        enabled: bool,
    },
    JsonEditor {
        text: String,
        parse_error: Option<String>,
    },
    VariableInput {
        value: String,
        placeholder: Option<String>,
    },
}

/// One row of the schema-driven form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEditor {
    pub key: String,
    pub label: String,
    pub description: Option<String>,
    pub required: bool,
    pub widget: EditorWidget,
}

impl ConfigDraft {
    /// Build the ordered editor list for the draft's schema. Unknown
    /// block types produce an empty form; unknown config keys are not
    /// rendered.
    pub fn field_editors(&self) -> Vec<FieldEditor> {
        self.fields()
            .iter()
            .map(|field| FieldEditor {
                key: field.key.clone(),
                label: field.label.clone(),
                description: field.description.clone(),
                required: field.required,
                widget: widget_for(field, self.field_state(&field.key)),
            })
            .collect()
    }
}

fn text_of(state: Option<&FieldState>) -> String {
    match state {
        Some(FieldState::Committed(ConfigValue::Text(s))) => s.clone(),
        _ => String::new(),
    }
}

fn widget_for(field: &FieldDefinition, state: Option<&FieldState>) -> EditorWidget {
    match field.kind {
        FieldKind::Text => EditorWidget::TextInput {
            value: text_of(state),
            placeholder: field.placeholder.clone(),
        },
        FieldKind::VariableRef => EditorWidget::VariableInput {
            value: text_of(state),
            placeholder: field.placeholder.clone(),
        },
        FieldKind::Textarea => EditorWidget::TextArea {
            value: text_of(state),
        },
        FieldKind::Number => EditorWidget::NumberInput {
            value: match state {
                Some(FieldState::Committed(v)) => v.as_f64(),
                _ => None,
            },
            min: field.min,
            max: field.max,
            step: field.step,
        },
        FieldKind::Select => EditorWidget::SelectInput {
            options: field.options.clone(),
            selected: match state {
                Some(FieldState::Committed(ConfigValue::Text(s))) => Some(s.clone()),
                _ => None,
            },
        },
        FieldKind::Boolean => EditorWidget::Toggle {
            caption: "Enabled",
            enabled: matches!(
                state,
                Some(FieldState::Committed(ConfigValue::Bool(true)))
            ),
        },
        FieldKind::Json => match state {
            Some(FieldState::RawJson { text, error }) => EditorWidget::JsonEditor {
                text: text.clone(),
                parse_error: Some(error.clone()),
            },
            Some(FieldState::Committed(value)) => EditorWidget::JsonEditor {
                text: serde_json::to_string_pretty(&value.to_json())
                    .unwrap_or_else(|_| String::new()),
                parse_error: None,
            },
            None => EditorWidget::JsonEditor {
                text: String::new(),
                parse_error: None,
            },
        },
    }
}
