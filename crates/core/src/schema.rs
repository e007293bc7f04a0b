//! Workflow schema model.
//!
//! Mirrors the JSON document served by the workflow-definition endpoint:
//! an ordered list of steps, each holding ordered fields and optional
//! conditional fields. The definition is immutable once loaded.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Definition
// ---------------------------------------------------------------------------

/// The full multi-step form served by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,
}

impl WorkflowDefinition {
    /// Check the structural invariants the engine relies on.
    ///
    /// A definition must contain at least one step, and field ids must be
    /// unique within each step (regular and conditional fields share one
    /// namespace since both bind to the same StepData key).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.steps.is_empty() {
            return Err(CoreError::Schema(
                "Workflow definition contains no steps".to_string(),
            ));
        }

        for step in &self.steps {
            let mut seen = HashSet::new();
            for field in step.all_fields() {
                if !seen.insert(field.field_id.as_str()) {
                    return Err(CoreError::Schema(format!(
                        "Duplicate field id '{}' in step '{}'",
                        field.field_id, step.step_id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Number of steps in the workflow.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Step at a zero-based index.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Look up a step by its identifier.
    pub fn step_by_id(&self, step_id: &str) -> Result<&Step, CoreError> {
        self.steps
            .iter()
            .find(|s| s.step_id == step_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Step",
                id: step_id.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One page of the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_id: String,
    pub step_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_order: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<Field>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conditional_fields: Vec<ConditionalField>,
}

impl Step {
    /// Regular fields followed by conditional fields, in declaration order.
    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .chain(self.conditional_fields.iter().map(|c| &c.field))
    }

    /// Find any field (regular or conditional) on this step.
    pub fn find_field(&self, field_id: &str) -> Option<&Field> {
        self.all_fields().find(|f| f.field_id == field_id)
    }

    /// Whether `field_id` belongs to a conditional field on this step.
    pub fn is_conditional(&self, field_id: &str) -> bool {
        self.conditional_fields
            .iter()
            .any(|c| c.field.field_id == field_id)
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A single input on a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub field_id: String,
    pub field_name: String,
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl Field {
    /// Convenience constructor used by tests and builders.
    pub fn new(
        field_id: impl Into<String>,
        field_name: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            field_name: field_name.into(),
            field_type,
            required: false,
            placeholder: None,
            options: Vec::new(),
            validation: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(value, label)| FieldOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        self
    }

    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }
}

/// A field that is only shown while its [`Condition`] holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalField {
    #[serde(flatten)]
    pub field: Field,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

/// One selectable choice of a dropdown, radio or checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Declarative per-field validation rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

// ---------------------------------------------------------------------------
// Field type
// ---------------------------------------------------------------------------

/// Input control kind. Unknown type names are preserved in
/// [`FieldType::Unsupported`] so they can be reported instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Textarea,
    Dropdown,
    Radio,
    Checkbox,
    Unsupported(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Date => "date",
            Self::Textarea => "textarea",
            Self::Dropdown => "dropdown",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Unsupported(name) => name,
        }
    }

    /// Whether values of this type are stored as a list.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "number" => Self::Number,
            "date" => Self::Date,
            "textarea" => Self::Textarea,
            "dropdown" => Self::Dropdown,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            _ => Self::Unsupported(s),
        }
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::Unsupported(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// Visibility predicate over another field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub depends_on: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub operator: Operator,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    /// Any operator the engine does not know; evaluates as always visible.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// Treat an explicit JSON `null` like a missing key. The backend serializes
/// every unset property as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
