//! Per-session value store.
//!
//! [`StepData`] accumulates every value the applicant enters, keyed by
//! field id, across all steps of one application. Scalar controls store a
//! string; checkbox groups store the ordered list of checked option values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{Field, FieldType};

/// A stored field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Empty string, whitespace-only string, or empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::List(items) => Some(items),
        }
    }

    /// Whether this value selects `candidate` (exact string equality).
    pub fn selects(&self, candidate: &str) -> bool {
        match self {
            Self::Text(s) => s == candidate,
            Self::List(items) => items.iter().any(|i| i == candidate),
        }
    }

    /// String form used by length and pattern checks. Lists join with `,`.
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(","),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// A change coming from an input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// New raw value of a text-like control, dropdown, or the selected radio.
    Value(String),
    /// One checkbox of a group was checked or unchecked.
    Toggle { value: String, checked: bool },
}

/// Field id → value map for one application session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepData(BTreeMap<String, FieldValue>);

impl StepData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.0.get(field_id)
    }

    pub fn text(&self, field_id: &str) -> Option<&str> {
        self.get(field_id).and_then(FieldValue::as_text)
    }

    pub fn set(&mut self, field_id: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field_id.into(), value.into());
    }

    /// Delete a stored value, returning what was there.
    pub fn remove(&mut self, field_id: &str) -> Option<FieldValue> {
        self.0.remove(field_id)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.0.contains_key(field_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Whether the field has no value, a blank string, or an empty list.
    pub fn is_blank(&self, field_id: &str) -> bool {
        self.get(field_id).map_or(true, FieldValue::is_blank)
    }

    /// Apply a control change for `field`.
    ///
    /// Checkbox groups recompute their full checked set, ordered as the
    /// field's options are declared; every other type stores the raw string.
    pub fn record(&mut self, field: &Field, input: FieldInput) {
        match (&field.field_type, input) {
            (FieldType::Checkbox, FieldInput::Toggle { value, checked }) => {
                self.toggle(field, value, checked);
            }
            (FieldType::Checkbox, FieldInput::Value(value)) => {
                self.toggle(field, value, true);
            }
            (_, FieldInput::Toggle { value, checked }) => {
                let stored = if checked { value } else { String::new() };
                self.set(field.field_id.clone(), stored);
            }
            (_, FieldInput::Value(value)) => {
                self.set(field.field_id.clone(), value);
            }
        }
    }

    fn toggle(&mut self, field: &Field, value: String, checked: bool) {
        let mut current: Vec<String> = self
            .get(&field.field_id)
            .and_then(FieldValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        current.retain(|v| *v != value);
        if checked {
            current.push(value);
        }

        // Declared option order first, then anything not among the options.
        let mut ordered: Vec<String> = field
            .options
            .iter()
            .filter(|o| current.contains(&o.value))
            .map(|o| o.value.clone())
            .collect();
        ordered.extend(
            current
                .into_iter()
                .filter(|v| !field.options.iter().any(|o| o.value == *v)),
        );

        self.set(field.field_id.clone(), FieldValue::List(ordered));
    }

    /// Build the submission body: `{currentStep, ...values}`.
    ///
    /// Stored values are spread after the step tag, so a field literally
    /// named `currentStep` overrides it.
    pub fn to_submission(&self, step_id: &str) -> serde_json::Map<String, serde_json::Value> {
        let mut body = serde_json::Map::new();
        body.insert(
            "currentStep".to_string(),
            serde_json::Value::String(step_id.to_string()),
        );
        for (key, value) in &self.0 {
            let json = match value {
                FieldValue::Text(s) => serde_json::Value::String(s.clone()),
                FieldValue::List(items) => serde_json::Value::Array(
                    items
                        .iter()
                        .map(|i| serde_json::Value::String(i.clone()))
                        .collect(),
                ),
            };
            body.insert(key.clone(), json);
        }
        body
    }
}
