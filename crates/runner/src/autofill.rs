//! Answer files and the step-by-step autofill loop.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use jobflow_client::{ApplicationApi, ApplicationResponse};
use jobflow_core::schema::{Field, FieldType, Step};
use jobflow_core::step_data::FieldInput;
use jobflow_core::validation::formats;
use jobflow_engine::{EngineError, RenderSurface, WorkflowManager};

#[derive(Debug, thiserror::Error)]
pub enum AnswersError {
    #[error("Failed to read answers file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Answers file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Answers file must contain a JSON object keyed by field id")]
    NotAnObject,

    #[error("Unsupported answer for '{field}': {kind}")]
    Unsupported { field: String, kind: &'static str },
}

/// One answer: a single value, or the checked options of a checkbox group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    One(String),
    Many(Vec<String>),
}

/// Answers keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers(BTreeMap<String, Answer>);

impl Answers {
    pub fn load(path: &Path) -> Result<Self, AnswersError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(serde_json::from_str(&text)?)
    }

    /// Strings are sanitized; numbers and booleans are stringified;
    /// arrays become multi-valued answers. `null` entries are skipped.
    pub fn from_json(value: Value) -> Result<Self, AnswersError> {
        let Value::Object(entries) = value else {
            return Err(AnswersError::NotAnObject);
        };

        let mut answers = BTreeMap::new();
        for (field, value) in entries {
            let answer = match value {
                Value::Null => continue,
                Value::Array(items) => Answer::Many(
                    items
                        .into_iter()
                        .map(|item| scalar(&field, item))
                        .collect::<Result<_, _>>()?,
                ),
                other => Answer::One(scalar(&field, other)?),
            };
            answers.insert(field, answer);
        }
        Ok(Self(answers))
    }

    pub fn get(&self, field_id: &str) -> Option<&Answer> {
        self.0.get(field_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Control events that fill `step`: regular fields first, then
    /// conditional fields, each in declaration order. Fields without an
    /// answer are left untouched.
    pub fn inputs_for(&self, step: &Step) -> Vec<(String, FieldInput)> {
        let mut inputs = Vec::new();
        for field in step.all_fields() {
            if let Some(answer) = self.get(&field.field_id) {
                push_inputs(&mut inputs, field, answer);
            }
        }
        inputs
    }
}

fn scalar(field: &str, value: Value) -> Result<String, AnswersError> {
    match value {
        Value::String(s) => Ok(formats::sanitize_input(&s)),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(unsupported(field, "null inside a list")),
        Value::Array(_) => Err(unsupported(field, "nested list")),
        Value::Object(_) => Err(unsupported(field, "object")),
    }
}

fn unsupported(field: &str, kind: &'static str) -> AnswersError {
    AnswersError::Unsupported {
        field: field.to_string(),
        kind,
    }
}

fn push_inputs(inputs: &mut Vec<(String, FieldInput)>, field: &Field, answer: &Answer) {
    let id = field.field_id.clone();
    match (&field.field_type, answer) {
        (FieldType::Checkbox, Answer::Many(values)) => {
            for value in values {
                inputs.push((
                    id.clone(),
                    FieldInput::Toggle {
                        value: value.clone(),
                        checked: true,
                    },
                ));
            }
        }
        (FieldType::Checkbox, Answer::One(value)) => inputs.push((
            id,
            FieldInput::Toggle {
                value: value.clone(),
                checked: true,
            },
        )),
        (_, Answer::One(value)) => inputs.push((id, FieldInput::Value(value.clone()))),
        (_, Answer::Many(values)) => inputs.push((id, FieldInput::Value(values.join(",")))),
    }
}

/// Fill and submit every step, starting from the manager's active step.
///
/// The manager must already be initialized. Stops at the first step the
/// form or the backend refuses.
pub async fn drive<A, S>(
    manager: &mut WorkflowManager<A, S>,
    answers: &Answers,
) -> Result<ApplicationResponse, EngineError>
where
    A: ApplicationApi,
    S: RenderSurface,
{
    loop {
        let step = manager
            .current_step()
            .cloned()
            .ok_or(EngineError::NotInitialized)?;
        let inputs = answers.inputs_for(&step);
        tracing::info!(step = %step.step_id, answers = inputs.len(), "Filling step");

        for (field_id, input) in inputs {
            manager.handle_field_change(&field_id, input)?;
        }

        let last = manager.current_step_index() == Some(manager.definition().step_count() - 1);
        if last {
            return manager.submit().await;
        }
        manager.next().await?;
    }
}
