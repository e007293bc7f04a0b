//! Workflow navigation controller.
//!
//! State machine over the steps of a [`WorkflowDefinition`]:
//!
//! ```text
//! Uninitialized --initialize--> Step(0) --next--> Step(1) ... Step(n-1) --submit--> Submitted
//!                                  ^----previous----'
//! ```
//!
//! `next` and `submit` validate the active step and POST the accumulated
//! StepData; the index only moves once the backend accepts it. `previous`
//! never validates or resubmits. Transitions take `&mut self`, so a
//! second transition cannot start while a submission is in flight.

use std::collections::HashMap;

use jobflow_client::{ApplicationApi, ApplicationId, ApplicationResponse};
use jobflow_core::condition;
use jobflow_core::error::CoreError;
use jobflow_core::render;
use jobflow_core::schema::{Field, Step, WorkflowDefinition};
use jobflow_core::step_data::{FieldInput, StepData};
use jobflow_core::validation::cross_field;
use jobflow_core::validation::field::{validate_field, FieldViolation};
use jobflow_core::validation::realtime;

use crate::error::EngineError;
use crate::options::EngineOptions;
use crate::surface::{IndicatorStatus, MessageKind, NavigationState, RenderSurface, StepIndicator};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const MSG_LOAD_FAILED: &str = "Failed to load workflow. Please refresh the page.";
pub const MSG_STEP_COMPLETED: &str = "Step completed successfully!";
pub const MSG_SUBMITTED: &str = "Application submitted successfully! Thank you for applying.";
pub const MSG_STEP_FALLBACK: &str = "Failed to submit step";
pub const MSG_SUBMIT_FALLBACK: &str = "Failed to submit application";

const LABEL_SUBMIT: &str = "Submit Application";
const LABEL_SUBMITTED: &str = "Application Submitted";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Uninitialized,
    /// Zero-based index of the active step.
    Step(usize),
    Submitted,
}

/// Drives one application session over an API client and a surface.
pub struct WorkflowManager<A, S> {
    api: A,
    surface: S,
    options: EngineOptions,
    definition: WorkflowDefinition,
    application_id: Option<ApplicationId>,
    data: StepData,
    state: NavState,
    /// Last visibility published for each conditional field of the active step.
    visibility: HashMap<String, bool>,
}

impl<A: ApplicationApi, S: RenderSurface> WorkflowManager<A, S> {
    pub fn new(api: A, surface: S, options: EngineOptions) -> Self {
        Self {
            api,
            surface,
            options,
            definition: WorkflowDefinition::default(),
            application_id: None,
            data: StepData::new(),
            state: NavState::Uninitialized,
            visibility: HashMap::new(),
        }
    }

    // ---- accessors ----

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn current_step_index(&self) -> Option<usize> {
        match self.state {
            NavState::Step(i) => Some(i),
            _ => None,
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.current_step_index()
            .and_then(|i| self.definition.step(i))
    }

    pub fn is_submitted(&self) -> bool {
        self.state == NavState::Submitted
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    pub fn application_id(&self) -> Option<&ApplicationId> {
        self.application_id.as_ref()
    }

    pub fn step_data(&self) -> &StepData {
        &self.data
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // ---- initialization ----

    /// Fetch the definition, start a session and render the first step.
    ///
    /// Any failure shows a blocking message and leaves the manager
    /// uninitialized.
    pub async fn initialize(&mut self) -> Result<(), EngineError> {
        match self.load().await {
            Ok(()) => {
                self.state = NavState::Step(0);
                self.render();
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize workflow");
                self.surface.show_message(MessageKind::Error, MSG_LOAD_FAILED);
                Err(e)
            }
        }
    }

    async fn load(&mut self) -> Result<(), EngineError> {
        let definition = self
            .api
            .fetch_workflow_definition()
            .await
            .map_err(EngineError::Initialization)?;
        if definition.steps.is_empty() {
            return Err(EngineError::EmptyWorkflow);
        }
        definition.validate()?;
        tracing::info!(
            workflow = definition.workflow_id.as_deref().unwrap_or("-"),
            steps = definition.step_count(),
            "Workflow definition loaded"
        );

        let id = self
            .api
            .start_application()
            .await
            .map_err(EngineError::Initialization)?;
        tracing::info!(application_id = %id, "Application session started");
        self.surface.show_message(
            MessageKind::Success,
            &format!("Application started successfully! ID: {id}"),
        );

        self.definition = definition;
        self.application_id = Some(id);
        self.data = StepData::new();
        Ok(())
    }

    // ---- rendering ----

    fn render(&mut self) {
        let NavState::Step(index) = self.state else {
            return;
        };
        let Some(step) = self.definition.step(index) else {
            return;
        };

        let total = self.definition.step_count();
        let indicators: Vec<StepIndicator> = self
            .definition
            .steps
            .iter()
            .enumerate()
            .map(|(i, s)| StepIndicator {
                number: i + 1,
                name: s.step_name.clone(),
                status: match i.cmp(&index) {
                    std::cmp::Ordering::Less => IndicatorStatus::Completed,
                    std::cmp::Ordering::Equal => IndicatorStatus::Active,
                    std::cmp::Ordering::Greater => IndicatorStatus::Pending,
                },
            })
            .collect();
        let percent = (index + 1) as f64 / total as f64 * 100.0;
        self.surface.render_progress(&indicators, percent);

        // Hidden conditional fields lose their value before the first paint.
        let shown = condition::visibility(step, &self.data);
        for (conditional, visible) in &shown {
            if !visible {
                self.data.remove(&conditional.field.field_id);
            }
        }
        let markup = render::render_step(step, &self.data, |id| {
            shown
                .iter()
                .any(|(c, v)| *v && c.field.field_id == id)
        });
        self.surface.render_step(&markup);

        self.visibility.clear();
        for (conditional, visible) in &shown {
            let id = &conditional.field.field_id;
            if *visible {
                self.surface
                    .show_conditional(id, &render::render_field(&conditional.field, &self.data));
            } else {
                self.surface.hide_conditional(id);
            }
            self.visibility.insert(id.clone(), *visible);
        }

        tracing::debug!(step = %step.step_id, index, "Rendered step");
        self.publish_navigation();
    }

    fn publish_navigation(&mut self) {
        let last = self.definition.step_count().saturating_sub(1);
        let navigation = match self.state {
            NavState::Step(index) => NavigationState {
                previous_enabled: index > 0,
                show_next: index < last,
                show_submit: index == last,
                submit_enabled: true,
                submit_label: LABEL_SUBMIT,
            },
            NavState::Submitted => NavigationState {
                previous_enabled: false,
                show_next: false,
                show_submit: true,
                submit_enabled: false,
                submit_label: LABEL_SUBMITTED,
            },
            NavState::Uninitialized => return,
        };
        self.surface.update_navigation(&navigation);
    }

    // ---- field events ----

    /// Record a control change on the active step.
    ///
    /// Clears the field's error, optionally checks its format, and
    /// re-evaluates every conditional field of the step.
    pub fn handle_field_change(&mut self, field_id: &str, input: FieldInput) -> Result<(), EngineError> {
        let index = self.active_index()?;
        let step = self
            .definition
            .step(index)
            .ok_or(EngineError::NotInitialized)?;
        let field = step.find_field(field_id).ok_or_else(|| {
            EngineError::Core(CoreError::NotFound {
                entity: "Field",
                id: field_id.to_string(),
            })
        })?;

        tracing::debug!(field = %field_id, input = ?input, "Field changed");
        self.data.record(field, input);
        self.surface.clear_field_error(field_id);

        if self.options.realtime_validation {
            if let Some(hint) = self
                .data
                .text(field_id)
                .and_then(|v| realtime::format_hint(field_id, v))
            {
                self.surface.show_field_error(field_id, hint);
            }
        }

        self.refresh_conditionals(index);
        Ok(())
    }

    /// Convenience for text-like controls, dropdowns and radios.
    pub fn set_value(&mut self, field_id: &str, value: impl Into<String>) -> Result<(), EngineError> {
        self.handle_field_change(field_id, FieldInput::Value(value.into()))
    }

    /// Convenience for one checkbox of a group.
    pub fn toggle_option(
        &mut self,
        field_id: &str,
        value: impl Into<String>,
        checked: bool,
    ) -> Result<(), EngineError> {
        self.handle_field_change(
            field_id,
            FieldInput::Toggle {
                value: value.into(),
                checked,
            },
        )
    }

    fn refresh_conditionals(&mut self, index: usize) {
        let Some(step) = self.definition.step(index) else {
            return;
        };

        for conditional in &step.conditional_fields {
            let id = &conditional.field.field_id;
            let visible = condition::evaluate(conditional.condition.as_ref(), &self.data);
            let was_visible = self.visibility.get(id).copied();

            if !visible {
                if self.data.remove(id).is_some() {
                    tracing::debug!(field = %id, "Cleared value of hidden conditional field");
                }
                if was_visible != Some(false) {
                    self.surface.hide_conditional(id);
                }
            } else if was_visible != Some(true) {
                let markup = render::render_field(&conditional.field, &self.data);
                self.surface.show_conditional(id, &markup);
            }
            self.visibility.insert(id.clone(), visible);
        }
    }

    // ---- validation ----

    /// Validate one field of the active step, writing or clearing its
    /// inline error. Returns whether it passed.
    pub fn validate_field(&mut self, field_id: &str) -> Result<bool, EngineError> {
        let index = self.active_index()?;
        let field = self
            .definition
            .step(index)
            .and_then(|s| s.find_field(field_id))
            .ok_or_else(|| {
                EngineError::Core(CoreError::NotFound {
                    entity: "Field",
                    id: field_id.to_string(),
                })
            })?;
        Ok(check_field(&mut self.surface, field, &self.data).is_ok())
    }

    /// Validate every regular field and every visible conditional field of
    /// the active step. All fields are checked; nothing short-circuits.
    pub fn validate_current_step(&mut self) -> bool {
        self.step_violations().is_empty()
    }

    fn step_violations(&mut self) -> Vec<FieldViolation> {
        let Some(step) = self.current_step_index().and_then(|i| self.definition.step(i)) else {
            return Vec::new();
        };
        tracing::debug!(step = %step.step_id, "Validating step");

        self.surface.clear_all_errors();
        let mut violations = Vec::new();

        for field in &step.fields {
            if let Err(v) = check_field(&mut self.surface, field, &self.data) {
                violations.push(v);
            }
        }
        for conditional in &step.conditional_fields {
            let visible = self
                .visibility
                .get(&conditional.field.field_id)
                .copied()
                .unwrap_or_else(|| condition::evaluate(conditional.condition.as_ref(), &self.data));
            if !visible {
                continue;
            }
            if let Err(v) = check_field(&mut self.surface, &conditional.field, &self.data) {
                violations.push(v);
            }
        }

        violations
    }

    // ---- navigation ----

    /// Validate, submit the active step, and advance on success.
    ///
    /// Returns the new step index.
    pub async fn next(&mut self) -> Result<usize, EngineError> {
        let index = self.active_index()?;
        if index + 1 >= self.definition.step_count() {
            return Err(EngineError::OnLastStep);
        }

        self.submit_active(index, MSG_STEP_FALLBACK).await?;

        self.state = NavState::Step(index + 1);
        self.render();
        self.surface.show_message(MessageKind::Success, MSG_STEP_COMPLETED);
        tracing::info!(from = index, to = index + 1, "Advanced to next step");
        Ok(index + 1)
    }

    /// Go back one step (floor 0) without validating or submitting.
    pub fn previous(&mut self) -> Result<usize, EngineError> {
        let index = self.active_index()?;
        if index == 0 {
            return Ok(0);
        }
        self.state = NavState::Step(index - 1);
        self.render();
        tracing::info!(from = index, to = index - 1, "Returned to previous step");
        Ok(index - 1)
    }

    /// Validate and submit the last step, completing the application.
    pub async fn submit(&mut self) -> Result<ApplicationResponse, EngineError> {
        let index = self.active_index()?;
        if index + 1 != self.definition.step_count() {
            return Err(EngineError::NotOnLastStep);
        }

        let response = self.submit_active(index, MSG_SUBMIT_FALLBACK).await?;

        self.state = NavState::Submitted;
        self.surface.show_message(MessageKind::Success, MSG_SUBMITTED);
        self.surface.lock_form();
        self.publish_navigation();
        tracing::info!(
            application_id = %self.application_id.as_ref().map(ApplicationId::as_str).unwrap_or("-"),
            "Application submitted"
        );
        Ok(response)
    }

    /// Shared validate-then-POST contract of `next` and `submit`.
    async fn submit_active(
        &mut self,
        index: usize,
        fallback: &str,
    ) -> Result<ApplicationResponse, EngineError> {
        let violations = self.step_violations();
        if !violations.is_empty() {
            let fields: Vec<String> = violations.into_iter().map(|v| v.field).collect();
            tracing::debug!(?fields, "Step validation failed");
            return Err(EngineError::ValidationFailed { fields });
        }

        let is_last = index + 1 == self.definition.step_count();
        if is_last && self.options.cross_field_validation {
            let report = cross_field::validate_job_application(&self.data, self.options.today());
            if !report.valid {
                self.surface
                    .show_message(MessageKind::Error, &report.errors.join(" "));
                return Err(EngineError::CrossFieldFailed {
                    errors: report.errors,
                });
            }
        }

        let step_id = self
            .definition
            .step(index)
            .map(|s| s.step_id.clone())
            .ok_or(EngineError::NotInitialized)?;
        let application_id = self
            .application_id
            .clone()
            .ok_or(EngineError::NotInitialized)?;
        let submission = self.data.to_submission(&step_id);

        match self.api.submit_step(&application_id, &submission).await {
            Ok(response) => {
                tracing::info!(step = %step_id, "Step accepted by backend");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(step = %step_id, error = %e, "Step submission failed");
                self.surface
                    .show_message(MessageKind::Error, &e.user_message(fallback));
                Err(EngineError::Submission(e))
            }
        }
    }

    fn active_index(&self) -> Result<usize, EngineError> {
        match self.state {
            NavState::Step(i) => Ok(i),
            NavState::Uninitialized => Err(EngineError::NotInitialized),
            NavState::Submitted => Err(EngineError::AlreadySubmitted),
        }
    }
}

/// Run the field validator and mirror the outcome onto the surface.
fn check_field<S: RenderSurface>(
    surface: &mut S,
    field: &Field,
    data: &StepData,
) -> Result<(), FieldViolation> {
    match validate_field(field, data.get(&field.field_id)) {
        Ok(()) => {
            surface.clear_field_error(&field.field_id);
            Ok(())
        }
        Err(violation) => {
            surface.show_field_error(&field.field_id, &violation.message);
            Err(violation)
        }
    }
}
