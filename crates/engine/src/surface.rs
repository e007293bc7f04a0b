//! Rendering surface abstraction.
//!
//! The manager never touches a document directly. Everything it wants to
//! show goes through [`RenderSurface`], which a browser binding, a terminal
//! front end or a test double can implement.

use std::collections::BTreeMap;

use serde_json::json;

/// Severity of a global message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Position of a step relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStatus {
    Completed,
    Active,
    Pending,
}

/// One entry of the step progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIndicator {
    /// 1-based step number.
    pub number: usize,
    pub name: String,
    pub status: IndicatorStatus,
}

/// State of the previous / next / submit buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub previous_enabled: bool,
    pub show_next: bool,
    pub show_submit: bool,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

/// Where the manager draws the form.
pub trait RenderSurface {
    /// Replace the step indicators and the progress fill (0-100).
    fn render_progress(&mut self, indicators: &[StepIndicator], percent: f64);

    /// Replace the active step's markup.
    fn render_step(&mut self, markup: &str);

    /// Reveal a conditional field's container with freshly rendered markup.
    fn show_conditional(&mut self, field_id: &str, markup: &str);

    /// Hide a conditional field's container.
    fn hide_conditional(&mut self, field_id: &str);

    /// Write `message` into the `{fieldId}-error` slot and flag the control.
    fn show_field_error(&mut self, field_id: &str, message: &str);

    fn clear_field_error(&mut self, field_id: &str);

    /// Clear every error slot and control decoration on the step.
    fn clear_all_errors(&mut self);

    /// Show a global message.
    fn show_message(&mut self, kind: MessageKind, message: &str);

    fn update_navigation(&mut self, navigation: &NavigationState);

    /// Stop accepting input after the final submission.
    fn lock_form(&mut self);
}

/// In-memory surface that keeps the latest state of every region.
///
/// Useful headless and in tests: every call simply overwrites (or appends
/// to) the matching field.
#[derive(Debug, Clone, Default)]
pub struct MarkupSurface {
    pub indicators: Vec<StepIndicator>,
    pub progress_percent: f64,
    pub step_markup: String,
    /// Conditional field id → current container markup, `None` when hidden.
    pub conditionals: BTreeMap<String, Option<String>>,
    pub field_errors: BTreeMap<String, String>,
    pub messages: Vec<(MessageKind, String)>,
    pub navigation: Option<NavigationState>,
    pub locked: bool,
    pub render_count: usize,
}

impl MarkupSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent global message.
    pub fn last_message(&self) -> Option<&(MessageKind, String)> {
        self.messages.last()
    }

    pub fn field_error(&self, field_id: &str) -> Option<&str> {
        self.field_errors.get(field_id).map(String::as_str)
    }

    /// Whether a conditional field is currently shown.
    pub fn is_shown(&self, field_id: &str) -> bool {
        matches!(self.conditionals.get(field_id), Some(Some(_)))
    }

    /// JSON snapshot of the surface, for logging.
    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "progress": self.progress_percent,
            "steps": self.indicators.iter().map(|i| &i.name).collect::<Vec<_>>(),
            "errors": self.field_errors,
            "messages": self
                .messages
                .iter()
                .map(|(kind, text)| json!({ "kind": kind.as_str(), "text": text }))
                .collect::<Vec<_>>(),
            "locked": self.locked,
        })
    }
}

impl RenderSurface for MarkupSurface {
    fn render_progress(&mut self, indicators: &[StepIndicator], percent: f64) {
        self.indicators = indicators.to_vec();
        self.progress_percent = percent;
    }

    fn render_step(&mut self, markup: &str) {
        self.step_markup = markup.to_string();
        self.conditionals.clear();
        self.field_errors.clear();
        self.render_count += 1;
    }

    fn show_conditional(&mut self, field_id: &str, markup: &str) {
        self.conditionals
            .insert(field_id.to_string(), Some(markup.to_string()));
    }

    fn hide_conditional(&mut self, field_id: &str) {
        self.conditionals.insert(field_id.to_string(), None);
    }

    fn show_field_error(&mut self, field_id: &str, message: &str) {
        self.field_errors
            .insert(field_id.to_string(), message.to_string());
    }

    fn clear_field_error(&mut self, field_id: &str) {
        self.field_errors.remove(field_id);
    }

    fn clear_all_errors(&mut self) {
        self.field_errors.clear();
    }

    fn show_message(&mut self, kind: MessageKind, message: &str) {
        self.messages.push((kind, message.to_string()));
    }

    fn update_navigation(&mut self, navigation: &NavigationState) {
        self.navigation = Some(navigation.clone());
    }

    fn lock_form(&mut self) {
        self.locked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_step_resets_step_scoped_state() {
        let mut surface = MarkupSurface::new();
        surface.show_field_error("a", "A is required");
        surface.show_conditional("b", "<div/>");
        surface.render_step("<form/>");

        assert_eq!(surface.step_markup, "<form/>");
        assert!(surface.field_errors.is_empty());
        assert!(surface.conditionals.is_empty());
        assert_eq!(surface.render_count, 1);
    }

    #[test]
    fn conditional_visibility_tracking() {
        let mut surface = MarkupSurface::new();
        surface.show_conditional("degree", "<input/>");
        assert!(surface.is_shown("degree"));
        surface.hide_conditional("degree");
        assert!(!surface.is_shown("degree"));
        assert!(!surface.is_shown("unknown"));
    }

    #[test]
    fn snapshot_lists_messages() {
        let mut surface = MarkupSurface::new();
        surface.show_message(MessageKind::Error, "boom");
        let snap = surface.snapshot();
        assert_eq!(snap["messages"][0]["kind"], "error");
        assert_eq!(snap["messages"][0]["text"], "boom");
    }
}
