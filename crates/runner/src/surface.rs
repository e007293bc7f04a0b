use jobflow_engine::{
    IndicatorStatus, MarkupSurface, MessageKind, NavigationState, RenderSurface, StepIndicator,
};

/// Surface that reports every update through `tracing` and keeps the
/// latest state in a [`MarkupSurface`].
#[derive(Debug, Default)]
pub struct LogSurface {
    inner: MarkupSurface,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MarkupSurface {
        &self.inner
    }
}

impl RenderSurface for LogSurface {
    fn render_progress(&mut self, indicators: &[StepIndicator], percent: f64) {
        if let Some(active) = indicators
            .iter()
            .find(|i| i.status == IndicatorStatus::Active)
        {
            tracing::info!(
                step = active.number,
                of = indicators.len(),
                name = %active.name,
                progress = format_args!("{percent:.0}%"),
                "Step"
            );
        }
        self.inner.render_progress(indicators, percent);
    }

    fn render_step(&mut self, markup: &str) {
        tracing::debug!(bytes = markup.len(), "Step markup rendered");
        self.inner.render_step(markup);
    }

    fn show_conditional(&mut self, field_id: &str, markup: &str) {
        tracing::debug!(field = %field_id, "Conditional field shown");
        self.inner.show_conditional(field_id, markup);
    }

    fn hide_conditional(&mut self, field_id: &str) {
        tracing::debug!(field = %field_id, "Conditional field hidden");
        self.inner.hide_conditional(field_id);
    }

    fn show_field_error(&mut self, field_id: &str, message: &str) {
        tracing::warn!(field = %field_id, %message, "Field error");
        self.inner.show_field_error(field_id, message);
    }

    fn clear_field_error(&mut self, field_id: &str) {
        self.inner.clear_field_error(field_id);
    }

    fn clear_all_errors(&mut self) {
        self.inner.clear_all_errors();
    }

    fn show_message(&mut self, kind: MessageKind, message: &str) {
        match kind {
            MessageKind::Error => tracing::error!(%message, "Form message"),
            MessageKind::Info | MessageKind::Success => tracing::info!(%message, "Form message"),
        }
        self.inner.show_message(kind, message);
    }

    fn update_navigation(&mut self, navigation: &NavigationState) {
        self.inner.update_navigation(navigation);
    }

    fn lock_form(&mut self) {
        tracing::info!("Form locked");
        self.inner.lock_form();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_reach_the_inner_state() {
        let mut surface = LogSurface::new();
        surface.show_field_error("email", "Email is required");
        surface.show_message(MessageKind::Error, "Failed to submit step");
        surface.lock_form();

        let state = surface.state();
        assert_eq!(state.field_error("email"), Some("Email is required"));
        assert_eq!(state.messages.len(), 1);
        assert!(state.locked);
    }
}
