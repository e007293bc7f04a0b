use chrono::NaiveDate;

/// Optional behaviours of the form engine. Everything defaults to off.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Check well-known field ids (email, mobile, PAN, ...) on every change.
    pub realtime_validation: bool,
    /// Run the cross-field job-application rules before the final submit.
    pub cross_field_validation: bool,
    /// Fixed "today" for age and year rules; the local date when `None`.
    pub today: Option<NaiveDate>,
}

impl EngineOptions {
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
