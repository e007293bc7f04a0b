//! Cross-field plausibility rules for a job application.
//!
//! These rules look at several StepData entries at once (salary against
//! experience, graduation year against date of birth, ...). The clock is
//! always passed in so results are reproducible.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::step_data::StepData;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default inclusive age bounds for applicants.
pub const DEFAULT_MIN_AGE: i32 = 18;
pub const DEFAULT_MAX_AGE: i32 = 65;

/// Salary bands, in lakhs per annum.
pub const MIN_SALARY_LPA: f64 = 2.0;
pub const MAX_FRESHER_SALARY_LPA: f64 = 8.0;
pub const MAX_JUNIOR_SALARY_LPA: f64 = 15.0;

/// Earliest plausible graduation age.
pub const MIN_GRADUATION_AGE: i32 = 20;

/// StepData keys consulted by [`validate_job_application`].
pub const KEY_EXPECTED_SALARY: &str = "expectedSalaryCTC";
pub const KEY_TOTAL_EXPERIENCE: &str = "totalExperience";
pub const KEY_RELEVANT_EXPERIENCE: &str = "relevantExperience";
pub const KEY_GRADUATION_YEAR: &str = "graduationYear";
pub const KEY_DATE_OF_BIRTH: &str = "dateOfBirth";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Pass/fail result of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleOutcome {
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Every failing cross-field rule, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossFieldReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Individual rules
// ---------------------------------------------------------------------------

/// Completed years between `date_of_birth` and `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Whether the applicant's age falls within `min_age..=max_age`.
pub fn validate_age(date_of_birth: NaiveDate, today: NaiveDate, min_age: i32, max_age: i32) -> bool {
    (min_age..=max_age).contains(&age_on(date_of_birth, today))
}

/// Salary expectation (LPA) against total years of experience.
pub fn validate_salary_experience(salary: f64, experience: f64) -> RuleOutcome {
    if salary < MIN_SALARY_LPA {
        return RuleOutcome::fail("Salary expectation seems too low");
    }
    if experience < 1.0 && salary > MAX_FRESHER_SALARY_LPA {
        return RuleOutcome::fail("Salary expectation seems high for fresher level");
    }
    if (1.0..=3.0).contains(&experience) && salary > MAX_JUNIOR_SALARY_LPA {
        return RuleOutcome::fail("Salary expectation seems high for junior level");
    }
    RuleOutcome::pass()
}

/// Graduation year against birth year and the current year.
///
/// `birth_year` is `None` when the date of birth could not be read, in
/// which case only the future-year check applies.
pub fn validate_graduation_year(year: i32, birth_year: Option<i32>, current_year: i32) -> RuleOutcome {
    if let Some(birth_year) = birth_year {
        if i64::from(year) < i64::from(birth_year) + i64::from(MIN_GRADUATION_AGE) {
            return RuleOutcome::fail("Graduation year seems too early based on date of birth");
        }
    }
    if i64::from(year) > i64::from(current_year) + 1 {
        return RuleOutcome::fail("Graduation year cannot be in the future");
    }
    RuleOutcome::pass()
}

/// Total and relevant experience against years since graduation.
pub fn validate_experience_consistency(
    total: f64,
    relevant: f64,
    graduation_year: i32,
    current_year: i32,
) -> RuleOutcome {
    // Years are free text upstream; widen so extreme values cannot overflow.
    let years_since_graduation = (i64::from(current_year) - i64::from(graduation_year)) as f64;
    if total > years_since_graduation + 1.0 {
        return RuleOutcome::fail("Total experience cannot exceed years since graduation");
    }
    if relevant > total {
        return RuleOutcome::fail("Relevant experience cannot exceed total experience");
    }
    RuleOutcome::pass()
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Run every applicable cross-field rule over the accumulated StepData.
///
/// A rule applies only when all of its inputs are present; unparsable
/// numbers make a rule inapplicable. An unreadable date of birth fails
/// the age rule.
pub fn validate_job_application(data: &StepData, today: NaiveDate) -> CrossFieldReport {
    let mut errors = Vec::new();
    let current_year = today.year();

    let salary = number(data, KEY_EXPECTED_SALARY);
    let total = number(data, KEY_TOTAL_EXPERIENCE);
    let relevant = number(data, KEY_RELEVANT_EXPERIENCE);
    let graduation = data
        .text(KEY_GRADUATION_YEAR)
        .and_then(|s| s.trim().parse::<i32>().ok());
    let dob_text = data.text(KEY_DATE_OF_BIRTH).filter(|s| !s.trim().is_empty());
    let dob = dob_text.and_then(parse_date);

    if let (Some(salary), Some(total)) = (salary, total) {
        push_failure(&mut errors, validate_salary_experience(salary, total));
    }

    if let (Some(total), Some(relevant), Some(year)) = (total, relevant, graduation) {
        push_failure(
            &mut errors,
            validate_experience_consistency(total, relevant, year, current_year),
        );
    }

    if dob_text.is_some() {
        let in_range = dob.is_some_and(|d| validate_age(d, today, DEFAULT_MIN_AGE, DEFAULT_MAX_AGE));
        if !in_range {
            errors.push(format!(
                "Age must be between {DEFAULT_MIN_AGE} and {DEFAULT_MAX_AGE} years"
            ));
        }
    }

    if let (Some(year), Some(_)) = (graduation, dob_text) {
        push_failure(
            &mut errors,
            validate_graduation_year(year, dob.map(|d| d.year()), current_year),
        );
    }

    CrossFieldReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn number(data: &StepData, key: &str) -> Option<f64> {
    data.text(key)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn push_failure(errors: &mut Vec<String>, outcome: RuleOutcome) {
    if outcome.valid {
        return;
    }
    if let Some(message) = outcome.message {
        errors.push(message);
    }
}
