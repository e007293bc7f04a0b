//! Per-field validator -- pure logic, no rendering.
//!
//! Checks run in a fixed order and stop at the first failure:
//! required, pattern, minimum length, maximum length, then numeric parse
//! and bounds for `number` fields. Optional fields left blank skip
//! everything after the required check.
//!
//! Numbers must parse in full after trimming: `"5 years"` is not a number.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::{Field, FieldType, FieldValidation};
use crate::step_data::FieldValue;

/// Which check rejected the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    Required,
    Pattern,
    MinLength,
    MaxLength,
    Number,
    Min,
    Max,
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule: FieldRule,
    pub message: String,
}

/// Validate one field's current value.
pub fn validate_field(field: &Field, value: Option<&FieldValue>) -> Result<(), FieldViolation> {
    let blank = value.map_or(true, FieldValue::is_blank);

    if blank {
        if field.required {
            return Err(violation(
                field,
                FieldRule::Required,
                format!("{} is required", field.field_name),
            ));
        }
        return Ok(());
    }

    let Some(value) = value else {
        return Ok(());
    };
    let plain = value.to_plain_string();
    let trimmed = plain.trim();

    if let Some(rules) = &field.validation {
        check_pattern(field, rules, trimmed)?;
        check_length(field, rules, trimmed)?;
    }

    if field.field_type == FieldType::Number {
        check_number(field, field.validation.as_ref(), trimmed)?;
    }

    Ok(())
}

fn violation(field: &Field, rule: FieldRule, message: String) -> FieldViolation {
    FieldViolation {
        field: field.field_id.clone(),
        rule,
        message,
    }
}

fn check_pattern(field: &Field, rules: &FieldValidation, value: &str) -> Result<(), FieldViolation> {
    let Some(pattern) = rules.pattern.as_deref() else {
        return Ok(());
    };
    match Regex::new(pattern) {
        Ok(re) if re.is_match(value) => Ok(()),
        Ok(_) => Err(violation(
            field,
            FieldRule::Pattern,
            format!("{} format is invalid", field.field_name),
        )),
        Err(e) => {
            tracing::warn!(field = %field.field_id, %pattern, error = %e, "Ignoring invalid field pattern");
            Ok(())
        }
    }
}

fn check_length(field: &Field, rules: &FieldValidation, value: &str) -> Result<(), FieldViolation> {
    let len = value.chars().count();

    if let Some(min) = rules.min_length.filter(|m| *m > 0) {
        if len < min {
            return Err(violation(
                field,
                FieldRule::MinLength,
                format!("{} must be at least {min} characters", field.field_name),
            ));
        }
    }

    // A zero maximum is treated as "no maximum".
    if let Some(max) = rules.max_length.filter(|m| *m > 0) {
        if len > max {
            return Err(violation(
                field,
                FieldRule::MaxLength,
                format!("{} must not exceed {max} characters", field.field_name),
            ));
        }
    }

    Ok(())
}

fn check_number(
    field: &Field,
    rules: Option<&FieldValidation>,
    value: &str,
) -> Result<(), FieldViolation> {
    let num = match value.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => {
            return Err(violation(
                field,
                FieldRule::Number,
                format!("{} must be a valid number", field.field_name),
            ))
        }
    };

    if let Some(min) = rules.and_then(|r| r.min) {
        if num < min {
            return Err(violation(
                field,
                FieldRule::Min,
                format!("{} must be at least {min}", field.field_name),
            ));
        }
    }

    if let Some(max) = rules.and_then(|r| r.max) {
        if num > max {
            return Err(violation(
                field,
                FieldRule::Max,
                format!("{} must not exceed {max}", field.field_name),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &str) -> FieldValue {
        FieldValue::from(v)
    }

    fn rule_of(field: &Field, value: Option<&FieldValue>) -> Option<FieldRule> {
        validate_field(field, value).err().map(|v| v.rule)
    }

    // -- required --

    #[test]
    fn required_rejects_missing_empty_and_whitespace() {
        let field = Field::new("fullName", "Full Name", FieldType::Text).required();
        assert_eq!(rule_of(&field, None), Some(FieldRule::Required));
        assert_eq!(rule_of(&field, Some(&text(""))), Some(FieldRule::Required));
        assert_eq!(rule_of(&field, Some(&text("  \n "))), Some(FieldRule::Required));
        assert!(validate_field(&field, Some(&text("Jane"))).is_ok());
    }

    #[test]
    fn required_message_uses_field_name() {
        let field = Field::new("fullName", "Full Name", FieldType::Text).required();
        let err = validate_field(&field, None).unwrap_err();
        assert_eq!(err.message, "Full Name is required");
        assert_eq!(err.field, "fullName");
    }

    #[test]
    fn required_wins_over_other_rules() {
        let field = Field::new("code", "Code", FieldType::Text)
            .required()
            .with_validation(FieldValidation {
                pattern: Some("^[A-Z]+$".into()),
                min_length: Some(3),
                ..Default::default()
            });
        assert_eq!(rule_of(&field, Some(&text(" "))), Some(FieldRule::Required));
    }

    #[test]
    fn required_checkbox_rejects_empty_list() {
        let field = Field::new("skills", "Skills", FieldType::Checkbox).required();
        assert_eq!(
            rule_of(&field, Some(&FieldValue::List(vec![]))),
            Some(FieldRule::Required)
        );
        assert!(validate_field(&field, Some(&FieldValue::List(vec!["rust".into()]))).is_ok());
    }

    #[test]
    fn optional_blank_skips_all_rules() {
        let field = Field::new("age", "Age", FieldType::Number).with_validation(FieldValidation {
            pattern: Some("^\\d+$".into()),
            min: Some(18.0),
            ..Default::default()
        });
        assert!(validate_field(&field, None).is_ok());
        assert!(validate_field(&field, Some(&text("   "))).is_ok());
    }

    // -- pattern & length --

    #[test]
    fn pattern_tested_against_trimmed_value() {
        let field = Field::new("pan", "PAN", FieldType::Text).with_validation(FieldValidation {
            pattern: Some("^[A-Z]{5}[0-9]{4}[A-Z]$".into()),
            ..Default::default()
        });
        assert!(validate_field(&field, Some(&text("  ABCDE1234F "))).is_ok());
        let err = validate_field(&field, Some(&text("abcde1234f"))).unwrap_err();
        assert_eq!(err.rule, FieldRule::Pattern);
        assert_eq!(err.message, "PAN format is invalid");
    }

    #[test]
    fn invalid_pattern_is_skipped() {
        let field = Field::new("x", "X", FieldType::Text).with_validation(FieldValidation {
            pattern: Some("([unclosed".into()),
            ..Default::default()
        });
        assert!(validate_field(&field, Some(&text("anything"))).is_ok());
    }

    #[test]
    fn length_bounds_use_trimmed_character_count() {
        let field = Field::new("bio", "Bio", FieldType::Textarea).with_validation(FieldValidation {
            min_length: Some(3),
            max_length: Some(5),
            ..Default::default()
        });
        assert_eq!(rule_of(&field, Some(&text("  ab  "))), Some(FieldRule::MinLength));
        assert!(validate_field(&field, Some(&text(" abc "))).is_ok());
        assert!(validate_field(&field, Some(&text("ééééé"))).is_ok());
        let err = validate_field(&field, Some(&text("abcdef"))).unwrap_err();
        assert_eq!(err.message, "Bio must not exceed 5 characters");
    }

    #[test]
    fn zero_max_length_means_unbounded() {
        let field = Field::new("bio", "Bio", FieldType::Textarea).with_validation(FieldValidation {
            max_length: Some(0),
            ..Default::default()
        });
        assert!(validate_field(&field, Some(&text("long enough"))).is_ok());
    }

    // -- numbers --

    #[test]
    fn number_must_parse() {
        let field = Field::new("salary", "Expected Salary", FieldType::Number);
        let err = validate_field(&field, Some(&text("ten"))).unwrap_err();
        assert_eq!(err.rule, FieldRule::Number);
        assert_eq!(err.message, "Expected Salary must be a valid number");
        assert_eq!(rule_of(&field, Some(&text("NaN"))), Some(FieldRule::Number));
        assert!(validate_field(&field, Some(&text(" 12.5 "))).is_ok());
    }

    #[test]
    fn number_with_trailing_text_is_rejected() {
        let field = Field::new("exp", "Experience", FieldType::Number);
        assert_eq!(rule_of(&field, Some(&text("5 years"))), Some(FieldRule::Number));
        assert_eq!(rule_of(&field, Some(&text("3.5.1"))), Some(FieldRule::Number));
    }

    #[test]
    fn number_bounds_are_inclusive() {
        let field = Field::new("exp", "Experience", FieldType::Number).with_validation(
            FieldValidation {
                min: Some(0.0),
                max: Some(50.0),
                ..Default::default()
            },
        );
        assert!(validate_field(&field, Some(&text("0"))).is_ok());
        assert!(validate_field(&field, Some(&text("50"))).is_ok());
        assert_eq!(rule_of(&field, Some(&text("-0.5"))), Some(FieldRule::Min));
        let err = validate_field(&field, Some(&text("50.1"))).unwrap_err();
        assert_eq!(err.rule, FieldRule::Max);
        assert_eq!(err.message, "Experience must not exceed 50");
    }

    #[test]
    fn bounds_ignored_for_non_number_fields() {
        let field = Field::new("code", "Code", FieldType::Text).with_validation(FieldValidation {
            min: Some(100.0),
            ..Default::default()
        });
        assert!(validate_field(&field, Some(&text("5"))).is_ok());
    }
}
