//! Conditional visibility evaluation.
//!
//! Equality compares against the condition's expected JSON value using one
//! canonical coercion rule:
//!
//! | Expected value | Comparison                                         |
//! |----------------|----------------------------------------------------|
//! | number         | stored text parsed as `f64`, compared numerically  |
//! | bool           | stored text equals `"true"` / `"false"`            |
//! | string         | exact string equality                              |
//! | null           | stored value is missing or blank                   |
//!
//! A checkbox list is equal when any of its entries is equal. Ordering
//! operators parse both sides as `f64`; anything unparsable yields `NaN`
//! and therefore `false`.
//!
//! Number parsing is strict: the trimmed text must be a complete number.
//! A numeric prefix such as `"5 years"` does not count as `5`.

use serde_json::Value;

use crate::schema::{Condition, ConditionalField, Operator, Step};
use crate::step_data::{FieldValue, StepData};

/// Decide whether a conditional field is shown. No condition means visible.
pub fn evaluate(condition: Option<&Condition>, data: &StepData) -> bool {
    let Some(condition) = condition else {
        return true;
    };
    let actual = data.get(&condition.depends_on);

    match condition.operator {
        Operator::Eq => equals(actual, &condition.value),
        Operator::Ne => !equals(actual, &condition.value),
        Operator::Ge => compare(actual, &condition.value, |a, b| a >= b),
        Operator::Le => compare(actual, &condition.value, |a, b| a <= b),
        Operator::Gt => compare(actual, &condition.value, |a, b| a > b),
        Operator::Lt => compare(actual, &condition.value, |a, b| a < b),
        Operator::Unknown => true,
    }
}

/// Visibility of every conditional field on `step`, in declaration order.
pub fn visibility<'a>(step: &'a Step, data: &StepData) -> Vec<(&'a ConditionalField, bool)> {
    step.conditional_fields
        .iter()
        .map(|c| (c, evaluate(c.condition.as_ref(), data)))
        .collect()
}

fn equals(actual: Option<&FieldValue>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(FieldValue::Text(s)) => text_equals(s, expected),
        Some(FieldValue::List(items)) => {
            if expected.is_null() {
                items.is_empty()
            } else {
                items.iter().any(|i| text_equals(i, expected))
            }
        }
    }
}

fn text_equals(actual: &str, expected: &Value) -> bool {
    match expected {
        Value::Null => actual.trim().is_empty(),
        Value::String(s) => actual == s,
        Value::Bool(b) => actual == if *b { "true" } else { "false" },
        Value::Number(n) => match (actual.trim().parse::<f64>(), n.as_f64()) {
            (Ok(a), Some(b)) => a == b,
            _ => false,
        },
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn compare(actual: Option<&FieldValue>, expected: &Value, op: fn(f64, f64) -> bool) -> bool {
    let a = actual
        .and_then(FieldValue::as_text)
        .map_or(f64::NAN, parse_number);
    let b = match expected {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        _ => f64::NAN,
    };
    op(a, b)
}

fn parse_number(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}
