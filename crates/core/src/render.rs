//! Field renderer.
//!
//! Turns schema fields plus the current [`StepData`] into HTML fragments.
//! Every control is bound by `id`/`name` to its field id and followed by an
//! error slot with id `{fieldId}-error`. All interpolated text is escaped.

use std::fmt::Write;

use crate::schema::{ConditionalField, Field, FieldType, Step};
use crate::step_data::{FieldValue, StepData};

/// Id of the inline error slot rendered next to a field.
pub fn error_slot_id(field_id: &str) -> String {
    format!("{field_id}-error")
}

/// Render a whole step: header plus a form holding every field.
///
/// `visible` decides the initial display of each conditional field.
pub fn render_step(step: &Step, data: &StepData, visible: impl Fn(&str) -> bool) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"step-header\">");
    let _ = write!(out, "<h2 class=\"step-title\">{}</h2>", escape(&step.step_name));
    let _ = write!(
        out,
        "<p class=\"step-description\">{}</p>",
        escape(&step.description)
    );
    out.push_str("</div><form id=\"step-form\" class=\"step-form\">");
    for field in &step.fields {
        out.push_str(&render_field(field, data));
    }
    for conditional in &step.conditional_fields {
        let shown = visible(&conditional.field.field_id);
        out.push_str(&render_conditional(conditional, data, shown));
    }
    out.push_str("</form>");
    out
}

/// Render a conditional field inside its show/hide container.
pub fn render_conditional(conditional: &ConditionalField, data: &StepData, visible: bool) -> String {
    let display = if visible { "block" } else { "none" };
    format!(
        "<div class=\"conditional-field\" data-field-id=\"{}\" style=\"display: {display};\">{}</div>",
        escape(&conditional.field.field_id),
        render_field(&conditional.field, data),
    )
}

/// Render one field with its label, control and error slot.
pub fn render_field(field: &Field, data: &StepData) -> String {
    let value = data.get(&field.field_id);
    let id = escape(&field.field_id);
    let name = escape(&field.field_name);
    let required_class = if field.required { " required" } else { "" };
    let required_attr = if field.required { " required" } else { "" };

    let control = match &field.field_type {
        FieldType::Text | FieldType::Email | FieldType::Number | FieldType::Date => {
            let input_type = match field.field_type {
                FieldType::Number => "number",
                FieldType::Date => "date",
                _ => "text",
            };
            let placeholder_attr = match field.field_type {
                FieldType::Date => String::new(),
                _ => format!(" placeholder=\"{}\"", placeholder(field)),
            };
            format!(
                "<input type=\"{input_type}\" id=\"{id}\" name=\"{id}\" class=\"form-input\"{placeholder_attr}{required_attr} value=\"{}\" />",
                escape(scalar(value)),
            )
        }
        FieldType::Textarea => format!(
            "<textarea id=\"{id}\" name=\"{id}\" class=\"form-textarea\" placeholder=\"{}\"{required_attr}>{}</textarea>",
            placeholder(field),
            escape(scalar(value)),
        ),
        FieldType::Dropdown => {
            let mut options = format!("<option value=\"\">Select {name}</option>");
            for option in &field.options {
                let selected = if value.and_then(FieldValue::as_text) == Some(option.value.as_str()) {
                    " selected"
                } else {
                    ""
                };
                let _ = write!(
                    options,
                    "<option value=\"{}\"{selected}>{}</option>",
                    escape(&option.value),
                    escape(&option.label),
                );
            }
            format!("<select id=\"{id}\" name=\"{id}\" class=\"form-select\"{required_attr}>{options}</select>")
        }
        FieldType::Radio | FieldType::Checkbox => {
            let kind = if field.field_type == FieldType::Radio {
                "radio"
            } else {
                "checkbox"
            };
            let mut choices = String::new();
            for option in &field.options {
                let chosen = value.is_some_and(|v| v.selects(&option.value));
                let option_id = escape(&format!("{}-{}", field.field_id, option.value));
                let _ = write!(
                    choices,
                    "<div class=\"{kind}-option{}\"><input type=\"{kind}\" id=\"{option_id}\" name=\"{id}\" value=\"{}\"{} /><label for=\"{option_id}\">{}</label></div>",
                    if chosen { " selected" } else { "" },
                    escape(&option.value),
                    if chosen { " checked" } else { "" },
                    escape(&option.label),
                );
            }
            // Grouped controls have no single element to label.
            return format!(
                "<div class=\"form-group\"><label class=\"form-label{required_class}\">{name}</label><div class=\"{kind}-group\" data-field-id=\"{id}\">{choices}</div>{}</div>",
                error_slot(&field.field_id),
            );
        }
        FieldType::Unsupported(kind) => {
            return format!(
                "<div class=\"form-group\">Unsupported field type: {}</div>",
                escape(kind)
            );
        }
    };

    format!(
        "<div class=\"form-group\"><label class=\"form-label{required_class}\" for=\"{id}\">{name}</label>{control}{}</div>",
        error_slot(&field.field_id),
    )
}

fn error_slot(field_id: &str) -> String {
    format!(
        "<span class=\"error-message\" id=\"{}\"></span>",
        escape(&error_slot_id(field_id))
    )
}

fn placeholder(field: &Field) -> String {
    escape(field.placeholder.as_deref().unwrap_or(""))
}

fn scalar(value: Option<&FieldValue>) -> &str {
    value.and_then(FieldValue::as_text).unwrap_or("")
}

/// HTML-escape text for element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
