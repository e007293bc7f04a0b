//! Standalone format rules for common applicant identifiers.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Ten-digit Indian mobile number starting with 6, 7, 8 or 9.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid regex"));

/// Permanent Account Number: five letters, four digits, one letter.
static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid regex"));

static AADHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid regex"));

/// Six-digit postal code with a nonzero leading digit.
static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("valid regex"));

static SCRIPT_PROTOCOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid regex"));

static INLINE_HANDLER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("valid regex"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_mobile(value: &str) -> bool {
    MOBILE_RE.is_match(value)
}

pub fn is_valid_pan(value: &str) -> bool {
    PAN_RE.is_match(value)
}

pub fn is_valid_aadhar(value: &str) -> bool {
    AADHAR_RE.is_match(value)
}

pub fn is_valid_pincode(value: &str) -> bool {
    PINCODE_RE.is_match(value)
}

/// Strip angle brackets, `javascript:` protocols and inline `on*=`
/// handler prefixes, then trim.
pub fn sanitize_input(input: &str) -> String {
    let without_brackets: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    let without_protocol = SCRIPT_PROTOCOL_RE.replace_all(&without_brackets, "");
    let without_handlers = INLINE_HANDLER_RE.replace_all(&without_protocol, "");
    without_handlers.trim().to_string()
}
