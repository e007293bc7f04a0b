//! Format hints for well-known field ids, checked while the applicant types.

use super::formats;

/// Error message for a non-empty value that fails the format expected for
/// `field_id`. Unknown field ids and empty values produce no hint.
pub fn format_hint(field_id: &str, value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return None;
    }

    let (valid, message) = match field_id {
        "email" => (
            formats::is_valid_email(value),
            "Please enter a valid email address",
        ),
        "mobileNumber" | "alternateNumber" => (
            formats::is_valid_mobile(value),
            "Please enter a valid 10-digit mobile number",
        ),
        "panNumber" => (
            formats::is_valid_pan(value),
            "Please enter a valid PAN number (e.g., ABCDE1234F)",
        ),
        "aadharNumber" => (
            formats::is_valid_aadhar(value),
            "Please enter a valid 12-digit Aadhar number",
        ),
        "currentPincode" | "permanentPincode" => (
            formats::is_valid_pincode(value),
            "Please enter a valid 6-digit pincode",
        ),
        _ => return None,
    };

    (!valid).then_some(message)
}
