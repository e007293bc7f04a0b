//! Wire types exchanged with the job-application backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-issued identifier of one in-progress application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a step submission: `{currentStep, ...StepData}`.
pub type StepSubmission = serde_json::Map<String, serde_json::Value>;

/// Envelope returned by the start, step and lookup endpoints.
///
/// Every field is optional; a bare `{"ok": true}` parses to the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    #[serde(default)]
    pub application_id: Option<ApplicationId>,
    #[serde(default)]
    pub process_instance_id: Option<String>,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Left untyped: the backend emits either an ISO string or a date array.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body shape used by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_ok_body_parses_to_default() {
        let resp: ApplicationResponse = serde_json::from_value(json!({ "ok": true })).unwrap();
        assert_eq!(resp, ApplicationResponse::default());
    }

    #[test]
    fn full_response_parses() {
        let resp: ApplicationResponse = serde_json::from_value(json!({
            "applicationId": "APP-1",
            "currentStep": "personal",
            "status": "IN_PROGRESS",
            "timestamp": [2026, 10, 18, 9, 30],
            "message": "Step submitted"
        }))
        .unwrap();
        assert_eq!(resp.application_id, Some(ApplicationId::new("APP-1")));
        assert_eq!(resp.status.as_deref(), Some("IN_PROGRESS"));
        assert!(resp.timestamp.unwrap().is_array());
    }

    #[test]
    fn application_id_is_transparent() {
        let id = ApplicationId::new("APP-7");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!("APP-7"));
        assert_eq!(id.to_string(), "APP-7");
    }
}
