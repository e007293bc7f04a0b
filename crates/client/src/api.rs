//! REST API client for the job-application endpoints.
//!
//! [`ApplicationApi`] is the seam the form engine talks through;
//! [`HttpApplicationApi`] implements it over [`reqwest`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use jobflow_core::schema::{Step, WorkflowDefinition};

use crate::config::ClientConfig;
use crate::messages::{ApplicationId, ApplicationResponse, ErrorBody, StepSubmission};

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or(.body.as_str()))]
    Api {
        status: u16,
        /// The `message` field of the JSON error body, when present.
        message: Option<String>,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx body could not be decoded.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A 2xx body lacked a field the caller depends on.
    #[error("Response is missing '{0}'")]
    MissingField(&'static str),
}

impl ApiError {
    /// Text to show the applicant: the server's own message when it sent
    /// one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Operations the form engine needs from the backend.
#[async_trait]
pub trait ApplicationApi: Send + Sync {
    /// `GET /workflow-definition`.
    async fn fetch_workflow_definition(&self) -> Result<WorkflowDefinition, ApiError>;

    /// `POST /start`; yields the new session's id.
    async fn start_application(&self) -> Result<ApplicationId, ApiError>;

    /// `POST /{applicationId}/step` with `{currentStep, ...values}`.
    async fn submit_step(
        &self,
        application_id: &ApplicationId,
        submission: &StepSubmission,
    ) -> Result<ApplicationResponse, ApiError>;

    /// `GET /{applicationId}`.
    async fn fetch_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationResponse, ApiError>;

    /// `GET /steps/{stepId}`.
    async fn fetch_step(&self, step_id: &str) -> Result<Step, ApiError>;
}

/// HTTP client for one job-application backend.
#[derive(Debug, Clone)]
pub struct HttpApplicationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApplicationApi {
    /// Create a client honouring the configured request timeout.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded as a
    /// single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, ApiError> {
        let invalid = |reason: String| ApiError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ---- private helpers ----

    /// Return the response unchanged on 2xx, or an [`ApiError::Api`]
    /// carrying the status, the server's message and the raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);

        tracing::warn!(status = status.as_u16(), message = ?message, "Backend rejected request");
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
            body,
        })
    }

    /// Parse a 2xx JSON body into the expected type.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Like [`parse_response`](Self::parse_response) but an empty body
    /// yields `T::default()`.
    async fn parse_optional<T: DeserializeOwned + Default>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ApplicationApi for HttpApplicationApi {
    async fn fetch_workflow_definition(&self) -> Result<WorkflowDefinition, ApiError> {
        let response = self.client.get(self.endpoint(&["workflow-definition"])?).send().await?;
        let definition: WorkflowDefinition = Self::parse_response(response).await?;
        tracing::debug!(steps = definition.step_count(), "Workflow definition loaded");
        Ok(definition)
    }

    async fn start_application(&self) -> Result<ApplicationId, ApiError> {
        let response = self
            .client
            .post(self.endpoint(&["start"])?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let started: ApplicationResponse = Self::parse_optional(response).await?;
        let id = started
            .application_id
            .ok_or(ApiError::MissingField("applicationId"))?;
        tracing::info!(application_id = %id, "Application started");
        Ok(id)
    }

    async fn submit_step(
        &self,
        application_id: &ApplicationId,
        submission: &StepSubmission,
    ) -> Result<ApplicationResponse, ApiError> {
        let response = self
            .client
            .post(self.endpoint(&[application_id.as_str(), "step"])?)
            .json(submission)
            .send()
            .await?;
        Self::parse_optional(response).await
    }

    async fn fetch_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationResponse, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&[application_id.as_str()])?)
            .send()
            .await?;
        Self::parse_optional(response).await
    }

    async fn fetch_step(&self, step_id: &str) -> Result<Step, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&["steps", step_id])?)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(message: Option<&str>) -> ApiError {
        ApiError::Api {
            status: 400,
            message: message.map(str::to_string),
            body: "{}".to_string(),
        }
    }

    #[test]
    fn user_message_prefers_server_message() {
        assert_eq!(
            api_error(Some("Email already used")).user_message("Failed to submit step"),
            "Email already used"
        );
    }

    #[test]
    fn user_message_falls_back() {
        assert_eq!(api_error(None).user_message("Failed to submit step"), "Failed to submit step");
        assert_eq!(api_error(Some("  ")).user_message("fallback"), "fallback");
        assert_eq!(ApiError::MissingField("applicationId").user_message("fallback"), "fallback");
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = api_error(Some("bad"));
        assert_eq!(err.to_string(), "API error (400): bad");
        let raw = ApiError::Api {
            status: 500,
            message: None,
            body: "oops".into(),
        };
        assert_eq!(raw.to_string(), "API error (500): oops");
    }

    #[test]
    fn urls_join_base_and_path() {
        let api = HttpApplicationApi::with_client(reqwest::Client::new(), "http://h/api/");
        assert_eq!(api.base_url(), "http://h/api");
        assert_eq!(api.endpoint(&["start"]).unwrap().as_str(), "http://h/api/start");
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let api = HttpApplicationApi::with_client(reqwest::Client::new(), "http://h/api");
        assert_eq!(
            api.endpoint(&["APP/1?x#y", "step"]).unwrap().as_str(),
            "http://h/api/APP%2F1%3Fx%23y/step"
        );

        let root = HttpApplicationApi::with_client(reqwest::Client::new(), "http://h/");
        assert_eq!(root.endpoint(&["start"]).unwrap().as_str(), "http://h/start");
    }

    #[test]
    fn unusable_base_url_is_reported() {
        let api = HttpApplicationApi::with_client(reqwest::Client::new(), "not a url");
        assert_matches::assert_matches!(
            api.endpoint(&["start"]),
            Err(ApiError::InvalidBaseUrl { .. })
        );
    }
}
