use jobflow_client::ApiError;
use jobflow_core::error::CoreError;

/// Errors raised by [`WorkflowManager`](crate::WorkflowManager).
///
/// `Initialization` and `EmptyWorkflow` are fatal to the session;
/// `ValidationFailed`, `CrossFieldFailed` and `Submission` leave the
/// manager on the current step so the applicant can retry.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to load workflow: {0}")]
    Initialization(#[source] ApiError),

    #[error("Workflow definition contains no steps")]
    EmptyWorkflow,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Validation failed for: {}", .fields.join(", "))]
    ValidationFailed { fields: Vec<String> },

    #[error("Cross-field validation failed: {}", .errors.join("; "))]
    CrossFieldFailed { errors: Vec<String> },

    #[error("Step submission failed: {0}")]
    Submission(#[source] ApiError),

    #[error("Workflow has not been initialized")]
    NotInitialized,

    #[error("Application has already been submitted")]
    AlreadySubmitted,

    #[error("Final submission is only possible from the last step")]
    NotOnLastStep,

    #[error("Already on the last step; submit the application instead")]
    OnLastStep,
}
