//! REST client for the job-application backend.
//!
//! Wraps the three calls the form engine needs (workflow definition,
//! session start, step submission) plus read-only lookups, behind the
//! [`ApplicationApi`] trait so the engine can be driven by any transport.

pub mod api;
pub mod config;
pub mod messages;

pub use api::{ApiError, ApplicationApi, HttpApplicationApi};
pub use config::ClientConfig;
pub use messages::{ApplicationId, ApplicationResponse, StepSubmission};
