//! Headless driver for the job-application form.
//!
//! Loads a file of answers keyed by field id, walks every step of the
//! workflow through [`WorkflowManager`](jobflow_engine::WorkflowManager)
//! and submits the application, logging what the form shows along the way.

pub mod autofill;
pub mod config;
pub mod surface;
