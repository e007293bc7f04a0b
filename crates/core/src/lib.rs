//! Form-schema engine core.
//!
//! Pure logic for multi-step application forms: the server-provided schema
//! model, the per-session value store, conditional visibility, field and
//! cross-field validation, and markup rendering. Nothing in this crate
//! performs I/O.

pub mod condition;
pub mod error;
pub mod render;
pub mod schema;
pub mod step_data;
pub mod validation;
