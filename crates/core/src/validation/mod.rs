//! Field validation engine.
//!
//! Provides the declarative per-field validator used on every step
//! transition, standalone format rules, the opt-in cross-field rule set,
//! and real-time format hints for well-known field ids -- all pure logic.

pub mod cross_field;
pub mod field;
pub mod formats;
pub mod realtime;
