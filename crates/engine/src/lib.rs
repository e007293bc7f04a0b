//! Multi-step form controller.
//!
//! [`WorkflowManager`] drives one application session: it loads the
//! workflow definition, starts the session, renders the active step onto
//! an injected [`RenderSurface`], records field changes, validates on
//! every transition and submits step data through an
//! [`ApplicationApi`](jobflow_client::ApplicationApi).

pub mod error;
pub mod manager;
pub mod options;
pub mod surface;

pub use error::EngineError;
pub use manager::{NavState, WorkflowManager};
pub use options::EngineOptions;
pub use surface::{
    IndicatorStatus, MarkupSurface, MessageKind, NavigationState, RenderSurface, StepIndicator,
};
