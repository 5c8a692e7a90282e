//! Embed pipeline: source extraction, URL validation, and the panel
//! orchestrator state machine.

mod errors;
mod extract;
mod orchestrator;
mod validate;

pub use errors::{FrameError, FrameErrorKind};
pub use extract::resolve_source;
pub use orchestrator::{
    FrameState, HandlerInfo, Orchestrator, PanelSnapshot, SANDBOX_PERMISSIONS,
};
pub use validate::{is_valid_url, would_cause_nesting};
