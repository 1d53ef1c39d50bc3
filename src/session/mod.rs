//! Processing sessions: request validation, orchestration, event protocol.

pub mod events;
pub mod orchestrator;

pub use events::SessionEvent;
pub use orchestrator::{validate_request, ProcessError, ValidatedRequest, VerificationSession};
