//! Per-item verification: prompt construction, backends, response parsing,
//! anchor validation, and the bounded-concurrency batch runner.

pub mod anchors;
pub mod backend;
pub mod parser;
pub mod prompt;
pub mod remote;
pub mod runner;
pub mod simulated;
pub mod types;

pub use backend::VerifyBackend;
pub use remote::{ChatOptions, EndpointError, LlmEndpointClient};
pub use runner::run_batch;
pub use simulated::SimulatedVerifier;
pub use types::{
    Evidence, EvidenceAnchor, VerificationReport, VerificationResult, VerificationStatus,
    VerificationSummary,
};
