//! Document verification service.
//!
//! Verifies uploaded documents against checklists of verification items.
//! Each item is checked independently by an LLM backend (real serving
//! endpoint or a local simulation), evidence is normalized into token-based
//! anchors, and results are delivered either as one collected report or
//! streamed over SSE as items settle.

pub mod api;
pub mod checklist;
pub mod config;
pub mod document;
pub mod session;
pub mod verify;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
