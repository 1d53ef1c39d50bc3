//! Checklist definitions, persistence, presets, and LLM-assisted generation.

pub mod generate;
pub mod presets;
pub mod store;
pub mod types;

pub use store::{ChecklistInput, ChecklistStore, FileChecklistStore};
pub use types::{ChecklistDefinition, ChecklistItemDefinition, ChecklistSummary};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed checklist file {path}: {detail}")]
    Malformed { path: String, detail: String },

    #[error("Failed to serialize checklist: {0}")]
    Serialize(String),
}
