//! Document text acquisition: extraction, caching, sanitization.

pub mod extractor;
pub mod loader;
pub mod sanitize;

pub use extractor::{DocumentExtractor, ExtractError, TextExtractor};
pub use loader::{DocumentLoader, LoadedText, TextSource};
pub use sanitize::{bound_document_text, MAX_DOCUMENT_CHARS};
