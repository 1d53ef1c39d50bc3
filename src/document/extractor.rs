//! Text extraction from binary document formats.
//!
//! `TextExtractor` is the seam the loader consumes (allows mocking);
//! `DocumentExtractor` is the production implementation.

use std::fs;
use std::path::Path;

use thiserror::Error;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
}

/// Extraction seam for the document loader.
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from the file at `path`, interpreted as `mime_type`.
    fn extract(&self, path: &Path, mime_type: &str) -> Result<String, ExtractError>;
}

/// Select the extraction MIME type for a document path. Anything that does
/// not look like a PDF is treated as an office document.
pub fn mime_for_path(path: &Path) -> &'static str {
    let guessed = mime_guess::from_path(path).first_or_octet_stream();
    if guessed == mime_guess::mime::APPLICATION_PDF {
        PDF_MIME
    } else {
        DOCX_MIME
    }
}

/// Production extractor: `pdf-extract` for PDFs, raw UTF-8 read for DOCX.
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, path: &Path, mime_type: &str) -> Result<String, ExtractError> {
        match mime_type {
            PDF_MIME => {
                let bytes = fs::read(path)?;
                pdf_extract::extract_text_from_mem(&bytes)
                    .map_err(|e| ExtractError::Pdf(e.to_string()))
            }
            // TODO: parse the DOCX XML instead of reading raw bytes
            DOCX_MIME => Ok(fs::read_to_string(path)?),
            other => Err(ExtractError::UnsupportedType(other.to_string())),
        }
    }
}
