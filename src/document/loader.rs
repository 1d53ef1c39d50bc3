//! Document text loader — resolves a document path to bounded plain text.
//!
//! Resolution cascade, each tier attempted only when the prior fails:
//! 1. sidecar cache file at `<path>.txt`
//! 2. on-the-fly extraction (MIME-selected), with a write-back to the cache
//! 3. raw UTF-8 read of the original file, for non-PDF files only
//! 4. empty text
//!
//! Binary PDF bytes are never forwarded as text. The loader never fails:
//! total failure degrades to empty text, which callers must treat as a valid
//! (if low-confidence) verification input.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::extractor::{mime_for_path, TextExtractor, PDF_MIME};
use super::sanitize::bound_document_text;

/// Which tier of the cascade produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextSource {
    TxtCache,
    ExtractedOnTheFly,
    FallbackPlain,
    None,
}

impl std::fmt::Display for TextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TxtCache => write!(f, "txt-cache"),
            Self::ExtractedOnTheFly => write!(f, "extracted-on-the-fly"),
            Self::FallbackPlain => write!(f, "fallback-plain"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Sanitized, bounded document text plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedText {
    pub text: String,
    pub source: TextSource,
}

#[derive(Clone)]
pub struct DocumentLoader {
    extractor: Arc<dyn TextExtractor>,
}

impl DocumentLoader {
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self { extractor }
    }

    /// Load and sanitize document text once per processing session.
    pub async fn load(&self, document_path: &Path) -> LoadedText {
        let (raw, source) = self.resolve(document_path).await;
        let text = bound_document_text(&raw);
        tracing::info!(
            source = %source,
            length = text.len(),
            path = %document_path.display(),
            "loaded document text"
        );
        LoadedText { text, source }
    }

    async fn resolve(&self, document_path: &Path) -> (String, TextSource) {
        let cache_path = sidecar_cache_path(document_path);

        // Tier 1: sidecar text cache.
        match tokio::fs::read_to_string(&cache_path).await {
            Ok(cached) => return (cached, TextSource::TxtCache),
            Err(e) => {
                tracing::debug!(error = %e, path = %cache_path.display(), "no usable text cache");
            }
        }

        // Tier 2: extract from the original file, caching the result.
        let mime = mime_for_path(document_path);
        match self.extract_off_thread(document_path, mime).await {
            Ok(extracted) => {
                // Fire-and-forget cache write: concurrent sessions may race on
                // this, but the write is idempotent so a lost write is harmless.
                if let Err(e) = tokio::fs::write(&cache_path, &extracted).await {
                    tracing::warn!(error = %e, path = %cache_path.display(), "cache write failed");
                } else {
                    tracing::info!(chars = extracted.len(), "extracted and cached document text");
                }
                return (extracted, TextSource::ExtractedOnTheFly);
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %document_path.display(), "extraction failed");
            }
        }

        // Tier 3: raw read as plain text — never for PDFs, whose binary
        // bytes must not end up in a prompt.
        if mime != PDF_MIME {
            match tokio::fs::read_to_string(document_path).await {
                Ok(raw) => return (raw, TextSource::FallbackPlain),
                Err(e) => {
                    tracing::warn!(error = %e, "plain-text fallback read failed");
                }
            }
        } else {
            tracing::warn!("skipping raw PDF read as text to avoid binary content in prompt");
        }

        (String::new(), TextSource::None)
    }

    /// Extractors are synchronous and potentially CPU-bound (PDF parsing), so
    /// they run on the blocking pool. A panicking extractor is treated as an
    /// extraction failure, not a loader failure.
    async fn extract_off_thread(
        &self,
        path: &Path,
        mime: &'static str,
    ) -> Result<String, String> {
        let extractor = Arc::clone(&self.extractor);
        let path = path.to_path_buf();
        match tokio::task::spawn_blocking(move || extractor.extract(&path, mime)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(e.to_string()),
            Err(join) => Err(format!("extractor aborted: {join}")),
        }
    }
}

/// `<document path>.txt`
fn sidecar_cache_path(document_path: &Path) -> PathBuf {
    let mut os: OsString = document_path.as_os_str().to_os_string();
    os.push(".txt");
    PathBuf::from(os)
}
