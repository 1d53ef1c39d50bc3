//! Simulated verification backend — keyword matching against the document
//! text, no network or credentials. Used for local development and tests;
//! the artificial delay keeps the streaming UI exercised realistically.

use rand::Rng;

use super::anchors::anchor_is_consistent;
use super::types::{Evidence, EvidenceAnchor, VerificationResult, VerificationStatus};
use crate::checklist::ChecklistItemDefinition;

const WINDOW_PADDING: usize = 20;

pub struct SimulatedVerifier {
    delay_ms: Option<std::ops::Range<u64>>,
}

impl SimulatedVerifier {
    pub fn new() -> Self {
        Self {
            delay_ms: Some(500..1500),
        }
    }

    /// No artificial latency; tests use this.
    pub fn without_delay() -> Self {
        Self { delay_ms: None }
    }

    pub async fn verify(
        &self,
        document_text: &str,
        item: &ChecklistItemDefinition,
    ) -> VerificationResult {
        if let Some(range) = &self.delay_ms {
            let delay = rand::thread_rng().gen_range(range.clone());
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }

        let matched = keywords(item).into_iter().find_map(|kw| {
            find_evidence_window(document_text, &kw)
        });

        match matched {
            Some(anchor) => VerificationResult {
                item_id: item.id,
                status: VerificationStatus::Verified,
                evidence: Evidence {
                    text: format!("Found evidence for {}", item.description),
                    confidence: Some(0.8),
                    page_number: None,
                    tokens: vec![anchor],
                },
                reason: Some("Criteria met".to_string()),
            },
            None => VerificationResult {
                item_id: item.id,
                status: VerificationStatus::Failed,
                evidence: Evidence {
                    text: format!("Not found: {}", item.description),
                    confidence: Some(0.4),
                    page_number: None,
                    tokens: Vec::new(),
                },
                reason: Some("Required information not found in document".to_string()),
            },
        }
    }
}

impl Default for SimulatedVerifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Search terms: alphanumeric words of length >= 4 from the item text, first
/// five only.
fn keywords(item: &ChecklistItemDefinition) -> Vec<String> {
    format!("{} {}", item.description, item.criteria)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| w.len() >= 4)
        .take(5)
        .map(str::to_string)
        .collect()
}

/// Case-insensitive keyword search; on a hit, cut a window of 20 bytes on
/// each side of the match and anchor it on its first and last two words.
/// Windows with fewer than four words are too short to anchor and count as
/// a miss.
fn find_evidence_window(haystack: &str, keyword: &str) -> Option<EvidenceAnchor> {
    // ASCII lowercasing preserves byte offsets; the text was already
    // sanitized to ASCII upstream.
    let idx = haystack
        .to_ascii_lowercase()
        .find(&keyword.to_ascii_lowercase())?;

    let start = floor_char_boundary(haystack, idx.saturating_sub(WINDOW_PADDING));
    let end = ceil_char_boundary(haystack, (idx + keyword.len() + WINDOW_PADDING).min(haystack.len()));
    let snippet = haystack[start..end].trim();

    let words: Vec<&str> = snippet.split_whitespace().collect();
    if words.len() < 4 {
        return None;
    }

    let start_tokens = [words[0].to_string(), words[1].to_string()];
    let end_tokens = [
        words[words.len() - 2].to_string(),
        words[words.len() - 1].to_string(),
    ];
    let verified = anchor_is_consistent(&start_tokens, &end_tokens, snippet);
    Some(EvidenceAnchor {
        start_tokens,
        end_tokens,
        full_text: snippet.to_string(),
        page_number: None,
        verified,
    })
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
