//! Lenient parsing of verification responses.
//!
//! Models wrap JSON in prose, drop fields, or answer in free text. Parsing
//! is tiered so a sloppy response still yields a usable result:
//! 1. Strict: the whole response is the JSON object.
//! 2. Extracted: first `{...}` block pulled out of surrounding prose.
//! 3. Heuristic: keyword scan over the raw text, low confidence.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::anchors::validate_anchors;
use super::types::{Evidence, EvidenceAnchor, VerificationResult, VerificationStatus};
use crate::document::sanitize::truncate_chars;

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Which tier produced the parse. Recorded for diagnostics only; never on
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Strict,
    Extracted,
    Heuristic,
}

/// Intermediate parse output, before item identity is attached.
#[derive(Debug, Clone)]
pub struct ParsedVerification {
    pub status: VerificationStatus,
    pub evidence_text: Option<String>,
    pub confidence: f64,
    pub reasoning: Option<String>,
    pub anchors: Vec<EvidenceAnchor>,
    pub strategy: ParseStrategy,
}

#[derive(Deserialize)]
struct RawVerification {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    evidence_tokens: Vec<Value>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    evidence_text: Option<String>,
}

/// Parse a raw model response, always producing something.
pub fn parse_verification_response(raw: &str) -> ParsedVerification {
    if let Ok(parsed) = serde_json::from_str::<RawVerification>(raw.trim()) {
        return from_raw(parsed, ParseStrategy::Strict);
    }

    if let Some(m) = JSON_OBJECT.find(raw) {
        if let Ok(parsed) = serde_json::from_str::<RawVerification>(m.as_str()) {
            return from_raw(parsed, ParseStrategy::Extracted);
        }
    }

    tracing::warn!(response_len = raw.len(), "response parsing failed, using text analysis");
    heuristic(raw)
}

fn from_raw(raw: RawVerification, strategy: ParseStrategy) -> ParsedVerification {
    // Anything other than an explicit "verified" counts as failed.
    let status = match raw.status.as_deref() {
        Some("verified") => VerificationStatus::Verified,
        _ => VerificationStatus::Failed,
    };
    ParsedVerification {
        status,
        evidence_text: raw.evidence_text.filter(|t| !t.is_empty()),
        confidence: raw.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
        reasoning: raw.reasoning.or(raw.reason).filter(|r| !r.is_empty()),
        anchors: validate_anchors(&raw.evidence_tokens),
        strategy,
    }
}

fn heuristic(raw: &str) -> ParsedVerification {
    let lower = raw.to_lowercase();
    let is_verified =
        lower.contains("verified") || lower.contains("found") || lower.contains("yes");
    ParsedVerification {
        status: if is_verified {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Failed
        },
        evidence_text: Some(truncate_chars(raw, 200).to_string()),
        confidence: 0.5,
        reasoning: Some("Response parsing failed, using text analysis".to_string()),
        anchors: Vec::new(),
        strategy: ParseStrategy::Heuristic,
    }
}

impl ParsedVerification {
    /// Attach item identity and fill wire-level fallbacks.
    pub fn into_result(self, item_id: i64) -> VerificationResult {
        let text = self
            .evidence_text
            .or_else(|| self.anchors.first().map(|a| a.full_text.clone()))
            .unwrap_or_else(|| "No evidence provided".to_string());
        VerificationResult {
            item_id,
            status: self.status,
            evidence: Evidence {
                text,
                confidence: Some(self.confidence),
                page_number: None,
                tokens: self.anchors,
            },
            reason: Some(
                self.reasoning
                    .unwrap_or_else(|| "Verification completed".to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "status": "verified",
        "evidence_tokens": [
            { "start_tokens": ["Jane", "Doe"], "end_tokens": ["example", "com"], "full_text": "Jane Doe jane at example com", "page_number": 1 }
        ],
        "confidence": 0.92,
        "reasoning": "Contact details present"
    }"#;

    #[test]
    fn strict_parse_of_clean_json() {
        let parsed = parse_verification_response(WELL_FORMED);
        assert_eq!(parsed.strategy, ParseStrategy::Strict);
        assert_eq!(parsed.status, VerificationStatus::Verified);
        assert_eq!(parsed.confidence, 0.92);
        assert_eq!(parsed.anchors.len(), 1);
        assert!(parsed.anchors[0].verified);
    }

    #[test]
    fn extracts_json_from_surrounding_prose() {
        let wrapped = format!("Sure! Here is the analysis:\n{WELL_FORMED}\nLet me know.");
        let parsed = parse_verification_response(&wrapped);
        assert_eq!(parsed.strategy, ParseStrategy::Extracted);
        assert_eq!(parsed.status, VerificationStatus::Verified);
    }

    #[test]
    fn heuristic_on_free_text_affirmative() {
        let parsed =
            parse_verification_response("Yes, the contact information was found in the document.");
        assert_eq!(parsed.strategy, ParseStrategy::Heuristic);
        assert_eq!(parsed.status, VerificationStatus::Verified);
        assert_eq!(parsed.confidence, 0.5);
        assert_eq!(
            parsed.reasoning.as_deref(),
            Some("Response parsing failed, using text analysis")
        );
    }

    #[test]
    fn heuristic_on_free_text_negative() {
        let parsed = parse_verification_response("The document does not contain this information.");
        assert_eq!(parsed.strategy, ParseStrategy::Heuristic);
        assert_eq!(parsed.status, VerificationStatus::Failed);
    }

    #[test]
    fn heuristic_evidence_text_is_capped_at_200_chars() {
        let long = "no ".repeat(200);
        let parsed = parse_verification_response(&long);
        assert_eq!(parsed.evidence_text.unwrap().chars().count(), 200);
    }

    #[test]
    fn unknown_status_maps_to_failed() {
        let parsed = parse_verification_response(r#"{"status": "maybe", "confidence": 0.7}"#);
        assert_eq!(parsed.status, VerificationStatus::Failed);
    }

    #[test]
    fn confidence_is_clamped() {
        let parsed = parse_verification_response(r#"{"status": "verified", "confidence": 3.5}"#);
        assert_eq!(parsed.confidence, 1.0);
        let parsed = parse_verification_response(r#"{"status": "verified", "confidence": -1.0}"#);
        assert_eq!(parsed.confidence, 0.0);
    }

    #[test]
    fn missing_confidence_defaults() {
        let parsed = parse_verification_response(r#"{"status": "verified"}"#);
        assert_eq!(parsed.confidence, 0.5);
    }

    #[test]
    fn result_fallbacks_fill_missing_fields() {
        let result = parse_verification_response(r#"{"status": "verified"}"#).into_result(3);
        assert_eq!(result.item_id, 3);
        assert_eq!(result.evidence.text, "No evidence provided");
        assert_eq!(result.reason.as_deref(), Some("Verification completed"));
    }

    #[test]
    fn evidence_text_falls_back_to_first_anchor() {
        let result = parse_verification_response(WELL_FORMED).into_result(1);
        assert_eq!(result.evidence.text, "Jane Doe jane at example com");
    }

    #[test]
    fn reason_field_accepted_as_reasoning_alias() {
        let parsed =
            parse_verification_response(r#"{"status": "failed", "reason": "nothing matched"}"#);
        assert_eq!(parsed.reasoning.as_deref(), Some("nothing matched"));
    }
}
