//! Core verification data model shared across backends, the batch runner,
//! and the API layer. All wire-facing structs serialize camelCase.

use serde::{Deserialize, Serialize};

use crate::checklist::ChecklistDefinition;

/// Outcome of verifying one checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Failed,
}

/// A locatable span of evidence inside the document text.
///
/// `start_tokens`/`end_tokens` hold exactly the first two and last two
/// whitespace-separated words of `full_text`; `verified` records whether
/// those anchors were consistent with `full_text` when validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceAnchor {
    pub start_tokens: [String; 2],
    pub end_tokens: [String; 2],
    pub full_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<EvidenceAnchor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub item_id: i64,
    pub status: VerificationStatus,
    pub evidence: Evidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl VerificationResult {
    /// Synthesized `failed` result for an item whose verification could not
    /// produce a real answer (backend error, task panic). Never an `Err`:
    /// a failed item is a normal batch outcome.
    pub fn failure(item_id: i64, evidence_text: &str, reason: String) -> Self {
        Self {
            item_id,
            status: VerificationStatus::Failed,
            evidence: Evidence {
                text: evidence_text.to_string(),
                confidence: Some(0.0),
                page_number: Some(1),
                tokens: Vec::new(),
            },
            reason: Some(reason),
        }
    }
}

/// Aggregate counts over a completed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub success_rate: f64,
}

impl VerificationSummary {
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.status == VerificationStatus::Verified)
            .count();
        let failed = total - passed;
        let success_rate = if total == 0 {
            0.0
        } else {
            passed as f64 / total as f64 * 100.0
        };
        Self {
            total,
            passed,
            failed,
            success_rate,
        }
    }
}

/// Full report returned by the collected (non-streaming) processing route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub document_name: String,
    pub document_path: String,
    pub upload_date: String,
    pub processing_date: String,
    pub results: Vec<VerificationResult>,
    pub summary: VerificationSummary,
    pub checklist_id: String,
    pub checklist_name: String,
    pub checklist_description: String,
    pub checklist_created_at: String,
}

impl VerificationReport {
    pub fn new(
        document_name: String,
        document_path: String,
        checklist: &ChecklistDefinition,
        results: Vec<VerificationResult>,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let summary = VerificationSummary::from_results(&results);
        Self {
            document_name,
            document_path,
            upload_date: now.clone(),
            processing_date: now,
            results,
            summary,
            checklist_id: checklist.id.clone(),
            checklist_name: checklist.name.clone(),
            checklist_description: checklist.description.clone(),
            checklist_created_at: checklist.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verified(item_id: i64) -> VerificationResult {
        VerificationResult {
            item_id,
            status: VerificationStatus::Verified,
            evidence: Evidence {
                text: "found".into(),
                confidence: Some(0.8),
                page_number: None,
                tokens: Vec::new(),
            },
            reason: None,
        }
    }

    #[test]
    fn summary_counts_and_rate() {
        let results = vec![
            verified(1),
            verified(2),
            VerificationResult::failure(3, "API call failed", "timeout".into()),
        ];
        let summary = VerificationSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!((summary.success_rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn empty_batch_has_zero_rate() {
        let summary = VerificationSummary::from_results(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn result_serializes_camel_case() {
        let json = serde_json::to_value(verified(7)).unwrap();
        assert_eq!(json["itemId"], 7);
        assert_eq!(json["status"], "verified");
        assert_eq!(json["evidence"]["text"], "found");
        // None/empty fields stay off the wire.
        assert!(json["evidence"].get("pageNumber").is_none());
        assert!(json["evidence"].get("tokens").is_none());
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn failure_result_shape() {
        let result = VerificationResult::failure(4, "API call failed", "connection refused".into());
        assert_eq!(result.status, VerificationStatus::Failed);
        assert_eq!(result.evidence.text, "API call failed");
        assert_eq!(result.evidence.confidence, Some(0.0));
        assert_eq!(result.evidence.page_number, Some(1));
        assert_eq!(result.reason.as_deref(), Some("connection refused"));
    }

    #[test]
    fn anchor_round_trips_camel_case() {
        let anchor = EvidenceAnchor {
            start_tokens: ["Jane".into(), "Doe".into()],
            end_tokens: ["example".into(), "com".into()],
            full_text: "Jane Doe jane at example com".into(),
            page_number: Some(2),
            verified: true,
        };
        let json = serde_json::to_value(&anchor).unwrap();
        assert_eq!(json["startTokens"][0], "Jane");
        assert_eq!(json["endTokens"][1], "com");
        assert_eq!(json["fullText"], "Jane Doe jane at example com");
        assert_eq!(json["pageNumber"], 2);
        assert_eq!(json["verified"], true);
        let back: EvidenceAnchor = serde_json::from_value(json).unwrap();
        assert_eq!(back, anchor);
    }
}
