//! Validation of token-based evidence anchors returned by the model.
//!
//! An anchor must carry exactly two start tokens, two end tokens, and a
//! non-empty full text, or it is dropped. Consistency between the tokens and
//! the full text is checked softly: an inconsistent anchor is kept for the
//! viewer but flagged `verified: false` so the UI can grey it out instead of
//! highlighting a span that may not exist.

use serde_json::Value;

use super::types::EvidenceAnchor;

/// Validate a raw `evidence_tokens` array into anchors, dropping malformed
/// entries.
pub fn validate_anchors(raw: &[Value]) -> Vec<EvidenceAnchor> {
    raw.iter().filter_map(validate_anchor).collect()
}

fn validate_anchor(raw: &Value) -> Option<EvidenceAnchor> {
    let start = token_pair(raw.get("start_tokens")?, TakeEnd::First)?;
    let end = token_pair(raw.get("end_tokens")?, TakeEnd::Last)?;
    let full_text = raw.get("full_text")?.as_str()?.to_string();
    if full_text.is_empty() {
        return None;
    }
    let page_number = raw
        .get("page_number")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());
    let verified = anchor_is_consistent(&start, &end, &full_text);
    Some(EvidenceAnchor {
        start_tokens: start,
        end_tokens: end,
        full_text,
        page_number,
        verified,
    })
}

enum TakeEnd {
    First,
    Last,
}

/// Coerce a JSON array into exactly two token strings, taking the first two
/// for start anchors and the last two for end anchors.
fn token_pair(value: &Value, take: TakeEnd) -> Option<[String; 2]> {
    let arr = value.as_array()?;
    let tokens: Vec<String> = arr.iter().map(token_string).collect();
    if tokens.len() < 2 {
        return None;
    }
    let pair = match take {
        TakeEnd::First => [tokens[0].clone(), tokens[1].clone()],
        TakeEnd::Last => [
            tokens[tokens.len() - 2].clone(),
            tokens[tokens.len() - 1].clone(),
        ],
    };
    Some(pair)
}

/// Models occasionally emit numbers or nulls where a word belongs.
fn token_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Soft consistency check: the normalized full text must start with the
/// start tokens and end with the end tokens.
pub fn anchor_is_consistent(start: &[String; 2], end: &[String; 2], full_text: &str) -> bool {
    let full = normalize(full_text);
    let start = normalize(&start.join(" "));
    let end = normalize(&end.join(" "));
    full.starts_with(&start) && full.ends_with(&end)
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
