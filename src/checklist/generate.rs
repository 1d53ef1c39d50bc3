//! LLM-assisted checklist generation.
//!
//! Given a document type and optional context, asks the serving endpoint for
//! a JSON array of `{description, criteria}` items. Parsing is tiered the
//! same way verification parsing is: strict array decode, then a
//! regex-extracted array, then a coarse line-pair scan.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::verify::remote::{ChatOptions, EndpointError, LlmEndpointClient};

/// Bounds on how many items a generation prompt may request.
const MIN_ITEMS: usize = 3;
const MAX_ITEMS: usize = 12;
const DEFAULT_ITEMS: usize = 6;

static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub custom_description: Option<String>,
    #[serde(default)]
    pub item_count: Option<i64>,
}

/// A generated checklist item without an id — ids are assigned on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub description: String,
    pub criteria: String,
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("LLM timeout")]
    Timeout,

    #[error("Generation failed: {0}")]
    Endpoint(String),

    #[error("LLM returned an unparseable response")]
    Unparseable,
}

impl GenerateRequest {
    pub fn document_type(&self) -> &str {
        match self.document_type.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => "Document",
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
            .filter(|n| *n > 0)
            .map(|n| (n as usize).min(20))
            .unwrap_or(DEFAULT_ITEMS)
    }
}

/// Build the generation prompt. The requested count is clamped to 3..=12.
pub fn build_generation_prompt(
    document_type: &str,
    custom_description: Option<&str>,
    item_count: usize,
) -> String {
    let count = item_count.clamp(MIN_ITEMS, MAX_ITEMS);
    let context = custom_description
        .map(|d| format!("Additional context: {d}\n\n"))
        .unwrap_or_default();
    format!(
        "You are a document verification expert. Generate a checklist for verifying a {document_type}.\n\n\
        {context}Generate {count} checklist items. Each item should have:\n\
        - description: A clear, concise description of what to verify\n\
        - criteria: Specific, measurable criteria for verification\n\n\
        Return ONLY a valid JSON array in this exact format:\n\
        [\n  {{\"description\": \"...\", \"criteria\": \"...\"}}\n]\n\n\
        Do not include any other text or explanation."
    )
}

/// Ask the serving endpoint for checklist items.
pub async fn generate_items(
    client: &LlmEndpointClient,
    token: &str,
    request: &GenerateRequest,
    timeout_secs: u64,
) -> Result<Vec<GeneratedItem>, GenerateError> {
    let prompt = build_generation_prompt(
        request.document_type(),
        request.custom_description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
        request.item_count(),
    );

    let content = client
        .chat(
            token,
            &prompt,
            ChatOptions {
                temperature: 0.2,
                max_tokens: 1500,
                timeout_secs,
            },
        )
        .await
        .map_err(|e| match e {
            EndpointError::Timeout(_) => GenerateError::Timeout,
            other => GenerateError::Endpoint(other.to_string()),
        })?;

    parse_generated_items(&content).ok_or(GenerateError::Unparseable)
}

/// Tiered parse of the generation response into items.
pub fn parse_generated_items(content: &str) -> Option<Vec<GeneratedItem>> {
    // Tier 1: the whole content is a JSON array.
    if let Some(items) = parse_item_array(content.trim()) {
        return Some(items);
    }

    // Tier 2: extract the first bracketed array from surrounding prose.
    if let Some(m) = JSON_ARRAY.find(content) {
        if let Some(items) = parse_item_array(m.as_str()) {
            return Some(items);
        }
    }

    // Tier 3: coarse line-pair scan ("- description" followed by "Criteria: ...").
    let lines: Vec<&str> = content
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let mut coarse = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let description = lines[i].trim_start_matches(['-', '*']).trim();
        let next = lines.get(i + 1).copied().unwrap_or("");
        if !description.is_empty() && next.to_lowercase().contains("criteria") {
            let criteria = strip_criteria_prefix(next);
            coarse.push(GeneratedItem {
                description: description.to_string(),
                criteria,
            });
            i += 1;
        }
        i += 1;
    }

    if coarse.is_empty() {
        None
    } else {
        Some(coarse)
    }
}

fn parse_item_array(candidate: &str) -> Option<Vec<GeneratedItem>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(candidate).ok()?;
    let items: Vec<GeneratedItem> = values
        .iter()
        .map(|v| GeneratedItem {
            description: field_string(v, "description"),
            criteria: field_string(v, "criteria"),
        })
        .filter(|it| !it.description.is_empty() && !it.criteria.is_empty())
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn field_string(value: &serde_json::Value, key: &str) -> String {
    match value.get(key) {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn strip_criteria_prefix(line: &str) -> String {
    let lower = line.to_lowercase();
    if let Some(pos) = lower.find("criteria") {
        line[pos + "criteria".len()..]
            .trim_start_matches([':', '-', ' ', '\t'])
            .to_string()
    } else {
        line.to_string()
    }
}

/// Canned item pools for the simulated backend — no auth or network needed.
pub fn simulate_generation(document_type: &str, count: usize) -> Vec<GeneratedItem> {
    let pool: &[(&str, &str)] = match document_type {
        "Contract" => &[
            ("Parties identified", "Legal names and addresses of all parties are included"),
            ("Scope of work", "Deliverables and responsibilities clearly defined"),
            ("Payment terms", "Amount, schedule, and method specified"),
            ("Termination clause", "Conditions for termination and notice periods specified"),
            ("Governing law", "Jurisdiction and dispute resolution process stated"),
            ("Signatures", "Signatures or e-sign confirmation for all parties present"),
        ],
        "Invoice" => &[
            ("Invoice identifiers", "Invoice number and issue date present"),
            ("Vendor and client details", "Names and contact information of both parties present"),
            ("Line items", "Items/services listed with quantity, rate, and total"),
            ("Tax and totals", "Tax applied correctly; subtotal and grand total accurate"),
            ("Payment instructions", "Due date and payment method specified"),
            ("Purchase order reference", "PO number included if applicable"),
        ],
        _ => &[
            ("Contact information present", "Name, email, and phone number are clearly listed"),
            ("Work experience relevance", "Experience aligns with target role; includes quantifiable achievements"),
            ("Education details", "Degree, institution, and graduation date included"),
            ("Skills section completeness", "Technical and soft skills listed; matches job requirements"),
            ("Formatting and consistency", "Consistent dates, bullet styles, and tense"),
            ("ATS-friendly structure", "Avoids tables/images; uses standard headings and keywords"),
        ],
    };

    let wanted = count.clamp(MIN_ITEMS, MAX_ITEMS);
    (0..wanted)
        .map(|i| {
            let (description, criteria) = pool[i % pool.len()];
            GeneratedItem {
                description: description.to_string(),
                criteria: criteria.to_string(),
            }
        })
        .collect()
}
