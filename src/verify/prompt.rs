//! Verification prompt construction.
//!
//! The prompt asks for token-based evidence anchors rather than character
//! offsets: offsets drift whenever the viewer re-extracts text, while the
//! first/last two words of a span survive re-extraction.

use crate::checklist::ChecklistItemDefinition;

/// Build the verification prompt for one checklist item over the (already
/// sanitized and bounded) document text.
pub fn build_verification_prompt(document_text: &str, item: &ChecklistItemDefinition) -> String {
    format!(
        "You are a document verification assistant. Analyze the following document text and determine if it contains the required information.\n\
        \n\
        Document Content ({len} characters):\n\
        {document_text}\n\
        \n\
        Verification Criteria:\n\
        {description}: {criteria}\n\
        \n\
        IMPORTANT: For each piece of evidence, return TOKEN-BASED ANCHORS instead of character offsets.\n\
        Return the first TWO tokens of the evidence text and the last TWO tokens of the evidence text.\n\
        Also include the FULL evidence text for validation. If you know the page number, include it as page_number; otherwise use null.\n\
        \n\
        Respond in the following JSON format:\n\
        {{\n\
        \x20 \"status\": \"verified\" | \"failed\",\n\
        \x20 \"evidence_tokens\": [\n\
        \x20   {{ \"start_tokens\": [\"<first token>\", \"<second token>\"], \"end_tokens\": [\"<second to last>\", \"<last>\"], \"full_text\": \"<exact evidence text>\", \"page_number\": <number or null> }}\n\
        \x20 ],\n\
        \x20 \"confidence\": <number between 0 and 1>,\n\
        \x20 \"reasoning\": \"<brief explanation>\"\n\
        }}\n\
        \n\
        Rules:\n\
        1. Tokens are whitespace-separated words appearing EXACTLY in the document order.\n\
        2. full_text MUST start with start_tokens joined by a space and end with end_tokens joined by a space.\n\
        3. Include ALL relevant evidence segments.\n\
        4. Keep full_text concise (<= 300 chars). Do not include JSON outside the object.",
        len = document_text.len(),
        description = item.description,
        criteria = item.criteria,
    )
}
