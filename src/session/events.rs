//! Streaming session event protocol.
//!
//! Events are tagged by `type` and serialized camelCase for the wire. Every
//! session ends with exactly one terminal event (`complete` or `error`);
//! the transport closes the stream after sending it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checklist::ChecklistDefinition;
use crate::verify::VerificationResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SessionEvent {
    /// An item has been queued for verification.
    #[serde(rename_all = "camelCase")]
    Processing { item_id: i64 },

    /// One item settled.
    Result { data: VerificationResult },

    /// All items settled; checklist metadata lets the client render the
    /// report without a second fetch.
    #[serde(rename_all = "camelCase")]
    Complete {
        checklist_id: String,
        checklist_name: String,
        checklist_description: String,
        checklist_created_at: String,
    },

    /// Session-fatal failure. Terminal, like `Complete`.
    #[serde(rename_all = "camelCase")]
    Error {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<Value>,
    },
}

impl SessionEvent {
    pub fn complete(checklist: &ChecklistDefinition) -> Self {
        Self::Complete {
            checklist_id: checklist.id.clone(),
            checklist_name: checklist.name.clone(),
            checklist_description: checklist.description.clone(),
            checklist_created_at: checklist.created_at.clone(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }

    /// Encode as a server-sent-events frame: `data: <json>\n\n`.
    pub fn to_sse_frame(&self) -> String {
        // Serialization of these variants cannot fail; fall back to a
        // generic error frame rather than panicking if it somehow does.
        let json = serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","error":"event serialization failed"}"#.to_string()
        });
        format!("data: {json}\n\n")
    }
}
