use serde::{Deserialize, Serialize};

/// One verification criterion inside a checklist. Immutable template data;
/// `id` is unique within its checklist. Order matters for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItemDefinition {
    pub id: i64,
    pub description: String,
    pub criteria: String,
}

/// A named, ordered set of verification criteria applied to one document.
/// Loaded once per verification session and treated as read-only by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub items: Vec<ChecklistItemDefinition>,
    /// ISO-8601 timestamp.
    pub created_at: String,
    pub updated_at: String,
}

/// Listing entry: checklist metadata without the items payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub item_count: usize,
}

impl ChecklistDefinition {
    pub fn summary(&self) -> ChecklistSummary {
        ChecklistSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            item_count: self.items.len(),
        }
    }
}
