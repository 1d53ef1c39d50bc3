//! Checklist persistence — one JSON file per checklist under a flat directory.
//!
//! `ChecklistStore` is the seam the orchestration core consumes; the file
//! store is the production implementation. Missing checklists are `Ok(None)`
//! so callers can map them to a 404, while malformed JSON surfaces as an
//! error (a stored-data problem, not a lookup miss).

use std::fs;
use std::path::{Path, PathBuf};

use super::presets;
use super::types::{ChecklistDefinition, ChecklistItemDefinition, ChecklistSummary};
use super::ChecklistError;

/// Store seam for checklist lookup and persistence.
pub trait ChecklistStore: Send + Sync {
    /// Load a checklist by id. `Ok(None)` when no such checklist exists.
    fn load(&self, id: &str) -> Result<Option<ChecklistDefinition>, ChecklistError>;

    /// List all checklists, newest first.
    fn list(&self) -> Result<Vec<ChecklistSummary>, ChecklistError>;

    /// Create or update a checklist. A missing id creates a new one.
    fn save(&self, input: ChecklistInput) -> Result<ChecklistDefinition, ChecklistError>;

    /// Delete a checklist. Returns `false` if it did not exist.
    fn delete(&self, id: &str) -> Result<bool, ChecklistError>;
}

/// Input for creating or updating a checklist.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub items: Vec<ChecklistItemDefinition>,
}

/// JSON-file-backed checklist store.
pub struct FileChecklistStore {
    dir: PathBuf,
}

impl FileChecklistStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the store directory and seed the built-in presets if no
    /// checklist with the same name exists yet.
    pub fn ensure_presets(&self) -> Result<(), ChecklistError> {
        fs::create_dir_all(&self.dir)?;
        let existing_names: Vec<String> = self
            .list()
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.name)
            .collect();

        let now = chrono::Utc::now().to_rfc3339();

        if !existing_names.iter().any(|n| n == presets::FULL_PRESET_NAME) {
            self.write_checklist(&ChecklistDefinition {
                id: presets::FULL_PRESET_ID.into(),
                name: presets::FULL_PRESET_NAME.into(),
                description: presets::FULL_PRESET_DESCRIPTION.into(),
                items: presets::default_resume_items(),
                created_at: now.clone(),
                updated_at: now.clone(),
            })?;
        }

        if !existing_names.iter().any(|n| n == presets::SMALL_PRESET_NAME) {
            self.write_checklist(&ChecklistDefinition {
                id: presets::SMALL_PRESET_ID.into(),
                name: presets::SMALL_PRESET_NAME.into(),
                description: presets::SMALL_PRESET_DESCRIPTION.into(),
                items: presets::small_resume_items(),
                created_at: now.clone(),
                updated_at: now,
            })?;
        }

        Ok(())
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn write_checklist(&self, checklist: &ChecklistDefinition) -> Result<(), ChecklistError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(checklist)
            .map_err(|e| ChecklistError::Serialize(e.to_string()))?;
        fs::write(self.path_for(&checklist.id), json)?;
        Ok(())
    }

    fn read_checklist(&self, path: &Path) -> Result<ChecklistDefinition, ChecklistError> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| ChecklistError::Malformed {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }
}

impl ChecklistStore for FileChecklistStore {
    fn load(&self, id: &str) -> Result<Option<ChecklistDefinition>, ChecklistError> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Ok(None);
        }
        self.read_checklist(&path).map(Some)
    }

    fn list(&self) -> Result<Vec<ChecklistSummary>, ChecklistError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut result = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            // Skip malformed files in listings — they still fail loudly on load.
            match self.read_checklist(&path) {
                Ok(checklist) => result.push(checklist.summary()),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping malformed checklist");
                }
            }
        }
        result.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(result)
    }

    fn save(&self, input: ChecklistInput) -> Result<ChecklistDefinition, ChecklistError> {
        let now = chrono::Utc::now().to_rfc3339();
        let id = input
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let existing = match input.id {
            Some(_) => self.load(&id)?,
            None => None,
        };

        let checklist = ChecklistDefinition {
            id,
            name: input.name,
            description: input.description,
            items: input.items,
            created_at: existing.map(|c| c.created_at).unwrap_or_else(|| now.clone()),
            updated_at: now,
        };
        self.write_checklist(&checklist)?;
        Ok(checklist)
    }

    fn delete(&self, id: &str) -> Result<bool, ChecklistError> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}
