//! Built-in checklist presets seeded into an empty store.

use super::types::ChecklistItemDefinition;

/// Default resume verification checklist — validates the key components of a
/// professional resume.
pub fn default_resume_items() -> Vec<ChecklistItemDefinition> {
    vec![
        item(1, "Contact Information",
            "Full name, phone number, email address, and location (city/state) clearly visible at the top of resume"),
        item(2, "Professional Summary or Objective",
            "Brief professional summary or career objective statement (2-4 sentences) describing candidate background and goals"),
        item(3, "Work Experience Section",
            "Work experience with job titles, company names, employment dates (month/year format), and detailed responsibilities or achievements"),
        item(4, "Education History",
            "Educational background including degree(s), institution name(s), graduation date(s) or expected graduation date"),
        item(5, "Skills Section",
            "Dedicated skills section listing relevant technical skills, tools, programming languages, or competencies"),
        item(6, "Professional Formatting",
            "Consistent formatting with clear section headers, appropriate font sizes, proper spacing, and professional layout"),
        item(7, "Quantifiable Achievements",
            "Work experience includes specific metrics, numbers, percentages, or measurable accomplishments (e.g., \"increased sales by 25%\")"),
        item(8, "Certifications or Additional Sections",
            "Additional relevant sections such as certifications, projects, publications, awards, or volunteer experience"),
    ]
}

/// Item ids picked for the minimal preset: contact, work experience, education.
pub const SMALL_PRESET_IDS: [i64; 3] = [1, 3, 4];

pub const FULL_PRESET_ID: &str = "full-resume-checklist";
pub const FULL_PRESET_NAME: &str = "Full Resume Checklist";
pub const FULL_PRESET_DESCRIPTION: &str = "Complete resume verification covering contact, summary, work experience, education, skills, formatting, achievements, and optional sections.";

pub const SMALL_PRESET_ID: &str = "small-resume-checklist";
pub const SMALL_PRESET_NAME: &str = "Small Resume Checklist";
pub const SMALL_PRESET_DESCRIPTION: &str =
    "Minimal resume verification: contact, work experience, and education.";

/// Items for the small preset, filtered from the default checklist.
pub fn small_resume_items() -> Vec<ChecklistItemDefinition> {
    default_resume_items()
        .into_iter()
        .filter(|it| SMALL_PRESET_IDS.contains(&it.id))
        .collect()
}

fn item(id: i64, description: &str, criteria: &str) -> ChecklistItemDefinition {
    ChecklistItemDefinition {
        id,
        description: description.to_string(),
        criteria: criteria.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_preset_has_eight_items_with_unique_ids() {
        let items = default_resume_items();
        assert_eq!(items.len(), 8);
        let mut ids: Vec<i64> = items.iter().map(|it| it.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn small_preset_picks_contact_experience_education() {
        let items = small_resume_items();
        let ids: Vec<i64> = items.iter().map(|it| it.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(items[0].description, "Contact Information");
    }
}
