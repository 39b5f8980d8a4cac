//! Project domain model.
//!
//! # Responsibility
//! - Define the project record and its draft (form input) shape.
//! - Provide the text-matching rule used by list filtering.
//!
//! # Invariants
//! - `id` is stable and never reused for another project.
//! - A draft is valid only when title and description are non-blank.

use serde::{Deserialize, Serialize};

/// Stable identifier for a project record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Ids are epoch-millisecond based but strictly monotonic, so records
/// created within the same millisecond still get distinct identities.
pub type ProjectId = i64;

/// Canonical portfolio project record.
///
/// Serialization defaults keep import tolerant of records that omit
/// optional fields; `id` defaults to zero and is always regenerated on
/// import, so imported identities never collide with existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable id used for edit/delete targeting and import deduplication.
    #[serde(default)]
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    /// Image URL or embedded binary-as-text payload.
    #[serde(default)]
    pub image: Option<String>,
    /// Ordered technology labels, blank entries already filtered out.
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Optional live demo URL.
    #[serde(default)]
    pub demo: Option<String>,
}

impl Project {
    /// Builds a project from a normalized draft under a caller-provided id.
    pub fn from_draft(id: ProjectId, draft: ProjectDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            image: draft.image,
            technologies: draft.technologies,
            demo: draft.demo,
        }
    }

    /// Replaces all mutable fields in place, preserving `id`.
    pub fn apply_draft(&mut self, draft: ProjectDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.image = draft.image;
        self.technologies = draft.technologies;
        self.demo = draft.demo;
    }

    /// Case-insensitive substring match over title, description and
    /// joined technologies. Blank terms match everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {} {}",
            self.title,
            self.description,
            self.technologies.join(" ")
        )
        .to_lowercase();
        haystack.contains(&term)
    }
}

/// Form-level input for creating or editing a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub technologies: Vec<String>,
    pub demo: Option<String>,
}

impl ProjectDraft {
    /// Trims text fields and drops blank technology entries.
    ///
    /// Empty optional fields collapse to `None` so "no image" and
    /// "blank image input" compare equal during duplicate checks.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.image = normalize_optional(self.image);
        self.demo = normalize_optional(self.demo);
        self.technologies = self
            .technologies
            .into_iter()
            .map(|tech| tech.trim().to_string())
            .filter(|tech| !tech.is_empty())
            .collect();
        self
    }

    /// Returns the name of the first missing required field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            return Some("title");
        }
        if self.description.trim().is_empty() {
            return Some("description");
        }
        None
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Audit record for one deletion event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Title of the deleted project.
    pub title: String,
    /// Human-formatted local timestamp of the deletion.
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectDraft};

    fn draft(title: &str, description: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            description: description.to_string(),
            ..ProjectDraft::default()
        }
    }

    #[test]
    fn normalized_trims_and_drops_blank_entries() {
        let normalized = ProjectDraft {
            title: "  Portfolio  ".to_string(),
            description: " demo site ".to_string(),
            image: Some("   ".to_string()),
            technologies: vec!["HTML".to_string(), "  ".to_string(), " CSS ".to_string()],
            demo: None,
        }
        .normalized();

        assert_eq!(normalized.title, "Portfolio");
        assert_eq!(normalized.image, None);
        assert_eq!(normalized.technologies, vec!["HTML", "CSS"]);
    }

    #[test]
    fn missing_field_reports_title_then_description() {
        assert_eq!(draft("", "x").missing_field(), Some("title"));
        assert_eq!(draft("x", " ").missing_field(), Some("description"));
        assert_eq!(draft("x", "y").missing_field(), None);
    }

    #[test]
    fn matches_is_case_insensitive_over_all_text_fields() {
        let project = Project::from_draft(
            1,
            ProjectDraft {
                title: "Portfolio".to_string(),
                description: "demo site".to_string(),
                technologies: vec!["HTML".to_string(), "CSS".to_string()],
                ..ProjectDraft::default()
            },
        );

        assert!(project.matches("portfolio"));
        assert!(project.matches("DEMO"));
        assert!(project.matches("css"));
        assert!(project.matches(""));
        assert!(!project.matches("rust"));
    }

    #[test]
    fn deserialization_defaults_missing_optional_fields() {
        let project: Project =
            serde_json::from_str(r#"{"title":"A","description":"B"}"#).unwrap();
        assert_eq!(project.id, 0);
        assert!(project.technologies.is_empty());
        assert!(project.image.is_none());
    }
}
