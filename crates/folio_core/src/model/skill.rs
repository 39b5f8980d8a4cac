//! Skill domain model.

use serde::{Deserialize, Serialize};

/// Skill catalog entry.
///
/// Only `name` and `icon` are required; the remaining fields are display
/// metadata and default to empty on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    /// Icon class identifier (e.g. `fab fa-html5`).
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Short code sample shown on the skill page.
    #[serde(default)]
    pub code: Option<String>,
}

impl Skill {
    /// Two skills conflict when either the name or the icon matches.
    ///
    /// Name comparison ignores ASCII case; icon classes are matched exactly.
    pub fn conflicts_with(&self, other: &Skill) -> bool {
        self.name.eq_ignore_ascii_case(&other.name) || self.icon == other.icon
    }

    /// Returns the name of the first missing required field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            return Some("name");
        }
        if self.icon.trim().is_empty() {
            return Some("icon");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::Skill;

    fn skill(name: &str, icon: &str) -> Skill {
        Skill {
            name: name.to_string(),
            icon: icon.to_string(),
            color: None,
            description: None,
            code: None,
        }
    }

    #[test]
    fn conflict_on_name_ignores_case() {
        assert!(skill("Rust", "fab fa-rust").conflicts_with(&skill("rust", "other")));
    }

    #[test]
    fn conflict_on_icon_is_exact() {
        assert!(skill("A", "fab fa-js").conflicts_with(&skill("B", "fab fa-js")));
        assert!(!skill("A", "fab fa-js").conflicts_with(&skill("B", "fab fa-JS")));
    }

    #[test]
    fn missing_field_requires_name_and_icon() {
        assert_eq!(skill("", "i").missing_field(), Some("name"));
        assert_eq!(skill("n", " ").missing_field(), Some("icon"));
        assert_eq!(skill("n", "i").missing_field(), None);
    }
}
