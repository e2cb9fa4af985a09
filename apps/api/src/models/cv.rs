//! Canonical CV data model.
//!
//! The stored `data` column has two historical shapes for skills: a grouped
//! object (`skills.technical` / `skills.soft` / `skills.languages`) and a
//! later split form (`technicalSkills` / `softSkills` / `languages` as lists
//! of single-field records). Exactly one of the two is in force for any given
//! record. [`CvData::normalize`] folds a record into the grouped canonical
//! form right after the store read, so the rest of the pipeline only ever
//! sees the canonical shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Grouped (canonical) skills representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGroups {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl SkillGroups {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty() && self.languages.is_empty()
    }

    /// Case-insensitive membership across all three groups.
    pub fn contains(&self, skill: &str) -> bool {
        let needle = skill.to_lowercase();
        self.technical
            .iter()
            .chain(&self.soft)
            .chain(&self.languages)
            .any(|s| s.to_lowercase() == needle)
    }
}

/// Split-revision skill record (`{"skill": "Rust"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub skill: String,
}

/// Split-revision language record (`{"language": "English"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvData {
    pub personal: PersonalInfo,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: SkillGroups,
    // Split-revision fields. Present only on un-normalized records.
    #[serde(
        default,
        rename = "technicalSkills",
        skip_serializing_if = "Option::is_none"
    )]
    pub technical_skills: Option<Vec<SkillEntry>>,
    #[serde(default, rename = "softSkills", skip_serializing_if = "Option::is_none")]
    pub soft_skills: Option<Vec<SkillEntry>>,
    #[serde(default, rename = "languages", skip_serializing_if = "Option::is_none")]
    pub language_entries: Option<Vec<LanguageEntry>>,
}

/// A record populated in both skill revisions at once. There is no rule for
/// reconciling the two, so such records are rejected as a data error.
#[derive(Debug, Error, PartialEq)]
#[error("CV record carries both grouped and split skill representations")]
pub struct SkillsDriftError;

impl CvData {
    /// Folds the split skills revision into the grouped canonical form.
    pub fn normalize(mut self) -> Result<CvData, SkillsDriftError> {
        let has_split = self
            .technical_skills
            .as_ref()
            .is_some_and(|v| !v.is_empty())
            || self.soft_skills.as_ref().is_some_and(|v| !v.is_empty())
            || self.language_entries.as_ref().is_some_and(|v| !v.is_empty());

        if has_split && !self.skills.is_empty() {
            return Err(SkillsDriftError);
        }

        if has_split {
            self.skills = SkillGroups {
                technical: self
                    .technical_skills
                    .iter()
                    .flatten()
                    .map(|e| e.skill.clone())
                    .collect(),
                soft: self
                    .soft_skills
                    .iter()
                    .flatten()
                    .map(|e| e.skill.clone())
                    .collect(),
                languages: self
                    .language_entries
                    .iter()
                    .flatten()
                    .map(|e| e.language.clone())
                    .collect(),
            };
        }

        self.technical_skills = None;
        self.soft_skills = None;
        self.language_entries = None;

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grouped_doc() -> serde_json::Value {
        json!({
            "personal": {
                "name": "Ada Lovelace",
                "title": "Backend Engineer",
                "email": "ada@example.com"
            },
            "education": [],
            "experience": [],
            "projects": [],
            "skills": {
                "technical": ["Rust", "Postgres"],
                "soft": ["Mentoring"],
                "languages": ["English"]
            }
        })
    }

    #[test]
    fn test_grouped_revision_deserializes() {
        let cv: CvData = serde_json::from_value(grouped_doc()).unwrap();
        assert_eq!(cv.skills.technical, vec!["Rust", "Postgres"]);
        assert!(cv.technical_skills.is_none());
    }

    #[test]
    fn test_split_revision_normalizes_to_grouped() {
        let doc = json!({
            "personal": {
                "name": "Ada Lovelace",
                "title": "Backend Engineer",
                "email": "ada@example.com"
            },
            "technicalSkills": [{"skill": "Rust"}, {"skill": "Postgres"}],
            "softSkills": [{"skill": "Mentoring"}],
            "languages": [{"language": "English"}]
        });

        let cv: CvData = serde_json::from_value(doc).unwrap();
        let cv = cv.normalize().unwrap();

        assert_eq!(cv.skills.technical, vec!["Rust", "Postgres"]);
        assert_eq!(cv.skills.soft, vec!["Mentoring"]);
        assert_eq!(cv.skills.languages, vec!["English"]);
        assert!(cv.technical_skills.is_none());
        assert!(cv.soft_skills.is_none());
        assert!(cv.language_entries.is_none());
    }

    #[test]
    fn test_mixed_revisions_rejected() {
        let mut doc = grouped_doc();
        doc["technicalSkills"] = json!([{"skill": "Go"}]);

        let cv: CvData = serde_json::from_value(doc).unwrap();
        assert_eq!(cv.normalize().unwrap_err(), SkillsDriftError);
    }

    #[test]
    fn test_normalize_is_identity_for_grouped_records() {
        let cv: CvData = serde_json::from_value(grouped_doc()).unwrap();
        let normalized = cv.clone().normalize().unwrap();
        assert_eq!(normalized, cv);
    }

    #[test]
    fn test_missing_skills_defaults_to_empty_groups() {
        let doc = json!({
            "personal": {
                "name": "Ada Lovelace",
                "title": "Backend Engineer",
                "email": "ada@example.com"
            }
        });

        let cv: CvData = serde_json::from_value(doc).unwrap();
        let cv = cv.normalize().unwrap();
        assert!(cv.skills.is_empty());
        assert!(cv.education.is_empty());
    }

    #[test]
    fn test_canonical_serialization_omits_split_fields() {
        let cv: CvData = serde_json::from_value(grouped_doc()).unwrap();
        let out = serde_json::to_value(&cv).unwrap();
        let obj = out.as_object().unwrap();
        assert!(!obj.contains_key("technicalSkills"));
        assert!(!obj.contains_key("softSkills"));
        assert!(!obj.contains_key("languages"));
    }

    #[test]
    fn test_skill_groups_contains_is_case_insensitive() {
        let cv: CvData = serde_json::from_value(grouped_doc()).unwrap();
        assert!(cv.skills.contains("rust"));
        assert!(cv.skills.contains("MENTORING"));
        assert!(cv.skills.contains("english"));
        assert!(!cv.skills.contains("Go"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut doc = grouped_doc();
        doc["themeColor"] = json!("blue");
        let cv: Result<CvData, _> = serde_json::from_value(doc);
        assert!(cv.is_ok());
    }
}
