//! Response validation — checks a candidate value against the strict
//! tailoring-result schema.
//!
//! Total by construction: every input shape yields either a
//! [`TailoringResult`] or a list of field violations, never a panic. Unknown
//! extra fields are ignored for forward compatibility.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::cv::{CvData, SkillGroups};

/// Final result of a tailoring run. Immutable once built; a new request
/// always produces a new result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoringResult {
    #[serde(rename = "tailoredCV")]
    pub tailored_cv: CvData,
    #[serde(rename = "highlightedSkills")]
    pub highlighted_skills: Vec<String>,
    #[serde(rename = "suggestedImprovements")]
    pub suggested_improvements: Vec<String>,
}

/// A single schema violation, addressed by JSON field path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates a candidate against the tailoring-result schema.
///
/// `source_skills` are the canonical skill groups of the CV the model was
/// given; every highlighted skill must already occur there — the model may
/// emphasize skills, not invent them.
pub fn validate_candidate(
    candidate: &Value,
    source_skills: &SkillGroups,
) -> Result<TailoringResult, Vec<FieldViolation>> {
    let Some(obj) = candidate.as_object() else {
        return Err(vec![FieldViolation::new("$", "expected a JSON object")]);
    };

    let mut violations = Vec::new();

    match obj.get("tailoredCV") {
        None => violations.push(FieldViolation::new("tailoredCV", "missing required field")),
        Some(cv) => check_cv(cv, "tailoredCV", &mut violations),
    }

    match obj.get("highlightedSkills") {
        None => violations.push(FieldViolation::new(
            "highlightedSkills",
            "missing required field",
        )),
        Some(value) => {
            check_string_array(value, "highlightedSkills", &mut violations);
            if let Some(items) = value.as_array() {
                for (i, item) in items.iter().enumerate() {
                    if let Some(skill) = item.as_str() {
                        if !source_skills.contains(skill) {
                            violations.push(FieldViolation::new(
                                format!("highlightedSkills[{i}]"),
                                format!("'{skill}' does not appear in the source CV's skill lists"),
                            ));
                        }
                    }
                }
            }
        }
    }

    match obj.get("suggestedImprovements") {
        None => violations.push(FieldViolation::new(
            "suggestedImprovements",
            "missing required field",
        )),
        Some(value) => check_string_array(value, "suggestedImprovements", &mut violations),
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    // The structural walk passed; deserialization can still trip on details
    // the walk does not model, so its error is reported, not unwrapped.
    match serde_json::from_value::<TailoringResult>(candidate.clone()) {
        Ok(TailoringResult {
            tailored_cv,
            highlighted_skills,
            suggested_improvements,
        }) => match tailored_cv.normalize() {
            Ok(tailored_cv) => Ok(TailoringResult {
                tailored_cv,
                highlighted_skills: dedup_skills(highlighted_skills),
                suggested_improvements,
            }),
            Err(e) => Err(vec![FieldViolation::new("tailoredCV", e.to_string())]),
        },
        Err(e) => Err(vec![FieldViolation::new("$", e.to_string())]),
    }
}

/// Highlighted skills form a set: repeats (including case-shifted ones) are
/// collapsed, keeping first occurrences in order.
fn dedup_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .filter(|skill| seen.insert(skill.to_lowercase()))
        .collect()
}

fn check_cv(value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    let Some(obj) = value.as_object() else {
        violations.push(FieldViolation::new(path, "expected a JSON object"));
        return;
    };

    match obj.get("personal") {
        None => violations.push(FieldViolation::new(
            format!("{path}.personal"),
            "missing required field",
        )),
        Some(personal) => check_personal(personal, &format!("{path}.personal"), violations),
    }

    check_entries(
        obj.get("education"),
        &format!("{path}.education"),
        &["degree", "institution", "location", "from"],
        violations,
    );
    check_entries(
        obj.get("experience"),
        &format!("{path}.experience"),
        &["title", "company"],
        violations,
    );
    check_entries(
        obj.get("projects"),
        &format!("{path}.projects"),
        &["name", "description"],
        violations,
    );

    if let Some(skills) = obj.get("skills") {
        check_skill_groups(skills, &format!("{path}.skills"), violations);
    }

    // Split-revision fields are accepted here; normalization decides whether
    // the combination is coherent.
    check_record_list(
        obj.get("technicalSkills"),
        &format!("{path}.technicalSkills"),
        "skill",
        violations,
    );
    check_record_list(
        obj.get("softSkills"),
        &format!("{path}.softSkills"),
        "skill",
        violations,
    );
    check_record_list(
        obj.get("languages"),
        &format!("{path}.languages"),
        "language",
        violations,
    );
}

fn check_personal(value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    let Some(obj) = value.as_object() else {
        violations.push(FieldViolation::new(path, "expected a JSON object"));
        return;
    };

    for key in ["name", "title", "email"] {
        match obj.get(key) {
            None | Some(Value::Null) => violations.push(FieldViolation::new(
                format!("{path}.{key}"),
                "missing required field",
            )),
            Some(v) if !v.is_string() => {
                violations.push(FieldViolation::new(format!("{path}.{key}"), "expected a string"))
            }
            _ => {}
        }
    }

    for key in ["phone", "summary", "github", "linkedin", "website"] {
        if let Some(v) = obj.get(key) {
            if !v.is_string() && !v.is_null() {
                violations.push(FieldViolation::new(
                    format!("{path}.{key}"),
                    "expected a string or null",
                ));
            }
        }
    }
}

fn check_entries(
    value: Option<&Value>,
    path: &str,
    required: &[&str],
    violations: &mut Vec<FieldViolation>,
) {
    // Absent sequences default to empty.
    let Some(value) = value else { return };
    if value.is_null() {
        return;
    }

    let Some(items) = value.as_array() else {
        violations.push(FieldViolation::new(path, "expected an array"));
        return;
    };

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{i}]");
        let Some(obj) = item.as_object() else {
            violations.push(FieldViolation::new(item_path, "expected a JSON object"));
            continue;
        };
        for &key in required {
            match obj.get(key) {
                None | Some(Value::Null) => violations.push(FieldViolation::new(
                    format!("{item_path}.{key}"),
                    "missing required field",
                )),
                Some(v) if !v.is_string() => violations.push(FieldViolation::new(
                    format!("{item_path}.{key}"),
                    "expected a string",
                )),
                _ => {}
            }
        }
    }
}

fn check_skill_groups(value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    let Some(obj) = value.as_object() else {
        violations.push(FieldViolation::new(path, "expected a JSON object"));
        return;
    };

    for key in ["technical", "soft", "languages"] {
        if let Some(v) = obj.get(key) {
            if !v.is_null() {
                check_string_array(v, &format!("{path}.{key}"), violations);
            }
        }
    }
}

fn check_record_list(
    value: Option<&Value>,
    path: &str,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) {
    let Some(value) = value else { return };
    if value.is_null() {
        return;
    }

    let Some(items) = value.as_array() else {
        violations.push(FieldViolation::new(path, "expected an array"));
        return;
    };

    for (i, item) in items.iter().enumerate() {
        let ok = item
            .as_object()
            .and_then(|o| o.get(field))
            .map(Value::is_string)
            .unwrap_or(false);
        if !ok {
            violations.push(FieldViolation::new(
                format!("{path}[{i}]"),
                format!("expected an object with a string '{field}' field"),
            ));
        }
    }
}

fn check_string_array(value: &Value, path: &str, violations: &mut Vec<FieldViolation>) {
    let Some(items) = value.as_array() else {
        violations.push(FieldViolation::new(path, "expected an array"));
        return;
    };

    for (i, item) in items.iter().enumerate() {
        if !item.is_string() {
            violations.push(FieldViolation::new(
                format!("{path}[{i}]"),
                "expected a string",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source_skills() -> SkillGroups {
        SkillGroups {
            technical: vec!["Go".to_string(), "Kubernetes".to_string()],
            soft: vec!["Mentoring".to_string()],
            languages: vec!["English".to_string()],
        }
    }

    fn valid_candidate() -> Value {
        json!({
            "tailoredCV": {
                "personal": {
                    "name": "Ada Lovelace",
                    "title": "Platform Engineer",
                    "email": "ada@example.com"
                },
                "education": [],
                "experience": [],
                "projects": [],
                "skills": {
                    "technical": ["Go", "Kubernetes"],
                    "soft": ["Mentoring"],
                    "languages": ["English"]
                }
            },
            "highlightedSkills": ["Go", "Kubernetes"],
            "suggestedImprovements": ["Quantify the impact of your work."]
        })
    }

    fn has_violation(violations: &[FieldViolation], field: &str) -> bool {
        violations.iter().any(|v| v.field == field)
    }

    #[test]
    fn test_valid_candidate_passes() {
        let result = validate_candidate(&valid_candidate(), &source_skills()).unwrap();
        assert_eq!(result.highlighted_skills, vec!["Go", "Kubernetes"]);
        assert_eq!(result.suggested_improvements.len(), 1);
        assert_eq!(result.tailored_cv.personal.name, "Ada Lovelace");
    }

    #[test]
    fn test_empty_sequences_are_valid() {
        let mut candidate = valid_candidate();
        candidate["highlightedSkills"] = json!([]);
        candidate["suggestedImprovements"] = json!([]);
        assert!(validate_candidate(&candidate, &source_skills()).is_ok());
    }

    #[test]
    fn test_missing_tailored_cv_rejected() {
        let mut candidate = valid_candidate();
        candidate.as_object_mut().unwrap().remove("tailoredCV");
        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(&violations, "tailoredCV"));
    }

    #[test]
    fn test_missing_highlighted_skills_rejected() {
        let mut candidate = valid_candidate();
        candidate.as_object_mut().unwrap().remove("highlightedSkills");
        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(&violations, "highlightedSkills"));
    }

    #[test]
    fn test_missing_suggested_improvements_rejected() {
        let mut candidate = valid_candidate();
        candidate
            .as_object_mut()
            .unwrap()
            .remove("suggestedImprovements");
        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(&violations, "suggestedImprovements"));
    }

    #[test]
    fn test_non_string_highlighted_skill_rejected() {
        let mut candidate = valid_candidate();
        candidate["highlightedSkills"] = json!(["Go", 42]);
        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(&violations, "highlightedSkills[1]"));
    }

    #[test]
    fn test_invented_skill_rejected() {
        let mut candidate = valid_candidate();
        candidate["highlightedSkills"] = json!(["Go", "Terraform"]);
        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(&violations, "highlightedSkills[1]"));
    }

    #[test]
    fn test_case_shifted_highlighted_skill_accepted() {
        let mut candidate = valid_candidate();
        candidate["highlightedSkills"] = json!(["go", "KUBERNETES"]);
        assert!(validate_candidate(&candidate, &source_skills()).is_ok());
    }

    #[test]
    fn test_duplicate_highlighted_skills_collapse() {
        let mut candidate = valid_candidate();
        candidate["highlightedSkills"] = json!(["Go", "go", "Kubernetes", "Go"]);

        let result = validate_candidate(&candidate, &source_skills()).unwrap();
        assert_eq!(result.highlighted_skills, vec!["Go", "Kubernetes"]);
    }

    #[test]
    fn test_unknown_extra_fields_ignored() {
        let mut candidate = valid_candidate();
        candidate["confidence"] = json!(0.95);
        candidate["tailoredCV"]["themeColor"] = json!("blue");
        assert!(validate_candidate(&candidate, &source_skills()).is_ok());
    }

    #[test]
    fn test_non_object_candidate_rejected() {
        for candidate in [json!("text"), json!(42), json!([1, 2]), json!(null)] {
            let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
            assert!(has_violation(&violations, "$"));
        }
    }

    #[test]
    fn test_missing_personal_email_rejected() {
        let mut candidate = valid_candidate();
        candidate["tailoredCV"]["personal"]
            .as_object_mut()
            .unwrap()
            .remove("email");
        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(&violations, "tailoredCV.personal.email"));
    }

    #[test]
    fn test_education_entry_missing_institution_rejected() {
        let mut candidate = valid_candidate();
        candidate["tailoredCV"]["education"] = json!([
            {"degree": "BSc", "location": "London", "from": "2015"}
        ]);
        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(
            &violations,
            "tailoredCV.education[0].institution"
        ));
    }

    #[test]
    fn test_wrong_primitive_types_reported_not_panicked() {
        let mut candidate = valid_candidate();
        candidate["tailoredCV"]["personal"]["name"] = json!(123);
        candidate["tailoredCV"]["experience"] = json!("not an array");
        candidate["suggestedImprovements"] = json!({"text": "nope"});

        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(&violations, "tailoredCV.personal.name"));
        assert!(has_violation(&violations, "tailoredCV.experience"));
        assert!(has_violation(&violations, "suggestedImprovements"));
    }

    #[test]
    fn test_split_revision_tailored_cv_normalizes() {
        let mut candidate = valid_candidate();
        candidate["tailoredCV"]
            .as_object_mut()
            .unwrap()
            .remove("skills");
        candidate["tailoredCV"]["technicalSkills"] = json!([{"skill": "Go"}]);
        candidate["highlightedSkills"] = json!(["Go"]);

        let result = validate_candidate(&candidate, &source_skills()).unwrap();
        assert_eq!(result.tailored_cv.skills.technical, vec!["Go"]);
        assert!(result.tailored_cv.technical_skills.is_none());
    }

    #[test]
    fn test_mixed_skill_revisions_in_tailored_cv_rejected() {
        let mut candidate = valid_candidate();
        candidate["tailoredCV"]["technicalSkills"] = json!([{"skill": "Go"}]);
        let violations = validate_candidate(&candidate, &source_skills()).unwrap_err();
        assert!(has_violation(&violations, "tailoredCV"));
    }
}
