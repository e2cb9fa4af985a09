//! Deterministic keyword-matching fallback.
//!
//! The availability guarantee of the tailoring endpoint: whenever the
//! generation path fails, the caller still receives a structurally valid
//! result built from the CV it already owns. No external calls, no failure
//! modes.

use crate::models::cv::CvData;
use crate::tailoring::validator::TailoringResult;

/// The single generic suggestion attached to every fallback result.
pub const FALLBACK_SUGGESTION: &str =
    "Consider adding more specific details to your experience section.";

/// Produces a tailoring result without calling any external service.
///
/// The CV is returned unchanged. Highlighted skills are the technical and
/// soft skills whose text occurs, case-insensitively, inside the job
/// description — plain substring containment, no stemming, no tokenization.
pub fn fallback_tailoring(cv: &CvData, job_description: &str) -> TailoringResult {
    let jd_lower = job_description.to_lowercase();

    let highlighted = cv
        .skills
        .technical
        .iter()
        .chain(cv.skills.soft.iter())
        .filter(|skill| !skill.is_empty() && jd_lower.contains(&skill.to_lowercase()))
        .cloned()
        .collect();

    TailoringResult {
        tailored_cv: cv.clone(),
        highlighted_skills: highlighted,
        suggested_improvements: vec![FALLBACK_SUGGESTION.to_string()],
    }
}
