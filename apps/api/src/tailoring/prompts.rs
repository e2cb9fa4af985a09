//! Prompt constants and the tailoring prompt builder.

use crate::models::cv::CvData;

/// System prompt for CV tailoring — enforces JSON-only output.
pub const TAILOR_SYSTEM: &str =
    "You are a professional CV tailoring assistant that helps match CVs to job descriptions. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Placeholder used when the request omits an optional targeting field.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Tailoring prompt template. Replace `{cv_json}`, `{job_description}`,
/// `{job_title}`, and `{company}` before sending.
const TAILOR_PROMPT_TEMPLATE: &str = r#"You are a professional CV tailoring assistant. Your task is to analyze a CV and a job description, and identify which skills and experiences in the CV are most relevant to the job.

CV DATA:
{cv_json}

JOB DESCRIPTION:
{job_description}

JOB TITLE: {job_title}
COMPANY: {company}

Respond with pure JSON, no markdown fencing. Return a JSON object with the following structure:
{
  "tailoredCV": {
    // The entire CV with any modifications you recommend
  },
  "highlightedSkills": [
    // Skills from the CV that are most relevant to the job
  ],
  "suggestedImprovements": [
    // Suggestions for improving the CV for this specific job
  ]
}

Focus on identifying relevant skills, experiences, and projects that match the job requirements.
Do not invent new information, only work with what is provided in the CV."#;

/// Builds the tailoring prompt.
///
/// Deterministic: identical inputs always produce identical text. Missing
/// optional fields degrade to [`NOT_SPECIFIED`], never to an error.
pub fn build_tailor_prompt(
    cv: &CvData,
    job_description: &str,
    job_title: Option<&str>,
    company: Option<&str>,
) -> String {
    let cv_json = serde_json::to_string(cv).unwrap_or_else(|_| "{}".to_string());

    fill_template(
        TAILOR_PROMPT_TEMPLATE,
        &[
            ("{cv_json}", &cv_json),
            ("{job_description}", job_description),
            (
                "{job_title}",
                job_title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or(NOT_SPECIFIED),
            ),
            (
                "{company}",
                company
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or(NOT_SPECIFIED),
            ),
        ],
    )
}

/// Substitutes every `(token, value)` pair into `template` in one left-to-right
/// pass. Substituted values are never rescanned, so a token that happens to
/// appear inside a caller-supplied value (say, `{company}` in a job
/// description) stays verbatim.
fn fill_template(template: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while !rest.is_empty() {
        let next = fields
            .iter()
            .filter_map(|(token, value)| rest.find(token).map(|pos| (pos, *token, *value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, token, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + token.len()..];
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }

    out
}
