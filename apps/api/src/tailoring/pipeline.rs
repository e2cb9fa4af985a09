//! Tailoring orchestrator — composes the store, prompt builder, generation
//! client, extractor, validator, and fallback into one request flow.
//!
//! Flow: auth check → request validation → store read → normalize →
//!       build prompt → generate → extract → validate →
//!       (fallback on any generation-side failure) → persist snapshot.
//!
//! Each invocation performs exactly one store read, at most one generation
//! call, and at most one store write. Concurrent requests for the same CV are
//! not coordinated; every run produces a fresh, independent result.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::GenerationClient;
use crate::models::cv::CvData;
use crate::store::{CvStore, NewTailoredCv};
use crate::tailoring::extractor::extract_candidate;
use crate::tailoring::fallback::fallback_tailoring;
use crate::tailoring::prompts::{build_tailor_prompt, TAILOR_SYSTEM};
use crate::tailoring::validator::{validate_candidate, TailoringResult};

/// Inbound tailoring request. Consumed once, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct TailorRequest {
    #[serde(rename = "cvID")]
    pub cv_id: String,
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    pub company: String,
    #[serde(rename = "jobDescription")]
    pub job_description: String,
}

impl TailorRequest {
    /// All four fields are required and must be non-blank.
    fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("cvID", &self.cv_id),
            ("jobTitle", &self.job_title),
            ("company", &self.company),
            ("jobDescription", &self.job_description),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// The tailoring pipeline with its collaborators injected at construction.
pub struct TailoringPipeline {
    store: Arc<dyn CvStore>,
    llm: Arc<dyn GenerationClient>,
}

impl TailoringPipeline {
    pub fn new(store: Arc<dyn CvStore>, llm: Arc<dyn GenerationClient>) -> Self {
        Self { store, llm }
    }

    /// Runs the full tailoring flow for one request.
    ///
    /// Only caller-caused problems surface as errors; generation, parse, and
    /// validation failures all degrade to the deterministic fallback.
    pub async fn run(
        &self,
        principal: Option<&str>,
        request: &TailorRequest,
    ) -> Result<TailoringResult, AppError> {
        let Some(user_id) = principal else {
            return Err(AppError::Unauthorized);
        };

        request.validate()?;

        let record = self
            .store
            .get_cv(&request.cv_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("CV {} not found", request.cv_id)))?;

        let cv = record
            .data
            .normalize()
            .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

        let prompt = build_tailor_prompt(
            &cv,
            &request.job_description,
            Some(&request.job_title),
            Some(&request.company),
        );

        let result = match self.llm.generate(TAILOR_SYSTEM, &prompt).await {
            Ok(raw) => self.interpret(&cv, &request.job_description, &raw),
            Err(e) => {
                warn!(error = %e, "generation call failed, using keyword fallback");
                fallback_tailoring(&cv, &request.job_description)
            }
        };

        self.persist(user_id, &record.id, request, &result).await;

        Ok(result)
    }

    /// Extracts and validates raw model output, degrading to the fallback on
    /// any failure. Discarded output is logged, never surfaced to the caller.
    fn interpret(&self, cv: &CvData, job_description: &str, raw: &str) -> TailoringResult {
        let candidate = match extract_candidate(Some(raw)) {
            Ok(candidate) => candidate,
            Err(reason) => {
                warn!(
                    %reason,
                    raw_output = raw,
                    "model output not parseable, using keyword fallback"
                );
                return fallback_tailoring(cv, job_description);
            }
        };

        match validate_candidate(&candidate, &cv.skills) {
            Ok(result) => result,
            Err(violations) => {
                warn!(
                    ?violations,
                    raw_output = raw,
                    "model output failed schema validation, using keyword fallback"
                );
                fallback_tailoring(cv, job_description)
            }
        }
    }

    /// Persists the result snapshot. Failures are logged and do not change
    /// the response already computed.
    async fn persist(
        &self,
        user_id: &str,
        cv_id: &str,
        request: &TailorRequest,
        result: &TailoringResult,
    ) {
        let tailored_data = match serde_json::to_value(result) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize tailoring result for persistence");
                return;
            }
        };

        let record = NewTailoredCv {
            cv_id: cv_id.to_string(),
            user_id: user_id.to_string(),
            job_title: request.job_title.clone(),
            company: request.company.clone(),
            job_description: request.job_description.clone(),
            tailored_data,
        };

        match self.store.insert_tailored(record).await {
            Ok(()) => info!(cv_id, "tailored CV persisted"),
            Err(e) => tracing::error!(error = %e, cv_id, "failed to persist tailored CV"),
        }
    }
}
