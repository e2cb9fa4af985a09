//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::pipeline::TailorRequest;
use crate::tailoring::validator::TailoringResult;

/// POST /api/v1/tailor
///
/// Runs the tailoring pipeline against one of the caller's stored CVs.
/// Generation-side failures never surface here; the response is always a
/// usable tailoring result or a caller-caused 4xx. Body deserialization
/// failures are folded into the same 400 path as empty-field violations.
pub async fn handle_tailor(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<TailorRequest>, JsonRejection>,
) -> Result<Json<TailoringResult>, AppError> {
    let Json(request) = payload?;
    let result = state.pipeline.run(Some(&user.user_id), &request).await?;
    Ok(Json(result))
}
