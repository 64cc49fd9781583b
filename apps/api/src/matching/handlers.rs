//! Axum route handlers for the writing-assist API.
//!
//! A failed model call never reaches the caller: summary falls back to a
//! generic paragraph, bullet to the caller's own text.

use axum::{extract::State, Json};
use tracing::warn;

use crate::errors::AppError;
use crate::matching::interpreter::DEFAULT_SUMMARY;
use crate::matching::models::{BulletRequest, BulletResponse, SummaryRequest, SummaryResponse};
use crate::state::AppState;

/// POST /api/v1/ai/summary
///
/// Drafts a 3–5 sentence professional summary from the candidate's profile fields.
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Json<SummaryResponse> {
    let summary = match state.ai.generate_summary(&request).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Summary generation failed, returning default summary: {e}");
            DEFAULT_SUMMARY.to_string()
        }
    };
    Json(SummaryResponse { summary })
}

/// POST /api/v1/ai/bullet
///
/// Rewrites one resume bullet to be action-oriented and impact-focused.
pub async fn handle_improve_bullet(
    State(state): State<AppState>,
    Json(request): Json<BulletRequest>,
) -> Result<Json<BulletResponse>, AppError> {
    if request.bullet.trim().is_empty() {
        return Err(AppError::Validation("bullet cannot be empty".to_string()));
    }

    let bullet = match state.ai.improve_bullet(&request).await {
        Ok(bullet) => bullet,
        Err(e) => {
            warn!("Bullet rewrite failed, returning original bullet: {e}");
            request.bullet.clone()
        }
    };
    Ok(Json(BulletResponse { bullet }))
}
