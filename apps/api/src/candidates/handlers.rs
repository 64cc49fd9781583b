//! Axum route handlers for the Candidates API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::candidates::repository::SearchFilters;
use crate::candidates::service;
use crate::errors::AppError;
use crate::models::candidate::{CandidateFullProfile, CandidateInsight, CandidateResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub role_description: Option<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    #[serde(default)]
    pub role_description: String,
    #[serde(default)]
    pub candidate_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub candidate_id: i32,
    pub role_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/candidates
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateResult>>, AppError> {
    Ok(Json(service::list(&state.db).await?))
}

/// GET /api/v1/candidates/search?q=&experienceLevel=&location=
pub async fn handle_search_get(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<CandidateResult>>, AppError> {
    let filters = SearchFilters {
        query: params.q.as_deref().unwrap_or_default().trim(),
        experience_level: params.experience_level.as_deref(),
        location: params.location.as_deref(),
    };
    Ok(Json(service::search(&state.db, &filters).await?))
}

/// POST /api/v1/candidates/search
///
/// Keyword search where the role description doubles as the query text.
pub async fn handle_search_post(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<CandidateResult>>, AppError> {
    let filters = SearchFilters {
        query: request.role_description.as_deref().unwrap_or_default().trim(),
        experience_level: request.experience_level.as_deref(),
        location: request.location.as_deref(),
    };
    Ok(Json(service::search(&state.db, &filters).await?))
}

/// POST /api/v1/candidates/compare
///
/// Scores the selected candidates against a role and returns them best-first.
/// Model failures degrade to an unscored list, never to an error.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<Vec<CandidateResult>>, AppError> {
    if request.candidate_ids.is_empty() {
        return Err(AppError::Validation(
            "candidateIds must not be empty".to_string(),
        ));
    }

    let ranked = service::compare_candidates(
        &state.db,
        &state.ai,
        &request.role_description,
        &request.candidate_ids,
    )
    .await?;
    Ok(Json(ranked))
}

/// POST /api/v1/candidates/insight
pub async fn handle_insight(
    State(state): State<AppState>,
    Json(request): Json<InsightRequest>,
) -> Result<Json<CandidateInsight>, AppError> {
    let insight = service::candidate_insight(
        &state.db,
        &state.ai,
        request.candidate_id,
        request.role_description.as_deref(),
    )
    .await?;
    Ok(Json(insight))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CandidateFullProfile>, AppError> {
    Ok(Json(service::public_profile(&state.db, id).await?))
}
