//! Candidates Service: search, compare and per-candidate insight.
//!
//! Compare flow: fetch rows → unscored cards + scoring inputs →
//!               AiService::score_candidates_against_role → apply_scores.
//!
//! The model is never allowed to fail a request: a gateway error during
//! compare returns the unscored cards, and during insight a fixed message.

use sqlx::PgPool;
use tracing::warn;

use crate::candidates::projection::{to_candidate_result, to_scoring_input};
use crate::candidates::repository::{
    fetch_candidate_by_id, fetch_candidates_by_ids, fetch_public_profile,
    list_public_candidates, search_candidates, SearchFilters,
};
use crate::errors::AppError;
use crate::matching::scoring::apply_scores;
use crate::matching::AiService;
use crate::models::candidate::{CandidateFullProfile, CandidateInsight, CandidateResult, CandidateRow};

/// Used when a single-candidate insight is requested without a role.
const DEFAULT_ROLE_CONTEXT: &str = "General technical role";
const INSIGHT_UNAVAILABLE: &str = "Unable to generate insight.";
const MAX_SCORE: u32 = 100;

pub async fn search(pool: &PgPool, filters: &SearchFilters<'_>) -> Result<Vec<CandidateResult>, AppError> {
    let rows = search_candidates(pool, filters).await?;
    Ok(rows.iter().map(to_candidate_result).collect())
}

pub async fn list(pool: &PgPool) -> Result<Vec<CandidateResult>, AppError> {
    let rows = list_public_candidates(pool).await?;
    Ok(rows.iter().map(to_candidate_result).collect())
}

pub async fn public_profile(pool: &PgPool, id: i32) -> Result<CandidateFullProfile, AppError> {
    fetch_public_profile(pool, id)
        .await?
        .map(CandidateFullProfile::from)
        .ok_or_else(|| AppError::NotFound("Candidate profile not found".to_string()))
}

/// Ranks the given candidates against `role_description`.
/// Blank role or no ids → empty list, without touching the database or the model.
pub async fn compare_candidates(
    pool: &PgPool,
    ai: &AiService,
    role_description: &str,
    candidate_ids: &[i32],
) -> Result<Vec<CandidateResult>, AppError> {
    if role_description.trim().is_empty() || candidate_ids.is_empty() {
        return Ok(vec![]);
    }

    let rows = fetch_candidates_by_ids(pool, candidate_ids).await?;
    Ok(rank_rows(ai, &rows, role_description).await)
}

/// Scores `rows` and returns them best-first. Degrades to the unscored
/// cards in input order if the model call fails.
pub async fn rank_rows(ai: &AiService, rows: &[CandidateRow], role_description: &str) -> Vec<CandidateResult> {
    if rows.is_empty() {
        return vec![];
    }

    let base: Vec<CandidateResult> = rows.iter().map(to_candidate_result).collect();
    let inputs: Vec<_> = rows.iter().map(to_scoring_input).collect();

    match ai.score_candidates_against_role(&inputs, role_description).await {
        Ok(scores) => apply_scores(base, &scores),
        Err(e) => {
            warn!("Candidate scoring failed, returning unscored list: {e}");
            base
        }
    }
}

pub async fn candidate_insight(
    pool: &PgPool,
    ai: &AiService,
    candidate_id: i32,
    role_description: Option<&str>,
) -> Result<CandidateInsight, AppError> {
    match fetch_candidate_by_id(pool, candidate_id).await? {
        Some(row) => Ok(insight_for_row(ai, &row, role_description).await),
        None => Ok(CandidateInsight {
            insight: String::new(),
            match_score: 0,
        }),
    }
}

pub async fn insight_for_row(
    ai: &AiService,
    row: &CandidateRow,
    role_description: Option<&str>,
) -> CandidateInsight {
    let role = role_description
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_ROLE_CONTEXT);

    match ai
        .score_candidates_against_role(&[to_scoring_input(row)], role)
        .await
    {
        Ok(scores) => {
            if let Some(first) = scores.into_iter().next() {
                return CandidateInsight {
                    insight: first.insight,
                    match_score: first.score.min(MAX_SCORE),
                };
            }
        }
        Err(e) => warn!("Insight generation failed for candidate {}: {e}", row.id),
    }

    CandidateInsight {
        insight: INSIGHT_UNAVAILABLE.to_string(),
        match_score: 0,
    }
}
