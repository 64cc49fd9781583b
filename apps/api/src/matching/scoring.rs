//! Score Aggregator: runs the matching pipeline and merges scores onto candidates.
//!
//! Flow: build prompt → `TextGenerator::generate` → interpret → index by id →
//!       annotate caller's list → stable sort by descending score.
//!
//! Stateless: every call is independent. Gateway errors are returned to the
//! caller, which decides how to degrade (see `candidates::service` and
//! `matching::handlers`).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::llm_client::{LlmError, TextGenerator};
use crate::matching::interpreter::{interpret_bullet, interpret_scores, interpret_summary};
use crate::matching::models::{BulletRequest, CandidateForScoring, CandidateScore, SummaryRequest};
use crate::matching::prompts::{build_bullet_prompt, build_scoring_prompt, build_summary_prompt};
use crate::models::candidate::CandidateResult;

/// Entry point for every model-backed operation.
#[derive(Clone)]
pub struct AiService {
    llm: Arc<dyn TextGenerator>,
}

impl AiService {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn generate_summary(&self, request: &SummaryRequest) -> Result<String, LlmError> {
        let raw = self.llm.generate(&build_summary_prompt(request)).await?;
        Ok(interpret_summary(&raw))
    }

    pub async fn improve_bullet(&self, request: &BulletRequest) -> Result<String, LlmError> {
        let raw = self.llm.generate(&build_bullet_prompt(request)).await?;
        Ok(interpret_bullet(&raw, &request.bullet))
    }

    /// Scores `candidates` against `role_description`.
    ///
    /// A blank role or an empty list scores everyone 0 without calling the model.
    pub async fn score_candidates_against_role(
        &self,
        candidates: &[CandidateForScoring],
        role_description: &str,
    ) -> Result<Vec<CandidateScore>, LlmError> {
        if role_description.trim().is_empty() || candidates.is_empty() {
            return Ok(unscored(candidates));
        }

        let prompt = build_scoring_prompt(candidates, role_description);
        let raw = self.llm.generate(&prompt).await?;
        let scores = interpret_scores(&raw, candidates);

        info!(
            "Scored {}/{} candidates against role",
            scores.len(),
            candidates.len()
        );
        Ok(scores)
    }
}

/// Zero score, empty insight, one per candidate.
pub fn unscored(candidates: &[CandidateForScoring]) -> Vec<CandidateScore> {
    candidates
        .iter()
        .map(|c| CandidateScore {
            candidate_id: c.id,
            score: 0,
            insight: String::new(),
        })
        .collect()
}

/// Annotates `results` with their scores and orders them by descending
/// `match_score`. Ties keep input order. Results with no score stay 0 / "".
pub fn apply_scores(results: Vec<CandidateResult>, scores: &[CandidateScore]) -> Vec<CandidateResult> {
    let by_id: HashMap<i32, &CandidateScore> =
        scores.iter().map(|s| (s.candidate_id, s)).collect();

    let mut ranked: Vec<CandidateResult> = results
        .into_iter()
        .map(|mut c| {
            if let Some(score) = by_id.get(&c.id) {
                c.match_score = score.score;
                c.ai_insight = score.insight.clone();
            }
            c
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}
