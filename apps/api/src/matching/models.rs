use serde::{Deserialize, Serialize};

/// Input for professional-summary generation. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub title: Option<String>,
    pub desired_role: Option<String>,
    pub experience_years: Option<String>,
    pub skills: Option<Vec<String>>,
    pub current_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Input for rewriting a single resume bullet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletRequest {
    pub bullet: String,
    pub role_context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletResponse {
    pub bullet: String,
}

/// Flattened, read-only view of a candidate as the scoring prompt sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateForScoring {
    pub id: i32,
    pub name: String,
    pub title: String,
    pub experience: String,
    pub location: String,
    pub skills: Vec<String>,
    pub summary: Option<String>,
    /// Jobs, achievements and education joined into one narrative string.
    pub work_experience: Option<String>,
}

/// Model-estimated fit of one candidate against a role. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScore {
    pub candidate_id: i32,
    pub score: u32, // 0 – 100
    pub insight: String,
}
