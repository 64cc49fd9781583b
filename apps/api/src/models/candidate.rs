use serde::Serialize;
use sqlx::FromRow;

/// A candidate profile joined with its owner's name; the columns every
/// listing, search and compare query selects.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: i32,
    pub name: String,
    pub title: Option<String>,
    pub experience_years: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills_json: String,
    pub experience_json: String,
    pub education_json: String,
}

/// Full public profile row, used by `GET /api/v1/candidates/:id`.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateProfileRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub experience_years: Option<String>,
    pub desired_role: Option<String>,
    pub professional_email: Option<String>,
    pub contact_number: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub experience_json: String,
    pub education_json: String,
    pub skills_json: String,
    pub projects_json: Option<String>,
    pub certifications_json: Option<String>,
}

/// Candidate card returned by search, list and compare.
/// `match_score` / `ai_insight` stay 0 / "" unless the matching pipeline ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
    pub id: i32,
    pub name: String,
    pub title: String,
    pub experience: String,
    pub location: String,
    pub match_score: u32,
    pub skills: Vec<String>,
    pub ai_insight: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInsight {
    pub insight: String,
    pub match_score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFullProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub title: String,
    pub summary: String,
    pub location: String,
    pub experience_years: String,
    pub desired_role: String,
    pub professional_email: String,
    pub contact_number: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub experience_json: String,
    pub education_json: String,
    pub skills_json: String,
    pub projects_json: String,
    pub certifications_json: String,
}

impl From<CandidateProfileRow> for CandidateFullProfile {
    fn from(row: CandidateProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            title: row.title.unwrap_or_default(),
            summary: row.summary.unwrap_or_default(),
            location: row.location.unwrap_or_default(),
            experience_years: row.experience_years.unwrap_or_default(),
            desired_role: row.desired_role.unwrap_or_default(),
            professional_email: row.professional_email.unwrap_or_default(),
            contact_number: row.contact_number.unwrap_or_default(),
            github_url: row.github_url.unwrap_or_default(),
            linkedin_url: row.linkedin_url.unwrap_or_default(),
            experience_json: row.experience_json,
            education_json: row.education_json,
            skills_json: row.skills_json,
            projects_json: row.projects_json.unwrap_or_else(|| "[]".to_string()),
            certifications_json: row.certifications_json.unwrap_or_else(|| "[]".to_string()),
        }
    }
}
