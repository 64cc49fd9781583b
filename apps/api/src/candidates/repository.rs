//! Read-only candidate queries.
//!
//! A candidate is *public* when its user has the CANDIDATE role, the profile
//! is PUBLIC and onboarding has been completed.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::candidate::{CandidateProfileRow, CandidateRow};

const SEARCH_LIMIT: i64 = 50;
const LIST_LIMIT: i64 = 100;

const CANDIDATE_SELECT: &str = "\
    SELECT cp.id, u.name, cp.title, cp.experience_years, cp.location, cp.summary, \
           cp.skills_json, cp.experience_json, cp.education_json \
    FROM candidate_profiles cp \
    INNER JOIN users u ON cp.user_id = u.id";

const PUBLIC_FILTER: &str = "\
    u.role = 'CANDIDATE' \
    AND cp.visibility = 'PUBLIC' \
    AND cp.profile_completed_at IS NOT NULL";

/// Optional filters for candidate search.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters<'a> {
    /// Whitespace-separated words; a candidate matches if any word appears in its resume text.
    pub query: &'a str,
    pub experience_level: Option<&'a str>,
    pub location: Option<&'a str>,
}

fn build_search_query<'a>(filters: &SearchFilters<'a>) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!("{CANDIDATE_SELECT} WHERE {PUBLIC_FILTER}"));

    let words: Vec<&str> = filters.query.split_whitespace().collect();
    if !words.is_empty() {
        qb.push(" AND (");
        let mut any_word = qb.separated(" OR ");
        for word in words {
            any_word.push("cp.resume_text ILIKE ");
            any_word.push_bind_unseparated(format!("%{word}%"));
        }
        qb.push(")");
    }

    if let Some(level) = filters.experience_level.filter(|l| *l != "Any") {
        qb.push(" AND cp.experience_years ILIKE ");
        qb.push_bind(format!("%{level}%"));
    }

    if let Some(location) = filters.location.map(str::trim).filter(|l| !l.is_empty()) {
        qb.push(" AND cp.location ILIKE ");
        qb.push_bind(format!("%{location}%"));
    }

    qb.push(" LIMIT ");
    qb.push_bind(SEARCH_LIMIT);
    qb
}

pub async fn search_candidates(
    pool: &PgPool,
    filters: &SearchFilters<'_>,
) -> Result<Vec<CandidateRow>, sqlx::Error> {
    let mut qb = build_search_query(filters);
    let rows = qb.build_query_as::<CandidateRow>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn list_public_candidates(pool: &PgPool) -> Result<Vec<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(&format!(
        "{CANDIDATE_SELECT} WHERE {PUBLIC_FILTER} LIMIT $1"
    ))
    .bind(LIST_LIMIT)
    .fetch_all(pool)
    .await
}

/// Fetches the given profiles regardless of visibility, in the order of `ids`.
pub async fn fetch_candidates_by_ids(
    pool: &PgPool,
    ids: &[i32],
) -> Result<Vec<CandidateRow>, sqlx::Error> {
    let mut rows = sqlx::query_as::<_, CandidateRow>(&format!(
        "{CANDIDATE_SELECT} WHERE cp.id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    rows.sort_by_key(|row| ids.iter().position(|id| *id == row.id));
    Ok(rows)
}

pub async fn fetch_candidate_by_id(
    pool: &PgPool,
    id: i32,
) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>(&format!("{CANDIDATE_SELECT} WHERE cp.id = $1 LIMIT 1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_public_profile(
    pool: &PgPool,
    id: i32,
) -> Result<Option<CandidateProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateProfileRow>(&format!(
        r#"
        SELECT cp.id, u.name, u.email, cp.title, cp.summary, cp.location,
               cp.experience_years, cp.desired_role, cp.professional_email,
               cp.contact_number, cp.github_url, cp.linkedin_url,
               cp.experience_json, cp.education_json, cp.skills_json,
               cp.projects_json, cp.certifications_json
        FROM candidate_profiles cp
        INNER JOIN users u ON cp.user_id = u.id
        WHERE cp.id = $1 AND {PUBLIC_FILTER}
        LIMIT 1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}
