//! Candidate projections: turn stored profile rows into the views the API
//! returns and the input the matching pipeline consumes.
//!
//! The JSON columns are user-authored; anything malformed degrades to empty
//! output rather than an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::matching::models::CandidateForScoring;
use crate::models::candidate::{CandidateResult, CandidateRow};

const HIGHLIGHTS_PER_JOB: usize = 2;
const MAX_HIGHLIGHTS: usize = 5;
const DATE_SEPARATOR: &str = " – ";

/// Fields that are not text (or a number) are treated as absent rather than
/// failing the whole entry.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text_list")]
    bullets: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EducationEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    school: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    degree: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    end_date: Option<String>,
}

fn text_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_value(Value::deserialize(deserializer)?))
}

fn lenient_text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().filter_map(text_value).collect()),
        _ => None,
    })
}

/// Decodes a JSON array column entry by entry; entries that are not objects
/// are skipped, a column that is not an array yields nothing.
fn parse_entries<T: DeserializeOwned>(raw: &str) -> Vec<T> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => vec![],
    }
}

/// Decodes the `skills_json` column. Non-string elements are skipped.
pub fn parse_skills(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => vec![],
    }
}

/// First two bullets of each job, at most five overall.
pub fn extract_highlights(experience_json: &str) -> Vec<String> {
    parse_entries::<JobEntry>(experience_json)
        .into_iter()
        .flat_map(|job| {
            job.bullets
                .unwrap_or_default()
                .into_iter()
                .take(HIGHLIGHTS_PER_JOB)
        })
        .take(MAX_HIGHLIGHTS)
        .collect()
}

/// Renders jobs and education as one narrative for the scoring prompt, e.g.
/// `Engineer at Acme (2020 – 2023): Shipped X; Cut Y. Education: MIT, BSc (2016 – 2020)`.
pub fn build_work_experience_summary(experience_json: &str, education_json: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::new();

    let raw_jobs = if experience_json.is_empty() { "[]" } else { experience_json };
    for job in parse_entries::<JobEntry>(raw_jobs) {
        let role = join_present(&[&job.title, &job.company], " at ");
        if role.is_empty() {
            continue;
        }
        let mut line = role;
        let dates = join_present(&[&job.start_date, &job.end_date], DATE_SEPARATOR);
        if !dates.is_empty() {
            line.push_str(&format!(" ({dates})"));
        }
        if let Some(bullets) = job.bullets.filter(|b| !b.is_empty()) {
            line.push_str(": ");
            line.push_str(&bullets.join("; "));
        }
        parts.push(line);
    }

    if let Some(raw_education) = education_json.filter(|e| !e.is_empty()) {
        let lines: Vec<String> = parse_entries::<EducationEntry>(raw_education)
            .iter()
            .filter_map(|e| {
                let school = join_present(&[&e.school, &e.degree], ", ");
                if school.is_empty() {
                    return None;
                }
                let dates = join_present(&[&e.start_date, &e.end_date], DATE_SEPARATOR);
                Some(if dates.is_empty() {
                    school
                } else {
                    format!("{school} ({dates})")
                })
            })
            .collect();
        if !lines.is_empty() {
            parts.push(format!("Education: {}", lines.join("; ")));
        }
    }

    parts.join(". ")
}

/// Unscored card for list / search / compare responses.
pub fn to_candidate_result(row: &CandidateRow) -> CandidateResult {
    CandidateResult {
        id: row.id,
        name: row.name.clone(),
        title: row.title.clone().unwrap_or_default(),
        experience: row.experience_years.clone().unwrap_or_default(),
        location: row.location.clone().unwrap_or_default(),
        match_score: 0,
        skills: parse_skills(&row.skills_json),
        ai_insight: String::new(),
        highlights: extract_highlights(&row.experience_json),
    }
}

pub fn to_scoring_input(row: &CandidateRow) -> CandidateForScoring {
    CandidateForScoring {
        id: row.id,
        name: row.name.clone(),
        title: row.title.clone().unwrap_or_default(),
        experience: row.experience_years.clone().unwrap_or_default(),
        location: row.location.clone().unwrap_or_default(),
        skills: parse_skills(&row.skills_json),
        summary: row.summary.clone(),
        work_experience: Some(build_work_experience_summary(
            &row.experience_json,
            Some(&row.education_json),
        ))
        .filter(|narrative| !narrative.is_empty()),
    }
}

/// Joins the non-empty values with `sep`.
fn join_present(values: &[&Option<String>], sep: &str) -> String {
    values
        .iter()
        .filter_map(|v| v.as_deref())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
