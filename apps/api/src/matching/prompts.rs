//! Prompt Builder: renders the three matching prompts.
//!
//! Pure functions: same input, same prompt. A missing field renders as empty
//! text; its slot is never dropped so the model always sees the same shape.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, RECRUITER_PERSONA};
use crate::matching::models::{BulletRequest, CandidateForScoring, SummaryRequest};

/// Shown in place of a missing work-experience narrative.
pub const NO_WORK_EXPERIENCE: &str = "(none or not provided)";

pub fn build_summary_prompt(request: &SummaryRequest) -> String {
    let skills_text = request.skills.as_deref().unwrap_or_default().join(", ");

    format!(
        r#"You are a resume writing assistant.

Write a concise, compelling professional summary for a candidate.

Candidate title: {title}
Desired role: {desired_role}
Years of experience: {experience_years}
Skills: {skills_text}
Current summary (if any): {current_summary}

Rules:
- 3–5 sentences.
- Focus on impact, quantifiable outcomes, and core strengths.
- Do not mention years in every sentence.

{JSON_ONLY_INSTRUCTION}
{{
  "summary": "..."
}}"#,
        title = or_empty(&request.title),
        desired_role = or_empty(&request.desired_role),
        experience_years = or_empty(&request.experience_years),
        current_summary = or_empty(&request.current_summary),
    )
}

pub fn build_bullet_prompt(request: &BulletRequest) -> String {
    format!(
        r#"You are improving resume bullet points for a candidate.

Original bullet:
"{bullet}"

Role context: {role_context}

Rewrite this bullet to be:
- clear, concise, and action-oriented
- focused on impact and measurable results if possible
- suitable for a modern software engineer resume

{JSON_ONLY_INSTRUCTION}
{{
  "bullet": "..."
}}"#,
        bullet = request.bullet,
        role_context = or_empty(&request.role_context),
    )
}

pub fn build_scoring_prompt(candidates: &[CandidateForScoring], role_description: &str) -> String {
    let candidates_block = candidates
        .iter()
        .enumerate()
        .map(|(index, c)| render_candidate(index + 1, c))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"{RECRUITER_PERSONA}

You are given a role description and several candidates. For each candidate,
assign a match score from 0 to 100 and a one-sentence insight explaining job fit.

Base the match score and insight on the candidate's actual work experience, achievements,
and how they relate to the role. Consider technologies used, impact described, and
relevance to the role. For candidates with no work experience (freshers), consider
education, skills, and potential fit.

Role description:
{role_description}

Candidates:
{candidates_block}

Respond ONLY in JSON, as an array of objects, one per candidate, in this format:
[
  {{
    "candidateId": 1,
    "score": 87,
    "insight": "Strong React and TypeScript experience, matches senior frontend requirements."
  }}
]
"#
    )
}

fn render_candidate(label: usize, c: &CandidateForScoring) -> String {
    format!(
        "Candidate #{label}
id: {id}
name: {name}
title: {title}
years of experience: {experience}
location: {location}
skills: {skills}
summary: {summary}
work experience and achievements: {work}",
        id = c.id,
        name = c.name,
        title = c.title,
        experience = c.experience,
        location = c.location,
        skills = c.skills.join(", "),
        summary = or_empty(&c.summary),
        work = c.work_experience.as_deref().unwrap_or(NO_WORK_EXPERIENCE),
    )
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
