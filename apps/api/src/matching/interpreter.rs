//! Response Interpreter: recovers structured data from free-form model output.
//!
//! Malformed output is never an error here. Every operation has a fixed
//! fallback ladder and callers depend on those exact degraded shapes:
//! - summary / bullet: whole-object fallback to raw text, then a constant
//! - scoring: a non-array reply becomes a synthetic ranking of every input,
//!   while bad items inside an array are silently dropped

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::matching::models::{CandidateForScoring, CandidateScore};

pub const DEFAULT_SUMMARY: &str =
    "Experienced professional with a strong background in software engineering.";
pub const DEFAULT_SCORE_INSIGHT: &str = "Relevant experience and skills for the role.";
pub const FALLBACK_RANKING_INSIGHT: &str =
    "Strong overlap between experience and role description.";

const SUMMARY_FALLBACK_CHARS: usize = 600;
const BULLET_FALLBACK_CHARS: usize = 300;
/// Score given to the first candidate when the reply cannot be read as an array.
const FALLBACK_TOP_SCORE: u32 = 70;
const MAX_SCORE: f64 = 100.0;

/// First `{` … last `}` or first `[` … last `]`, whichever opens earlier.
static JSON_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}|\[[\s\S]*\]").expect("JSON span pattern is valid"));

/// Finds the outermost JSON-looking span in `raw` and parses it.
/// With no span the whole text is tried. Returns `None` on parse failure.
pub fn extract_json(raw: &str) -> Option<Value> {
    let candidate = JSON_SPAN.find(raw).map(|m| m.as_str()).unwrap_or(raw);

    match serde_json::from_str(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to parse AI response as JSON: {e}");
            None
        }
    }
}

pub fn interpret_summary(raw: &str) -> String {
    if let Some(summary) = string_field(extract_json(raw), "summary") {
        return summary;
    }

    let head: String = raw.trim().chars().take(SUMMARY_FALLBACK_CHARS).collect();
    if head.is_empty() {
        DEFAULT_SUMMARY.to_string()
    } else {
        head
    }
}

/// Falls back to the first line of the reply, then to `original` unchanged.
pub fn interpret_bullet(raw: &str, original: &str) -> String {
    if let Some(bullet) = string_field(extract_json(raw), "bullet") {
        return bullet;
    }

    let first_line = raw.trim().split('\n').next().unwrap_or_default();
    let head: String = first_line.chars().take(BULLET_FALLBACK_CHARS).collect();
    if head.is_empty() {
        original.to_string()
    } else {
        head
    }
}

pub fn interpret_scores(raw: &str, candidates: &[CandidateForScoring]) -> Vec<CandidateScore> {
    match extract_json(raw) {
        Some(Value::Array(items)) => scores_from_items(&items, candidates),
        _ => {
            warn!("AI scoring returned non-array JSON, falling back");
            fallback_ranking(candidates)
        }
    }
}

/// Maps array items to scores. Items whose id is not finite, not one of the
/// input candidates, or already seen are dropped.
fn scores_from_items(items: &[Value], candidates: &[CandidateForScoring]) -> Vec<CandidateScore> {
    let known: HashSet<i32> = candidates.iter().map(|c| c.id).collect();
    let mut seen = HashSet::new();

    items
        .iter()
        .filter_map(|item| {
            let candidate_id = to_candidate_id(coerce_number(item.get("candidateId")))?;
            if !known.contains(&candidate_id) || !seen.insert(candidate_id) {
                return None;
            }

            let insight = item
                .get("insight")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_SCORE_INSIGHT.to_string());

            Some(CandidateScore {
                candidate_id,
                score: clamp_score(coerce_number(item.get("score"))),
                insight,
            })
        })
        .collect()
}

/// One entry per candidate in input order: 70, 69, 68, … floored at 0.
pub fn fallback_ranking(candidates: &[CandidateForScoring]) -> Vec<CandidateScore> {
    candidates
        .iter()
        .enumerate()
        .map(|(index, c)| CandidateScore {
            candidate_id: c.id,
            score: FALLBACK_TOP_SCORE.saturating_sub(index as u32),
            insight: FALLBACK_RANKING_INSIGHT.to_string(),
        })
        .collect()
}

fn string_field(value: Option<Value>, field: &str) -> Option<String> {
    value?.get(field)?.as_str().map(|s| s.trim().to_string())
}

/// Loose numeric coercion for model-supplied values.
/// Numbers pass through, numeric strings parse (decimal, exponent, `0x`/`0o`/`0b`
/// and `Infinity`), empty strings / null / false count as 0, true as 1.
/// Anything else (including an absent field) is NaN.
fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                parse_numeric_text(s)
            }
        }
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [only] => coerce_number(Some(only)),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

fn parse_numeric_text(s: &str) -> f64 {
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.starts_with(&['+', '-'][..]) {
                return f64::NAN;
            }
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
        }
    }

    // Rust also accepts "inf", "nan" and friends; only the exact word `Infinity` counts.
    let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) && unsigned != "Infinity" {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn to_candidate_id(n: f64) -> Option<i32> {
    if n.is_finite() && n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
        Some(n as i32)
    } else {
        None
    }
}

fn clamp_score(n: f64) -> u32 {
    if n.is_nan() {
        return 0;
    }
    n.clamp(0.0, MAX_SCORE).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidates(ids: &[i32]) -> Vec<CandidateForScoring> {
        ids.iter()
            .map(|&id| CandidateForScoring {
                id,
                name: format!("Candidate {id}"),
                title: String::new(),
                experience: String::new(),
                location: String::new(),
                skills: vec![],
                summary: None,
                work_experience: None,
            })
            .collect()
    }

    // ── extract_json ────────────────────────────────────────────────────────

    #[test]
    fn test_extract_json_ignores_surrounding_prose() {
        let raw = "Sure! Here you go:\n{\"summary\": \"Builds things.\"}\nHope that helps.";
        assert_eq!(extract_json(raw), Some(json!({"summary": "Builds things."})));
    }

    #[test]
    fn test_extract_json_spans_first_open_to_last_close() {
        let raw = "```json\n[{\"candidateId\": 1}, {\"candidateId\": 2}]\n```";
        assert_eq!(
            extract_json(raw),
            Some(json!([{"candidateId": 1}, {"candidateId": 2}]))
        );
    }

    #[test]
    fn test_extract_json_object_before_array_wins() {
        let raw = "{\"a\": [1, 2]} trailing";
        assert_eq!(extract_json(raw), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn test_extract_json_two_objects_is_unparseable() {
        assert_eq!(extract_json("{\"a\": 1} and {\"b\": 2}"), None);
    }

    #[test]
    fn test_extract_json_without_span_parses_whole_text() {
        assert_eq!(extract_json(" 42 "), Some(json!(42)));
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json(""), None);
    }

    // ── summary ─────────────────────────────────────────────────────────────

    #[test]
    fn test_summary_well_formed_is_trimmed() {
        let raw = "{\"summary\": \"  Seasoned engineer who ships.  \"}";
        assert_eq!(interpret_summary(raw), "Seasoned engineer who ships.");
    }

    #[test]
    fn test_summary_missing_field_falls_back_to_raw_text() {
        let raw = "  {\"text\": \"nope\"}  ";
        assert_eq!(interpret_summary(raw), "{\"text\": \"nope\"}");
    }

    #[test]
    fn test_summary_non_string_field_falls_back() {
        let raw = "{\"summary\": 5}";
        assert_eq!(interpret_summary(raw), raw);
    }

    #[test]
    fn test_summary_prose_is_truncated_to_600_chars() {
        let raw = "é".repeat(700);
        let summary = interpret_summary(&raw);
        assert_eq!(summary.chars().count(), 600);
        assert!(summary.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_summary_empty_uses_generic_sentence() {
        assert_eq!(interpret_summary(""), DEFAULT_SUMMARY);
        assert_eq!(interpret_summary("   \n "), DEFAULT_SUMMARY);
    }

    // ── bullet ──────────────────────────────────────────────────────────────

    #[test]
    fn test_bullet_well_formed_is_trimmed() {
        let raw = "{\"bullet\": \" Cut p99 latency by 40% \"}";
        assert_eq!(interpret_bullet(raw, "orig"), "Cut p99 latency by 40%");
    }

    #[test]
    fn test_bullet_prose_uses_first_line() {
        let raw = "\n  Led migration to Rust\nSecond line ignored";
        assert_eq!(interpret_bullet(raw, "orig"), "Led migration to Rust");
    }

    #[test]
    fn test_bullet_first_line_truncated_to_300_chars() {
        let raw = "x".repeat(400);
        assert_eq!(interpret_bullet(&raw, "orig").len(), 300);
    }

    #[test]
    fn test_bullet_empty_returns_original() {
        assert_eq!(interpret_bullet("", "worked on api"), "worked on api");
        assert_eq!(interpret_bullet("  \n\t", "worked on api"), "worked on api");
    }

    // ── scores ──────────────────────────────────────────────────────────────

    #[test]
    fn test_scores_are_clamped() {
        let raw = json!([
            {"candidateId": 1, "score": -5, "insight": "a"},
            {"candidateId": 2, "score": 150, "insight": "b"},
            {"candidateId": 3, "score": "abc", "insight": "c"},
            {"candidateId": 4, "score": "88", "insight": "d"}
        ])
        .to_string();

        let scores = interpret_scores(&raw, &candidates(&[1, 2, 3, 4]));
        let values: Vec<u32> = scores.iter().map(|s| s.score).collect();
        assert_eq!(values, vec![0, 100, 0, 88]);
    }

    #[test]
    fn test_fractional_score_is_rounded() {
        let raw = r#"[{"candidateId": 1, "score": 72.6, "insight": "x"}]"#;
        assert_eq!(interpret_scores(raw, &candidates(&[1]))[0].score, 73);
    }

    #[test]
    fn test_non_numeric_candidate_id_is_dropped() {
        let raw = json!([
            {"candidateId": "not-a-number", "score": 90, "insight": "bad"},
            {"candidateId": "2", "score": 60, "insight": " good "}
        ])
        .to_string();

        let scores = interpret_scores(&raw, &candidates(&[1, 2]));
        assert_eq!(
            scores,
            vec![CandidateScore {
                candidate_id: 2,
                score: 60,
                insight: "good".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_and_duplicate_ids_are_dropped() {
        let raw = json!([
            {"candidateId": 1, "score": 50, "insight": "first"},
            {"candidateId": 99, "score": 80, "insight": "unknown"},
            {"candidateId": 1, "score": 10, "insight": "again"},
            {"score": 40, "insight": "missing id"}
        ])
        .to_string();

        let scores = interpret_scores(&raw, &candidates(&[1, 2]));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].insight, "first");
    }

    #[test]
    fn test_missing_insight_uses_default() {
        let raw = r#"[{"candidateId": 1, "score": 50}]"#;
        let scores = interpret_scores(raw, &candidates(&[1]));
        assert_eq!(scores[0].insight, DEFAULT_SCORE_INSIGHT);
    }

    #[test]
    fn test_unparseable_reply_ranks_by_input_order() {
        let scores = interpret_scores("I think they are all great.", &candidates(&[1, 2, 3]));
        let pairs: Vec<(i32, u32)> = scores.iter().map(|s| (s.candidate_id, s.score)).collect();
        assert_eq!(pairs, vec![(1, 70), (2, 69), (3, 68)]);
        assert!(scores.iter().all(|s| s.insight == FALLBACK_RANKING_INSIGHT));
    }

    #[test]
    fn test_object_reply_also_ranks_by_input_order() {
        let scores = interpret_scores(r#"{"candidateId": 3, "score": 99}"#, &candidates(&[3, 1]));
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].score, 70);
        assert_eq!(scores[1].score, 69);
    }

    #[test]
    fn test_fallback_ranking_floors_at_zero() {
        let ids: Vec<i32> = (1..=80).collect();
        let scores = fallback_ranking(&candidates(&ids));
        assert_eq!(scores.len(), 80);
        assert_eq!(scores[70].score, 0);
        assert_eq!(scores[79].score, 0);
        assert_eq!(scores[69].score, 1);
    }

    #[test]
    fn test_coerce_number_follows_loose_rules() {
        assert_eq!(coerce_number(Some(&json!(null))), 0.0);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
        assert_eq!(coerce_number(Some(&json!(""))), 0.0);
        assert_eq!(coerce_number(Some(&json!(" 12 "))), 12.0);
        assert_eq!(coerce_number(Some(&json!([7]))), 7.0);
        assert!(coerce_number(Some(&json!({"a": 1}))).is_nan());
        assert!(coerce_number(None).is_nan());
    }

    #[test]
    fn test_coerce_number_string_forms() {
        assert_eq!(coerce_number(Some(&json!("0x1A"))), 26.0);
        assert_eq!(coerce_number(Some(&json!("0b101"))), 5.0);
        assert_eq!(coerce_number(Some(&json!("1e2"))), 100.0);
        assert_eq!(coerce_number(Some(&json!("-Infinity"))), f64::NEG_INFINITY);
        assert!(coerce_number(Some(&json!("inf"))).is_nan());
        assert!(coerce_number(Some(&json!("NaN"))).is_nan());
        assert!(coerce_number(Some(&json!("-0x10"))).is_nan());
        assert!(coerce_number(Some(&json!("0x"))).is_nan());
    }
}
