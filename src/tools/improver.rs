use axum::{extract::State, Json};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub text: String,
    #[serde(default)]
    pub grammar: bool,
    #[serde(default)]
    pub clarity: bool,
    #[serde(default)]
    pub structure: bool,
    #[serde(default)]
    pub vocabulary: bool,
}

#[derive(Debug, Serialize)]
pub struct ImproveResponse {
    pub text: String,
    pub applied: Vec<&'static str>,
    pub points: i64,
}

lazy_static! {
    static ref MULTI_SPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SPACE_BEFORE_PERIOD: Regex = Regex::new(r"\s+\.").unwrap();
    static ref SPACE_BEFORE_COMMA: Regex = Regex::new(r"\s+,").unwrap();
}

const CLARITY_SWAPS: &[(&str, &str)] = &[("very very", "extremely"), ("really really", "truly")];

const VOCABULARY_SWAPS: &[(&str, &str)] = &[
    ("good", "excellent"),
    ("bad", "poor"),
    ("big", "substantial"),
    ("small", "minor"),
];

pub fn improve_text(text: &str, request: &ImproveRequest) -> (String, Vec<&'static str>) {
    let mut improved = text.to_string();
    let mut applied = Vec::new();

    if request.grammar {
        improved = MULTI_SPACE.replace_all(&improved, " ").into_owned();
        improved = SPACE_BEFORE_PERIOD.replace_all(&improved, ".").into_owned();
        improved = SPACE_BEFORE_COMMA.replace_all(&improved, ",").into_owned();
        applied.push("Fixed grammar and punctuation");
    }

    if request.clarity {
        for (from, to) in CLARITY_SWAPS {
            improved = improved.replace(from, to);
        }
        applied.push("Improved clarity and readability");
    }

    if request.structure {
        // Report-only, sentence structure is never rewritten.
        applied.push("Improved sentence structure");
    }

    if request.vocabulary {
        for (from, to) in VOCABULARY_SWAPS {
            improved = improved.replace(from, to);
        }
        applied.push("Enriched vocabulary");
    }

    (improved, applied)
}

#[instrument(skip(state, payload))]
pub async fn improve(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ImproveRequest>,
) -> Result<Json<ImproveResponse>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::bad_request("Please enter text to improve"));
    }

    let (text, applied) = improve_text(payload.text.trim(), &payload);
    let points = points::award(&state, user_id, rewards::IMPROVE).await?;
    Ok(Json(ImproveResponse {
        text,
        applied,
        points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(grammar: bool, clarity: bool, structure: bool, vocabulary: bool) -> ImproveRequest {
        ImproveRequest {
            text: String::new(),
            grammar,
            clarity,
            structure,
            vocabulary,
        }
    }

    #[test]
    fn grammar_normalizes_spacing() {
        let (text, applied) = improve_text(
            "Hello   world .  And then ,  more",
            &request(true, false, false, false),
        );
        assert_eq!(text, "Hello world. And then, more");
        assert_eq!(applied, vec!["Fixed grammar and punctuation"]);
    }

    #[test]
    fn clarity_collapses_doubled_intensifiers() {
        let (text, _) = improve_text(
            "This is very very important",
            &request(false, true, false, false),
        );
        assert_eq!(text, "This is extremely important");
    }

    #[test]
    fn vocabulary_swaps_word_choices() {
        let (text, _) = improve_text("a good day, a bad day", &request(false, false, false, true));
        assert_eq!(text, "a excellent day, a poor day");
    }

    #[test]
    fn structure_is_report_only() {
        let (text, applied) = improve_text("unchanged text", &request(false, false, true, false));
        assert_eq!(text, "unchanged text");
        assert_eq!(applied, vec!["Improved sentence structure"]);
    }

    #[test]
    fn no_flags_means_no_changes() {
        let (text, applied) = improve_text("as is", &request(false, false, false, false));
        assert_eq!(text, "as is");
        assert!(applied.is_empty());
    }
}
