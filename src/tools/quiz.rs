use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

fn default_count() -> usize {
    5
}

fn default_kind() -> String {
    "multiple".to_string()
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub text: String,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_kind")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    pub number: usize,
    pub prompt: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
    pub points: i64,
}

const MULTIPLE_OPTIONS: [&str; 4] = [
    "The main idea of the passage",
    "A supporting detail",
    "An opposing claim",
    "Background information",
];

fn question_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.len() > 10)
        .collect()
}

pub fn build_quiz(text: &str, count: usize, kind: &str) -> Result<Vec<QuizQuestion>, ApiError> {
    let sentences = question_sentences(text);
    if sentences.is_empty() {
        return Err(ApiError::bad_request(
            "The text is too short to build a quiz from",
        ));
    }

    let options = match kind {
        "multiple" | "mixed" => Some(MULTIPLE_OPTIONS.to_vec()),
        "truefalse" => Some(vec!["True", "False"]),
        "open" => None,
        _ => return Err(ApiError::bad_request("Unknown question kind")),
    };

    Ok(sentences
        .iter()
        .take(count.min(sentences.len()))
        .enumerate()
        .map(|(i, sentence)| QuizQuestion {
            number: i + 1,
            prompt: match kind {
                "truefalse" => format!("True or false: \"{sentence}\""),
                "open" => format!("Explain in your own words: \"{sentence}\""),
                _ => format!("What does the following sentence express: \"{sentence}\"?"),
            },
            excerpt: sentence.to_string(),
            options: options.clone(),
        })
        .collect())
}

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::bad_request("Please enter text to quiz on"));
    }

    let questions = build_quiz(payload.text.trim(), payload.count, &payload.kind)?;
    let points = points::award(&state, user_id, rewards::QUIZ).await?;
    Ok(Json(QuizResponse { questions, points }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "The water cycle moves water around the planet. \
        Evaporation lifts water into the atmosphere. \
        Clouds form when vapor condenses. Rain. \
        Precipitation returns the water to the ground.";

    #[test]
    fn short_fragments_are_filtered_out() {
        // "Rain" is under the length cutoff.
        assert_eq!(question_sentences(TEXT).len(), 4);
    }

    #[test]
    fn count_is_capped_by_available_sentences() {
        let questions = build_quiz(TEXT, 10, "multiple").unwrap();
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].number, 1);
        assert_eq!(questions[0].options.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn truefalse_has_two_options() {
        let questions = build_quiz(TEXT, 2, "truefalse").unwrap();
        assert_eq!(questions[0].options, Some(vec!["True", "False"]));
    }

    #[test]
    fn open_questions_have_no_options() {
        let questions = build_quiz(TEXT, 2, "open").unwrap();
        assert!(questions[0].options.is_none());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(build_quiz(TEXT, 2, "essay").is_err());
    }

    #[test]
    fn too_short_text_is_rejected() {
        assert!(build_quiz("Hi. No.", 2, "multiple").is_err());
    }
}
