use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

fn default_percent() -> u32 {
    50
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(default = "default_percent")]
    pub percent: u32,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub original_sentences: usize,
    pub summary_sentences: usize,
    pub original_words: usize,
    pub summary_words: usize,
    pub points: i64,
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keeps the first ceil(n * percent / 100) sentences, at least one.
pub fn summarize_text(text: &str, percent: u32) -> (String, usize, usize) {
    let sentences = split_sentences(text);
    let n = sentences.len();
    let target = std::cmp::max(1, (n * percent as usize + 99) / 100);
    let kept = &sentences[..target.min(n)];
    let summary = format!("{}.", kept.join(". "));
    (summary, n, kept.len())
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[instrument(skip(state, payload))]
pub async fn summarize(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Please enter text to summarize"));
    }
    if payload.percent == 0 || payload.percent > 100 {
        return Err(ApiError::bad_request(
            "Summary percent must be between 1 and 100",
        ));
    }

    let (summary, original_sentences, summary_sentences) = summarize_text(text, payload.percent);
    let points = points::award(&state, user_id, rewards::SUMMARY).await?;
    Ok(Json(SummarizeResponse {
        original_words: word_count(text),
        summary_words: word_count(&summary),
        summary,
        original_sentences,
        summary_sentences,
        points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_all_terminators() {
        let s = split_sentences("One. Two! Three? Four.");
        assert_eq!(s, vec!["One", "Two", "Three", "Four"]);
    }

    #[test]
    fn half_of_four_sentences_is_two() {
        let (summary, n, kept) = summarize_text("One. Two. Three. Four.", 50);
        assert_eq!(n, 4);
        assert_eq!(kept, 2);
        assert_eq!(summary, "One. Two.");
    }

    #[test]
    fn ratio_rounds_up() {
        // ceil(3 * 50 / 100) = 2
        let (_, _, kept) = summarize_text("One. Two. Three.", 50);
        assert_eq!(kept, 2);
    }

    #[test]
    fn always_keeps_at_least_one_sentence() {
        let (summary, _, kept) = summarize_text("Only sentence here.", 10);
        assert_eq!(kept, 1);
        assert_eq!(summary, "Only sentence here.");
    }
}
