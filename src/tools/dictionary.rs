use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub word: String,
    pub found: bool,
    pub meaning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
    pub points: i64,
}

struct Entry {
    word: &'static str,
    meaning: &'static str,
    example: &'static str,
}

static ENTRIES: &[Entry] = &[
    Entry {
        word: "homework",
        meaning: "School tasks that students complete at home",
        example: "I finish my homework before dinner.",
    },
    Entry {
        word: "summary",
        meaning: "A short version of a text that keeps only the main points",
        example: "Write a summary of the chapter in five sentences.",
    },
    Entry {
        word: "equation",
        meaning: "A mathematical statement that two expressions are equal",
        example: "Solve the equation 2x + 4 = 10.",
    },
    Entry {
        word: "hypothesis",
        meaning: "A proposed explanation that an experiment sets out to test",
        example: "Our hypothesis was that plants grow faster in sunlight.",
    },
    Entry {
        word: "paragraph",
        meaning: "A group of sentences that develop a single idea",
        example: "Start each paragraph with a topic sentence.",
    },
    Entry {
        word: "vocabulary",
        meaning: "The set of words a person knows in a language",
        example: "Reading every day expands your vocabulary.",
    },
    Entry {
        word: "deadline",
        meaning: "The latest time by which a task must be finished",
        example: "The deadline for the essay is Friday.",
    },
    Entry {
        word: "revision",
        meaning: "Going over material again to remember it better",
        example: "Leave two days for revision before the exam.",
    },
];

pub fn lookup(word: &str) -> Option<&'static Entry> {
    let lower = word.to_lowercase();
    ENTRIES.iter().find(|e| e.word == lower)
}

#[instrument(skip(state, payload))]
pub async fn define(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let word = payload.word.trim();
    if word.is_empty() {
        return Err(ApiError::bad_request("Please enter a word to look up"));
    }

    let points = points::award(&state, user_id, rewards::DICTIONARY).await?;
    let response = match lookup(word) {
        Some(entry) => LookupResponse {
            word: entry.word.to_string(),
            found: true,
            meaning: entry.meaning.to_string(),
            example: Some(entry.example),
            points,
        },
        None => LookupResponse {
            word: word.to_string(),
            found: false,
            meaning: format!("No definition found for \"{word}\". Try another word."),
            example: None,
            points,
        },
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(lookup("Homework").is_some());
        assert!(lookup("EQUATION").is_some());
    }

    #[test]
    fn unknown_words_are_not_found() {
        assert!(lookup("zeugma").is_none());
    }

    #[test]
    fn entries_are_complete() {
        for entry in ENTRIES {
            assert!(!entry.meaning.is_empty());
            assert!(!entry.example.is_empty());
        }
    }
}
