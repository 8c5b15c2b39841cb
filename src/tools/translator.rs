use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;

fn default_from() -> String {
    "he".to_string()
}

fn default_to() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated: String,
    pub source: &'static str,
    pub points: i64,
}

#[derive(Debug, Deserialize)]
struct RemoteResponse {
    #[serde(rename = "responseData")]
    response_data: RemoteData,
}

#[derive(Debug, Deserialize)]
struct RemoteData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

static FALLBACK: &[(&str, &str)] = &[
    ("שלום", "Hello"),
    ("תודה", "Thank you"),
    ("בוקר", "Morning"),
    ("ערב", "Evening"),
    ("ספר", "Book"),
    ("בית", "House"),
    ("מים", "Water"),
    ("אוכל", "Food"),
    ("חבר", "Friend"),
    ("משפחה", "Family"),
    ("אהבה", "Love"),
    ("שמש", "Sun"),
    ("ירח", "Moon"),
    ("כוכב", "Star"),
];

/// Word by word dictionary lookup, used when the remote service is unreachable.
pub fn fallback_translate(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let stripped: String = word.chars().filter(|c| !".,!?".contains(*c)).collect();
            FALLBACK
                .iter()
                .find(|(he, _)| *he == stripped)
                .map(|(_, en)| (*en).to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn remote_translate(
    state: &AppState,
    text: &str,
    from: &str,
    to: &str,
) -> Result<String, reqwest::Error> {
    let langpair = format!("{from}|{to}");
    let response: RemoteResponse = state
        .http
        .get(&state.config.translate.endpoint)
        .query(&[("q", text), ("langpair", langpair.as_str())])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(response.response_data.translated_text)
}

#[instrument(skip(state, payload))]
pub async fn translate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Please enter text to translate"));
    }

    let (translated, source) =
        match remote_translate(&state, text, &payload.from, &payload.to).await {
            Ok(translated) => (translated, "remote"),
            Err(err) => {
                warn!(error = %err, "translation service unavailable, using dictionary fallback");
                (fallback_translate(text), "dictionary")
            }
        };

    let points = points::award(&state, user_id, rewards::TRANSLATE).await?;
    Ok(Json(TranslateResponse {
        translated,
        source,
        points,
    }))
}
