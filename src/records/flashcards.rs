use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::Slice;
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;
use crate::store::FEATURE_FLASHCARDS;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/flashcards", get(list).post(add))
        .route("/flashcards/:id", delete(remove))
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AddFlashcardRequest {
    pub front: String,
    pub back: String,
    #[serde(default = "default_category")]
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct FlashcardResponse {
    pub card: Flashcard,
    pub points: i64,
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    let cards = Slice::new(&state.kv, FEATURE_FLASHCARDS, user_id)
        .list()
        .await?;
    Ok(Json(cards))
}

#[instrument(skip(state, payload))]
async fn add(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddFlashcardRequest>,
) -> Result<Json<FlashcardResponse>, ApiError> {
    if payload.front.trim().is_empty() || payload.back.trim().is_empty() {
        return Err(ApiError::bad_request("Both sides of the card are required"));
    }

    let card = Slice::new(&state.kv, FEATURE_FLASHCARDS, user_id)
        .update(|cards: &mut Vec<Flashcard>| {
            let card = Flashcard {
                id: Uuid::new_v4(),
                front: payload.front.trim().to_string(),
                back: payload.back.trim().to_string(),
                category: payload.category.trim().to_string(),
                created_at: OffsetDateTime::now_utc(),
            };
            cards.push(card.clone());
            Ok(card)
        })
        .await?;

    let points = points::award(&state, user_id, rewards::FLASHCARD).await?;
    Ok(Json(FlashcardResponse { card, points }))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Slice::new(&state.kv, FEATURE_FLASHCARDS, user_id)
        .update(|cards: &mut Vec<Flashcard>| {
            let before = cards.len();
            cards.retain(|c| c.id != id);
            if cards.len() == before {
                return Err(ApiError::not_found("Flashcard not found"));
            }
            Ok(())
        })
        .await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cards_accumulate_in_the_slice() {
        let state = AppState::in_memory();
        let user = Uuid::new_v4();
        let slice = Slice::new(&state.kv, FEATURE_FLASHCARDS, user);
        for (front, back) in [("חתול", "cat"), ("כלב", "dog")] {
            slice
                .update(|cards: &mut Vec<Flashcard>| {
                    cards.push(Flashcard {
                        id: Uuid::new_v4(),
                        front: front.to_string(),
                        back: back.to_string(),
                        category: "animals".to_string(),
                        created_at: OffsetDateTime::now_utc(),
                    });
                    Ok(())
                })
                .await
                .unwrap();
        }
        let cards: Vec<Flashcard> = slice.list().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].front, "חתול");
        assert_eq!(cards[1].back, "dog");
    }
}
