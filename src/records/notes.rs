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
use crate::store::FEATURE_NOTES;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list).post(save))
        .route("/notes/:id", delete(remove))
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct SaveNoteRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SaveNoteResponse {
    pub note: Note,
    pub points: i64,
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = Slice::new(&state.kv, FEATURE_NOTES, user_id).list().await?;
    Ok(Json(notes))
}

#[instrument(skip(state, payload))]
async fn save(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SaveNoteRequest>,
) -> Result<Json<SaveNoteResponse>, ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::bad_request("Note content cannot be empty"));
    }
    let title = match payload.title.trim() {
        "" => "Untitled note".to_string(),
        t => t.to_string(),
    };

    let slice = Slice::new(&state.kv, FEATURE_NOTES, user_id);
    let note = slice
        .update(|notes: &mut Vec<Note>| {
            let now = OffsetDateTime::now_utc();
            if let Some(existing) = payload
                .id
                .and_then(|id| notes.iter_mut().find(|n| n.id == id))
            {
                existing.title = title.clone();
                existing.content = payload.content.trim().to_string();
                existing.updated_at = now;
                return Ok(existing.clone());
            }
            let note = Note {
                id: Uuid::new_v4(),
                title: title.clone(),
                content: payload.content.trim().to_string(),
                updated_at: now,
            };
            notes.push(note.clone());
            Ok(note)
        })
        .await?;

    let points = points::award(&state, user_id, rewards::NOTE).await?;
    Ok(Json(SaveNoteResponse { note, points }))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let slice = Slice::new(&state.kv, FEATURE_NOTES, user_id);
    slice
        .update(|notes: &mut Vec<Note>| {
            let before = notes.len();
            notes.retain(|n| n.id != id);
            if notes.len() == before {
                return Err(ApiError::not_found("Note not found"));
            }
            Ok(())
        })
        .await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
