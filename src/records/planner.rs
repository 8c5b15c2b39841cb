use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::Slice;
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;
use crate::store::FEATURE_SESSIONS;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/planner", get(list).post(add))
        .route("/planner/:id", delete(remove))
}

/// A weekly study slot. `day` is 0 for Sunday through 6 for Saturday,
/// matching the school week the planner grid shows.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Uuid,
    pub subject: String,
    pub day: u8,
    pub time: String,
    pub duration_minutes: u32,
}

fn default_duration() -> u32 {
    60
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSessionRequest {
    pub subject: String,
    pub day: u8,
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: StudySession,
    pub points: i64,
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<StudySession>>, ApiError> {
    let sessions = Slice::new(&state.kv, FEATURE_SESSIONS, user_id)
        .list()
        .await?;
    Ok(Json(sessions))
}

#[instrument(skip(state, payload))]
async fn add(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if payload.subject.trim().is_empty() || payload.time.trim().is_empty() {
        return Err(ApiError::bad_request("Subject and time are required"));
    }
    if payload.day > 6 {
        return Err(ApiError::bad_request("Day must be between 0 and 6"));
    }

    let session = Slice::new(&state.kv, FEATURE_SESSIONS, user_id)
        .update(|sessions: &mut Vec<StudySession>| {
            let session = StudySession {
                id: Uuid::new_v4(),
                subject: payload.subject.trim().to_string(),
                day: payload.day,
                time: payload.time.trim().to_string(),
                duration_minutes: payload.duration_minutes,
            };
            sessions.push(session.clone());
            Ok(session)
        })
        .await?;

    let points = points::award(&state, user_id, rewards::PLANNER).await?;
    Ok(Json(SessionResponse { session, points }))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Slice::new(&state.kv, FEATURE_SESSIONS, user_id)
        .update(|sessions: &mut Vec<StudySession>| {
            let before = sessions.len();
            sessions.retain(|s| s.id != id);
            if sessions.len() == before {
                return Err(ApiError::not_found("Study session not found"));
            }
            Ok(())
        })
        .await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
