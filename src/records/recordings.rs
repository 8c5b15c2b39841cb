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
use crate::store::FEATURE_RECORDINGS;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recordings", get(list).post(add))
        .route("/recordings/:id", delete(remove))
}

/// Audio is stored as the data URL the client produced, same as the rest of
/// the record types we never interpret server side.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub id: Uuid,
    pub duration_seconds: u32,
    pub data: String,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecordingRequest {
    #[serde(default)]
    pub duration_seconds: u32,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct RecordingResponse {
    pub recording: Recording,
    pub points: i64,
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Recording>>, ApiError> {
    let recordings = Slice::new(&state.kv, FEATURE_RECORDINGS, user_id)
        .list()
        .await?;
    Ok(Json(recordings))
}

#[instrument(skip(state, payload))]
async fn add(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddRecordingRequest>,
) -> Result<Json<RecordingResponse>, ApiError> {
    if payload.data.is_empty() {
        return Err(ApiError::bad_request("Recording data is required"));
    }

    let recording = Slice::new(&state.kv, FEATURE_RECORDINGS, user_id)
        .update(|recordings: &mut Vec<Recording>| {
            let recording = Recording {
                id: Uuid::new_v4(),
                duration_seconds: payload.duration_seconds,
                data: payload.data.clone(),
                recorded_at: OffsetDateTime::now_utc(),
            };
            recordings.push(recording.clone());
            Ok(recording)
        })
        .await?;

    let points = points::award(&state, user_id, rewards::RECORDING).await?;
    Ok(Json(RecordingResponse { recording, points }))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Slice::new(&state.kv, FEATURE_RECORDINGS, user_id)
        .update(|recordings: &mut Vec<Recording>| {
            let before = recordings.len();
            recordings.retain(|r| r.id != id);
            if recordings.len() == before {
                return Err(ApiError::not_found("Recording not found"));
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
    async fn recordings_roundtrip_with_their_data_url() {
        let state = AppState::in_memory();
        let user = Uuid::new_v4();
        let slice = Slice::new(&state.kv, FEATURE_RECORDINGS, user);
        slice
            .update(|recordings: &mut Vec<Recording>| {
                recordings.push(Recording {
                    id: Uuid::new_v4(),
                    duration_seconds: 12,
                    data: "data:audio/webm;base64,AAAA".to_string(),
                    recorded_at: OffsetDateTime::now_utc(),
                });
                Ok(())
            })
            .await
            .unwrap();

        let stored: Vec<Recording> = slice.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].duration_seconds, 12);
        assert!(stored[0].data.starts_with("data:audio/webm"));
    }
}
