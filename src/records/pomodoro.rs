use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use crate::auth::jwt::AuthUser;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;
use crate::store::POMODORO_ROUNDS_KEY;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pomodoro", get(rounds))
        .route("/pomodoro/complete", post(complete))
}

#[derive(Debug, Serialize)]
pub struct RoundsResponse {
    pub rounds: u64,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub rounds: u64,
    pub points: i64,
    pub notify: bool,
}

#[instrument(skip(state))]
async fn rounds(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<RoundsResponse>, ApiError> {
    let rounds: u64 = state.kv.get_or_default(POMODORO_ROUNDS_KEY).await?;
    Ok(Json(RoundsResponse { rounds }))
}

#[instrument(skip(state))]
async fn complete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CompleteResponse>, ApiError> {
    let rounds = state
        .kv
        .update(POMODORO_ROUNDS_KEY, |rounds: &mut u64| {
            *rounds += 1;
            Ok(*rounds)
        })
        .await?;

    let points = points::award(&state, user_id, rewards::POMODORO).await?;
    let notify = User::find_by_id(&state.kv, user_id)
        .await?
        .map(|u| u.settings.notify_pomodoro)
        .unwrap_or(true);
    Ok(Json(CompleteResponse {
        rounds,
        points,
        notify,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completed_rounds_accumulate_globally() {
        let state = AppState::in_memory();
        for expected in 1..=3u64 {
            let rounds = state
                .kv
                .update(POMODORO_ROUNDS_KEY, |rounds: &mut u64| {
                    *rounds += 1;
                    Ok(*rounds)
                })
                .await
                .unwrap();
            assert_eq!(rounds, expected);
        }
        let stored: u64 = state.kv.get_or_default(POMODORO_ROUNDS_KEY).await.unwrap();
        assert_eq!(stored, 3);
    }
}
