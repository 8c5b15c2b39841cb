use axum::{
    extract::{Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::dto::PublicUser;
use crate::auth::jwt::AuthUser;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::settings::{self, Presentation, Settings};
use crate::state::AppState;
use crate::store::{
    slice_key, FEATURE_FLASHCARDS, FEATURE_NOTES, FEATURE_RECORDINGS, FEATURE_SESSIONS,
    FEATURE_TODOS, FEATURE_TOOLS_USED,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/settings", get(get_settings).put(put_settings))
        .route("/me/stats", get(get_stats))
        .route("/me/export", get(export_data))
        .route("/me/data", delete(clear_data))
}

async fn current_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    User::find_by_id(&state.kv, user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = current_user(&state, user_id).await?;
    Ok(Json(PublicUser::from(&user)))
}

/// Settings record together with the presentation flags derived from
/// it, so a client can apply theme/font/direction in one go.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: Settings,
    pub presentation: Presentation,
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SettingsResponse>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let presentation = settings::apply(&user.settings);
    Ok(Json(SettingsResponse {
        settings: user.settings,
        presentation,
    }))
}

/// The settings form also lets the user edit their display name and
/// grade, so the update request carries those alongside the settings.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub settings: Settings,
}

#[instrument(skip(state, payload))]
pub async fn put_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(ApiError::bad_request("Name cannot be empty"));
        }
    }

    let user = User::mutate(&state.kv, user_id, |u| {
        if let Some(name) = payload.name {
            u.name = name.trim().to_string();
        }
        if let Some(grade) = payload.grade {
            u.grade = grade;
        }
        u.settings = payload.settings;
    })
    .await?;

    info!(%user_id, theme = %user.settings.theme, language = %user.settings.language, "settings saved");
    let presentation = settings::apply(&user.settings);
    Ok(Json(SettingsResponse {
        settings: user.settings,
        presentation,
    }))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub points: i64,
    pub streak: i64,
    pub tools_used: i64,
}

#[instrument(skip(state))]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<StatsResponse>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let tools_used: i64 = state
        .kv
        .get_or_default(&slice_key(FEATURE_TOOLS_USED, user_id))
        .await?;
    Ok(Json(StatsResponse {
        points: user.points,
        streak: user.streak,
        tools_used,
    }))
}

/// Everything the user owns, bundled into one downloadable document.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub user: PublicUser,
    pub notes: Vec<Value>,
    pub todos: Vec<Value>,
    pub recordings: Vec<Value>,
    pub flashcards: Vec<Value>,
    #[serde(rename = "studySessions")]
    pub study_sessions: Vec<Value>,
}

#[instrument(skip(state))]
pub async fn export_data(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ExportResponse>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let notes = state
        .kv
        .get_or_default(&slice_key(FEATURE_NOTES, user_id))
        .await?;
    let todos = state
        .kv
        .get_or_default(&slice_key(FEATURE_TODOS, user_id))
        .await?;
    let recordings = state
        .kv
        .get_or_default(&slice_key(FEATURE_RECORDINGS, user_id))
        .await?;
    let flashcards = state
        .kv
        .get_or_default(&slice_key(FEATURE_FLASHCARDS, user_id))
        .await?;
    let study_sessions = state
        .kv
        .get_or_default(&slice_key(FEATURE_SESSIONS, user_id))
        .await?;

    Ok(Json(ExportResponse {
        user: PublicUser::from(&user),
        notes,
        todos,
        recordings,
        flashcards,
        study_sessions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ClearDataQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Irreversibly drops the user's notes, todos, recordings and
/// flashcards. The confirmation dialog of the old UI became an explicit
/// `confirm=true` flag.
#[instrument(skip(state))]
pub async fn clear_data(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ClearDataQuery>,
) -> Result<Json<Value>, ApiError> {
    if !query.confirm {
        return Err(ApiError::bad_request(
            "This deletes all your data; pass confirm=true to proceed",
        ));
    }

    for feature in [
        FEATURE_NOTES,
        FEATURE_TODOS,
        FEATURE_RECORDINGS,
        FEATURE_FLASHCARDS,
    ] {
        state.kv.remove(&slice_key(feature, user_id)).await?;
    }

    info!(%user_id, "user data cleared");
    Ok(Json(serde_json::json!({ "cleared": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::User;

    async fn seeded(state: &AppState) -> User {
        User::create(&state.kv, "Dana", "dana@example.com", "hash", "8")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn settings_round_trip_updates_presentation() {
        let state = AppState::in_memory();
        let user = seeded(&state).await;

        let saved = put_settings(
            State(state.clone()),
            AuthUser(user.id),
            Json(UpdateSettingsRequest {
                name: None,
                grade: None,
                settings: Settings {
                    language: "en".into(),
                    theme: "dark".into(),
                    font_size: "large".into(),
                    ..Settings::default()
                },
            }),
        )
        .await
        .unwrap();

        assert_eq!(saved.0.presentation.theme_class.as_deref(), Some("theme-dark"));
        assert_eq!(saved.0.presentation.font_class.as_deref(), Some("font-large"));
        assert!(!saved.0.presentation.rtl);

        // Reload: the stored record reflects the save.
        let reloaded = get_settings(State(state), AuthUser(user.id)).await.unwrap();
        assert_eq!(reloaded.0.settings.theme, "dark");
        assert_eq!(reloaded.0.presentation.dir, "ltr");
        assert_eq!(
            crate::i18n::translate(&reloaded.0.presentation.lang, "nav.home"),
            "Home"
        );
    }

    #[tokio::test]
    async fn clear_data_requires_confirmation() {
        let state = AppState::in_memory();
        let user = seeded(&state).await;

        let err = clear_data(
            State(state.clone()),
            AuthUser(user.id),
            Query(ClearDataQuery { confirm: false }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn clear_data_drops_feature_slices_but_keeps_user() {
        let state = AppState::in_memory();
        let user = seeded(&state).await;
        state
            .kv
            .put(&slice_key(FEATURE_NOTES, user.id), &vec!["a note"])
            .await
            .unwrap();

        clear_data(
            State(state.clone()),
            AuthUser(user.id),
            Query(ClearDataQuery { confirm: true }),
        )
        .await
        .unwrap();

        let notes: Vec<Value> = state
            .kv
            .get_or_default(&slice_key(FEATURE_NOTES, user.id))
            .await
            .unwrap();
        assert!(notes.is_empty());
        assert!(User::find_by_id(&state.kv, user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn export_bundles_all_slices() {
        let state = AppState::in_memory();
        let user = seeded(&state).await;
        state
            .kv
            .put(&slice_key(FEATURE_TODOS, user.id), &vec!["todo"])
            .await
            .unwrap();

        let export = export_data(State(state), AuthUser(user.id)).await.unwrap();
        assert_eq!(export.0.user.email, "dana@example.com");
        assert_eq!(export.0.todos.len(), 1);
        assert!(export.0.notes.is_empty());
    }
}
