use axum::Router;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{slice_key, Kv};

pub mod flashcards;
pub mod notes;
pub mod planner;
pub mod pomodoro;
pub mod recordings;
pub mod todos;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(notes::router())
        .merge(todos::router())
        .merge(flashcards::router())
        .merge(recordings::router())
        .merge(planner::router())
        .merge(pomodoro::router())
}

/// A user's collection for one feature, stored as a single array under
/// `<feature>_<user_id>`.
pub struct Slice<'a> {
    kv: &'a Kv,
    key: String,
}

impl<'a> Slice<'a> {
    pub fn new(kv: &'a Kv, feature: &str, user_id: Uuid) -> Self {
        Self {
            kv,
            key: slice_key(feature, user_id),
        }
    }

    pub async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        self.kv.get_or_default::<Vec<T>>(&self.key).await
    }

    pub async fn update<T, R, F>(&self, apply: F) -> Result<R, ApiError>
    where
        T: Serialize + DeserializeOwned,
        Vec<T>: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut Vec<T>) -> Result<R, ApiError>,
    {
        self.kv.update(&self.key, apply).await
    }
}
