use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::settings::Settings;
use crate::store::{Kv, USERS_KEY};

/// User record as stored in the `users` array. The argon2 hash stays in
/// storage only; clients see [`PublicUser`](crate::auth::dto::PublicUser).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub grade: String,
    pub points: i64,
    pub streak: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_login: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub settings: Settings,
}

impl User {
    pub async fn find_by_email(kv: &Kv, email: &str) -> anyhow::Result<Option<User>> {
        let users: Vec<User> = kv.get_or_default(USERS_KEY).await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    pub async fn find_by_id(kv: &Kv, id: Uuid) -> anyhow::Result<Option<User>> {
        let users: Vec<User> = kv.get_or_default(USERS_KEY).await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    /// Create a new user unless the email is already registered. The
    /// uniqueness check and the insert run atomically.
    pub async fn create(
        kv: &Kv,
        name: &str,
        email: &str,
        password_hash: &str,
        grade: &str,
    ) -> Result<User, ApiError> {
        let name = name.to_string();
        let email = email.to_string();
        let password_hash = password_hash.to_string();
        let grade = grade.to_string();
        kv.update(USERS_KEY, move |users: &mut Vec<User>| {
            if users.iter().any(|u| u.email == email) {
                return Err(ApiError::conflict("Email already registered"));
            }
            let now = OffsetDateTime::now_utc();
            let user = User {
                id: Uuid::new_v4(),
                name,
                email,
                password_hash,
                grade,
                points: 0,
                streak: 0,
                last_login: now,
                created_at: now,
                settings: Settings::default(),
            };
            users.push(user.clone());
            Ok(user)
        })
        .await
    }

    /// Apply `mutate` to the stored user and persist the list; returns
    /// the updated record.
    pub async fn mutate(
        kv: &Kv,
        id: Uuid,
        mutate: impl FnOnce(&mut User),
    ) -> Result<User, ApiError> {
        kv.update(USERS_KEY, move |users: &mut Vec<User>| {
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| ApiError::unauthorized("User not found"))?;
            mutate(user);
            Ok(user.clone())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_list_unchanged() {
        let state = AppState::in_memory();
        User::create(&state.kv, "Noa", "noa@example.com", "h1", "9")
            .await
            .unwrap();

        let err = User::create(&state.kv, "Other Noa", "noa@example.com", "h2", "10")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let users: Vec<User> = state.kv.get_or_default(USERS_KEY).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Noa");
    }

    #[tokio::test]
    async fn new_users_start_with_zero_points_and_defaults() {
        let state = AppState::in_memory();
        let user = User::create(&state.kv, "Noa", "noa@example.com", "h", "9")
            .await
            .unwrap();
        assert_eq!(user.points, 0);
        assert_eq!(user.streak, 0);
        assert_eq!(user.settings.language, "he");
        assert_eq!(user.settings.theme, "light");
    }

    #[tokio::test]
    async fn mutate_persists_changes() {
        let state = AppState::in_memory();
        let user = User::create(&state.kv, "Noa", "noa@example.com", "h", "9")
            .await
            .unwrap();

        User::mutate(&state.kv, user.id, |u| u.grade = "10".into())
            .await
            .unwrap();

        let stored = User::find_by_id(&state.kv, user.id).await.unwrap().unwrap();
        assert_eq!(stored.grade, "10");
    }

    #[tokio::test]
    async fn user_record_roundtrips_through_json() {
        let state = AppState::in_memory();
        let user = User::create(&state.kv, "Noa", "noa@example.com", "h", "9")
            .await
            .unwrap();
        let found = User::find_by_email(&state.kv, "noa@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, "h");
    }
}
