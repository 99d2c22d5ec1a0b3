use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::user::{UserPreferences, UserResponse};
use crate::utils::validation::Validator;

/// Optional profile fields. Only supplied values are written.
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub role: Option<String>,
}

pub struct NotificationUpdate {
    pub email: Option<bool>,
    pub push: Option<bool>,
}

pub struct PreferencesUpdate {
    pub theme: Option<String>,
    pub notifications: Option<NotificationUpdate>,
}

pub struct UserService {
    pub db: Arc<SqliteDatabase>,
}

impl UserService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }

    pub async fn get_profile(&self, user_id: &Uuid) -> Result<UserResponse> {
        let user = self
            .db
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;
        Ok(user.into())
    }

    pub async fn update_profile(&self, user_id: &Uuid, update: ProfileUpdate) -> Result<UserResponse> {
        let mut user = self
            .db
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;

        if let Some(first_name) = update.first_name {
            Validator::validate_person_name("first_name", &first_name)?;
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            Validator::validate_person_name("last_name", &last_name)?;
            user.last_name = last_name.trim().to_string();
        }
        if let Some(company_name) = update.company_name {
            Validator::validate_company_name(&company_name)?;
            user.company_name = company_name.trim().to_string();
        }
        if let Some(role) = update.role {
            Validator::validate_user_role(&role)?;
            user.role = role;
        }

        user.updated_at = Utc::now();
        self.db.update_user(&user).await?;
        Ok(user.into())
    }

    pub async fn get_preferences(&self, user_id: &Uuid) -> Result<UserPreferences> {
        let user = self
            .db
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;
        Ok(user.preferences)
    }

    /// Merge supplied preference fields into the stored ones. Fields the
    /// caller leaves out keep their current value.
    pub async fn update_preferences(
        &self,
        user_id: &Uuid,
        update: PreferencesUpdate,
    ) -> Result<UserPreferences> {
        let mut user = self
            .db
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;

        if let Some(theme) = update.theme {
            Validator::validate_theme_choice(&theme)?;
            user.preferences.theme = theme;
        }
        if let Some(notifications) = update.notifications {
            if let Some(email) = notifications.email {
                user.preferences.notifications.email = email;
            }
            if let Some(push) = notifications.push {
                user.preferences.notifications.push = push;
            }
        }

        user.updated_at = Utc::now();
        self.db.update_user(&user).await?;
        Ok(user.preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{Subscription, User};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, UserService, Uuid) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users_test.db");
        let db = Arc::new(SqliteDatabase::new(path.to_str().unwrap()).await.unwrap());

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "grace@example.com".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            password_hash: "hash".to_string(),
            company_name: "Compilers Inc".to_string(),
            role: "ceo".to_string(),
            avatar: None,
            is_active: true,
            subscription: Subscription::default(),
            preferences: UserPreferences::default(),
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        db.create_user(&user).await.unwrap();

        (dir, UserService::new(db), user.id)
    }

    #[tokio::test]
    async fn partial_profile_update_leaves_other_fields_alone() {
        let (_dir, users, user_id) = setup().await;

        let updated = users
            .update_profile(
                &user_id,
                ProfileUpdate {
                    first_name: None,
                    last_name: None,
                    company_name: Some("Flow-Matic".to_string()),
                    role: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.company_name, "Flow-Matic");
        assert_eq!(updated.first_name, "Grace");
        assert_eq!(updated.role, "ceo");
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let (_dir, users, user_id) = setup().await;

        let err = users
            .update_profile(
                &user_id,
                ProfileUpdate {
                    first_name: None,
                    last_name: None,
                    company_name: None,
                    role: Some("wizard".to_string()),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn preference_merge_keeps_unspecified_flags() {
        let (_dir, users, user_id) = setup().await;

        let prefs = users
            .update_preferences(
                &user_id,
                PreferencesUpdate {
                    theme: Some("dark".to_string()),
                    notifications: Some(NotificationUpdate {
                        email: Some(false),
                        push: None,
                    }),
                },
            )
            .await
            .unwrap();

        assert_eq!(prefs.theme, "dark");
        assert!(!prefs.notifications.email);
        // push was not supplied and keeps its default
        assert!(prefs.notifications.push);
    }
}
