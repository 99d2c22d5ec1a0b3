use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::user::{Subscription, User, UserPreferences};
use crate::services::jwt::{AuthenticatedUser, JwtManager};
use crate::utils::crypto::{PasswordManager, TokenManager};
use crate::utils::validation::Validator;

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub role: Option<String>,
}

pub struct AuthService {
    jwt_manager: JwtManager,
    database: Arc<SqliteDatabase>,
}

impl AuthService {
    pub fn new(database: Arc<SqliteDatabase>) -> Self {
        // In production, this should come from environment variables
        let jwt_secret = std::env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set in environment for production!");

        Self {
            jwt_manager: JwtManager::new(jwt_secret),
            database,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<(User, String)> {
        Validator::validate_email(&input.email)?;
        Validator::validate_password(&input.password)?;
        Validator::validate_person_name("first_name", &input.first_name)?;
        Validator::validate_person_name("last_name", &input.last_name)?;
        Validator::validate_company_name(&input.company_name)?;

        let role = input.role.unwrap_or_else(|| "founder".to_string());
        Validator::validate_user_role(&role)?;

        let email = input.email.trim().to_lowercase();
        if self.database.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::ValidationError("Email already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            password_hash: PasswordManager::hash_password(&input.password)?,
            company_name: input.company_name.trim().to_string(),
            role,
            avatar: None,
            is_active: true,
            subscription: Subscription::default(),
            preferences: UserPreferences::default(),
            last_login: Some(now),
            created_at: now,
            updated_at: now,
        };

        self.database.create_user(&user).await?;

        let token = self.issue_token(&user).await?;
        println!("🎉 Account registered: {}", user.email);
        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let email = email.trim().to_lowercase();
        let user = self
            .database
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("User not found".to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthenticationError("Account is deactivated".to_string()));
        }

        if !PasswordManager::verify_password(password, &user.password_hash)? {
            return Err(AppError::AuthenticationError("Invalid password".to_string()));
        }

        self.database.update_last_login(&user.id).await?;
        let mut user = user;
        user.last_login = Some(Utc::now());

        let token = self.issue_token(&user).await?;
        println!("🎯 JWT token generated for user: {}", user.email);
        Ok((user, token))
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        // First validate JWT signature and expiration
        let token_data = self.jwt_manager.validate_token(token)?;
        let token_id = &token_data.claims.jti;

        // Check if token exists in database and is active
        if !self.database.is_token_valid(token_id).await? {
            return Err(AppError::AuthenticationError(
                "Token not found or inactive in database".to_string(),
            ));
        }

        AuthenticatedUser::try_from(token_data.claims)
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        let token_data = self.jwt_manager.validate_token(token)?;
        let token_id = &token_data.claims.jti;

        self.database.revoke_token(token_id).await?;
        Ok(())
    }

    async fn issue_token(&self, user: &User) -> Result<String> {
        let token = self.jwt_manager.generate_token(&user.id, &user.email)?;

        // Extract token ID from the token for storage
        let token_data = self.jwt_manager.validate_token(&token)?;
        let token_id = &token_data.claims.jti;

        let token_hash = TokenManager::hash_token(&token);
        let expires_at = Utc::now() + Duration::hours(24);

        self.database.store_user_token(&user.id, token_id, &token_hash, expires_at).await?;

        // Clean up expired tokens
        let _ = self.database.cleanup_expired_tokens().await;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn service() -> (TempDir, AuthService) {
        std::env::set_var("JWT_SECRET", "test-secret-key");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth_test.db");
        let db = SqliteDatabase::new(path.to_str().unwrap()).await.unwrap();
        (dir, AuthService::new(Arc::new(db)))
    }

    fn sample_input() -> RegisterInput {
        RegisterInput {
            email: "founder@example.com".to_string(),
            password: "Str0ngPass!".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            company_name: "Analytical Engines".to_string(),
            role: Some("founder".to_string()),
        }
    }

    #[tokio::test]
    async fn register_issues_a_working_token() {
        let (_dir, auth) = service().await;

        let (user, token) = auth.register(sample_input()).await.unwrap();
        let authenticated = auth.validate_token(&token).await.unwrap();

        assert_eq!(authenticated.user_id, user.id);
        assert_eq!(authenticated.email, "founder@example.com");
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let (_dir, auth) = service().await;

        auth.register(sample_input()).await.unwrap();
        let err = auth.register(sample_input()).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let (_dir, auth) = service().await;
        auth.register(sample_input()).await.unwrap();

        let err = auth.login("founder@example.com", "not-the-password").await.unwrap_err();
        assert!(matches!(err, AppError::AuthenticationError(_)));
    }

    #[tokio::test]
    async fn logout_revokes_the_session() {
        let (_dir, auth) = service().await;
        auth.register(sample_input()).await.unwrap();

        let (_, token) = auth.login("founder@example.com", "Str0ngPass!").await.unwrap();
        assert!(auth.validate_token(&token).await.is_ok());

        auth.logout(&token).await.unwrap();
        let err = auth.validate_token(&token).await.unwrap_err();
        assert!(matches!(err, AppError::AuthenticationError(_)));
    }
}
