use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Subscription {
    pub plan: String, // "free", "pro", "enterprise"
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Default for Subscription {
    fn default() -> Self {
        Subscription {
            plan: "free".to_string(),
            start_date: Utc::now(),
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            email: true,
            push: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserPreferences {
    pub theme: String, // "light", "dark"
    #[serde(default)]
    pub notifications: NotificationSettings,
}

impl Default for UserPreferences {
    fn default() -> Self {
        UserPreferences {
            theme: "light".to_string(),
            notifications: NotificationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub company_name: String,
    pub role: String, // "founder", "co-founder", "ceo", "cto", "consultant", "investor", "other"
    pub avatar: Option<String>,
    pub is_active: bool,
    pub subscription: Subscription,
    pub preferences: UserPreferences,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub role: String,
    pub avatar: Option<String>,
    pub subscription: Subscription,
    pub preferences: UserPreferences,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            company_name: user.company_name,
            role: user.role,
            avatar: user.avatar,
            subscription: user.subscription,
            preferences: user.preferences,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}
