use crate::errors::{AppError, Result};
use crate::models::analytics::{
    DeckAnalytics, InterestLevel, InteractionStatus, InvestorInteraction, ViewEvent, ViewerType,
};
use crate::models::deck::{Deck, DeckStatus};
use crate::models::investor::{Investor, InvestorStatus, InvestorType};
use crate::models::user::User;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub static GLOBAL_DB: OnceCell<Arc<SqliteDatabase>> = OnceCell::new();

#[derive(Debug)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::DatabaseError(format!("Invalid {}: {}", field, e)))
}

fn parse_datetime(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::DatabaseError(format!("Invalid {} date: {}", field, e)))
}

fn parse_opt_datetime(field: &str, value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value.map(|s| parse_datetime(field, &s)).transpose()
}

fn parse_json<T: serde::de::DeserializeOwned>(field: &str, value: &str) -> Result<T> {
    serde_json::from_str(value)
        .map_err(|e| AppError::DatabaseError(format!("Invalid {} JSON: {}", field, e)))
}

impl SqliteDatabase {
    pub async fn new(database_path: &str) -> Result<Self> {
        // Ensure the directory exists
        if let Some(parent) = Path::new(database_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::DatabaseError(format!("Failed to create database directory: {}", e)))?;
        }

        // Create the database file if it doesn't exist
        if !Path::new(database_path).exists() {
            std::fs::File::create(database_path)
                .map_err(|e| AppError::DatabaseError(format!("Failed to create database file: {}", e)))?;
            println!("📁 Created new database file: {}", database_path);
        }
        let database_url = format!("sqlite:{}", database_path);

        let pool = SqlitePool::connect(&database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {}", e)))?;

        let db = Self { pool };

        // Create tables if they don't exist
        db.create_tables().await?;

        println!("✅ Connected to SQLite database: {}", database_path);
        Ok(db)
    }

    async fn create_tables(&self) -> Result<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                company_name TEXT NOT NULL,
                role TEXT NOT NULL,
                avatar TEXT,
                is_active BOOLEAN DEFAULT TRUE,
                subscription TEXT NOT NULL,
                preferences TEXT NOT NULL,
                last_login TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                token_id TEXT UNIQUE NOT NULL,
                token_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                is_active BOOLEAN DEFAULT TRUE,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS decks (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                startup_info TEXT NOT NULL,
                slides TEXT NOT NULL,
                template TEXT NOT NULL DEFAULT 'default',
                theme TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'draft',
                is_public BOOLEAN DEFAULT FALSE,
                share_token TEXT UNIQUE,
                stats TEXT NOT NULL,
                ai_generated BOOLEAN DEFAULT FALSE,
                ai_prompt TEXT,
                target_investors TEXT NOT NULL,
                tags TEXT NOT NULL,
                collaborators TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS view_events (
                id TEXT PRIMARY KEY,
                deck_id TEXT NOT NULL,
                viewer_id TEXT NOT NULL,
                viewer_type TEXT NOT NULL DEFAULT 'anonymous',
                session_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                duration REAL NOT NULL DEFAULT 0,
                slide_views TEXT NOT NULL,
                user_agent TEXT,
                ip_address TEXT,
                referrer TEXT,
                location TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS deck_analytics (
                id TEXT PRIMARY KEY,
                deck_id TEXT UNIQUE NOT NULL,
                total_views INTEGER NOT NULL DEFAULT 0,
                unique_views INTEGER NOT NULL DEFAULT 0,
                total_view_time REAL NOT NULL DEFAULT 0,
                avg_view_time REAL NOT NULL DEFAULT 0,
                slide_engagement TEXT NOT NULL,
                viewer_demographics TEXT NOT NULL,
                engagement_metrics TEXT NOT NULL,
                first_viewed TEXT,
                last_viewed TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS investor_interactions (
                id TEXT PRIMARY KEY,
                deck_id TEXT NOT NULL,
                investor_id TEXT NOT NULL,
                investor_name TEXT,
                investor_type TEXT NOT NULL,
                interactions TEXT NOT NULL,
                interest_level TEXT NOT NULL DEFAULT 'unknown',
                notes TEXT,
                follow_up_date TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS investors (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                firm TEXT,
                title TEXT,
                investor_type TEXT NOT NULL,
                email TEXT,
                linkedin TEXT,
                website TEXT,
                location TEXT NOT NULL,
                bio TEXT,
                investment_criteria TEXT NOT NULL,
                communication_preferences TEXT NOT NULL,
                tags TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active',
                notes TEXT,
                last_contact TEXT,
                next_follow_up TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
            CREATE INDEX IF NOT EXISTS idx_tokens_user_id ON user_tokens(user_id);
            CREATE INDEX IF NOT EXISTS idx_tokens_token_id ON user_tokens(token_id);
            CREATE INDEX IF NOT EXISTS idx_tokens_active ON user_tokens(is_active);
            CREATE INDEX IF NOT EXISTS idx_decks_user_id ON decks(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_decks_status ON decks(status);
            CREATE INDEX IF NOT EXISTS idx_decks_share_token ON decks(share_token);
            CREATE INDEX IF NOT EXISTS idx_view_events_deck_id ON view_events(deck_id, timestamp);
            CREATE INDEX IF NOT EXISTS idx_view_events_session ON view_events(session_id);
            CREATE INDEX IF NOT EXISTS idx_view_events_viewer ON view_events(viewer_id);
            CREATE INDEX IF NOT EXISTS idx_analytics_deck_id ON deck_analytics(deck_id);
            CREATE INDEX IF NOT EXISTS idx_interactions_deck_investor ON investor_interactions(deck_id, investor_id);
            CREATE INDEX IF NOT EXISTS idx_interactions_status ON investor_interactions(status);
            CREATE INDEX IF NOT EXISTS idx_investors_user_type ON investors(user_id, investor_type);
            CREATE INDEX IF NOT EXISTS idx_investors_status ON investors(status);
        "#;

        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create tables: {}", e)))?;

        println!("📋 Database tables created/verified");
        Ok(())
    }

    // User methods

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        Ok(User {
            id: parse_uuid("user ID", &row.get::<String, _>("id"))?,
            email: row.get("email"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            password_hash: row.get("password_hash"),
            company_name: row.get("company_name"),
            role: row.get("role"),
            avatar: row.get("avatar"),
            is_active: row.get("is_active"),
            subscription: parse_json("subscription", &row.get::<String, _>("subscription"))?,
            preferences: parse_json("preferences", &row.get::<String, _>("preferences"))?,
            last_login: parse_opt_datetime("last_login", row.get("last_login"))?,
            created_at: parse_datetime("created_at", &row.get::<String, _>("created_at"))?,
            updated_at: parse_datetime("updated_at", &row.get::<String, _>("updated_at"))?,
        })
    }

    pub async fn create_user(&self, user: &User) -> Result<()> {
        let query = r#"
            INSERT INTO users (id, email, first_name, last_name, password_hash, company_name, role, avatar, is_active, subscription, preferences, last_login, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(&user.company_name)
            .bind(&user.role)
            .bind(&user.avatar)
            .bind(user.is_active)
            .bind(serde_json::to_string(&user.subscription)?)
            .bind(serde_json::to_string(&user.preferences)?)
            .bind(user.last_login.map(|dt| dt.to_rfc3339()))
            .bind(user.created_at.to_rfc3339())
            .bind(user.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    AppError::ValidationError("Email already exists".to_string())
                } else {
                    AppError::DatabaseError(format!("Failed to create user: {}", e))
                }
            })?;

        println!("💾 User '{}' saved to database", user.email);
        Ok(())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user by email: {}", e)))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    pub async fn get_user_by_id(&self, user_id: &Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    pub async fn update_user(&self, user: &User) -> Result<()> {
        let query = r#"
            UPDATE users
            SET first_name = ?2, last_name = ?3, company_name = ?4, role = ?5, avatar = ?6,
                is_active = ?7, subscription = ?8, preferences = ?9, last_login = ?10, updated_at = ?11
            WHERE id = ?1
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.company_name)
            .bind(&user.role)
            .bind(&user.avatar)
            .bind(user.is_active)
            .bind(serde_json::to_string(&user.subscription)?)
            .bind(serde_json::to_string(&user.preferences)?)
            .bind(user.last_login.map(|dt| dt.to_rfc3339()))
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update user: {}", e)))?;

        Ok(())
    }

    pub async fn update_last_login(&self, user_id: &Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = ?1 WHERE id = ?2")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update last login: {}", e)))?;

        Ok(())
    }

    // Token methods

    pub async fn store_user_token(&self, user_id: &Uuid, token_id: &str, token_hash: &str, expires_at: DateTime<Utc>) -> Result<()> {
        // One active session per user: deactivate whatever is still live
        let deactivate_query = "UPDATE user_tokens SET is_active = FALSE WHERE user_id = ?1 AND is_active = TRUE";
        sqlx::query(deactivate_query)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to deactivate existing tokens: {}", e)))?;

        let insert_query = r#"
            INSERT INTO user_tokens (user_id, token_id, token_hash, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
        "#;

        sqlx::query(insert_query)
            .bind(user_id.to_string())
            .bind(token_id)
            .bind(token_hash)
            .bind(Utc::now().to_rfc3339())
            .bind(expires_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to store token: {}", e)))?;

        println!("🔐 JWT token stored for user {}", user_id);
        Ok(())
    }

    pub async fn is_token_valid(&self, token_id: &str) -> Result<bool> {
        let query = r#"
            SELECT COUNT(*) as count FROM user_tokens
            WHERE token_id = ?1 AND is_active = TRUE AND expires_at > ?2
        "#;

        let row = sqlx::query(query)
            .bind(token_id)
            .bind(Utc::now().to_rfc3339())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to validate token: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    pub async fn revoke_token(&self, token_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE user_tokens SET is_active = FALSE WHERE token_id = ?1")
            .bind(token_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to revoke token: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::AuthenticationError("Token not found".to_string()));
        }

        println!("🚪 Token revoked: {}", token_id);
        Ok(())
    }

    pub async fn cleanup_expired_tokens(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE expires_at < ?1")
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to cleanup expired tokens: {}", e)))?;

        if result.rows_affected() > 0 {
            println!("🧹 Cleaned up {} expired tokens", result.rows_affected());
        }
        Ok(result.rows_affected())
    }

    // Deck methods

    fn row_to_deck(row: &SqliteRow) -> Result<Deck> {
        let status_str: String = row.get("status");
        Ok(Deck {
            id: parse_uuid("deck ID", &row.get::<String, _>("id"))?,
            user_id: parse_uuid("user ID", &row.get::<String, _>("user_id"))?,
            title: row.get("title"),
            description: row.get("description"),
            startup_info: parse_json("startup_info", &row.get::<String, _>("startup_info"))?,
            slides: parse_json("slides", &row.get::<String, _>("slides"))?,
            template: row.get("template"),
            theme: parse_json("theme", &row.get::<String, _>("theme"))?,
            status: DeckStatus::parse(&status_str)
                .ok_or_else(|| AppError::DatabaseError(format!("Invalid deck status: {}", status_str)))?,
            is_public: row.get("is_public"),
            share_token: row.get("share_token"),
            stats: parse_json("stats", &row.get::<String, _>("stats"))?,
            ai_generated: row.get("ai_generated"),
            ai_prompt: row.get("ai_prompt"),
            target_investors: parse_json("target_investors", &row.get::<String, _>("target_investors"))?,
            tags: parse_json("tags", &row.get::<String, _>("tags"))?,
            collaborators: parse_json("collaborators", &row.get::<String, _>("collaborators"))?,
            created_at: parse_datetime("created_at", &row.get::<String, _>("created_at"))?,
            updated_at: parse_datetime("updated_at", &row.get::<String, _>("updated_at"))?,
        })
    }

    pub async fn create_deck(&self, deck: &Deck) -> Result<()> {
        let query = r#"
            INSERT INTO decks (id, user_id, title, description, startup_info, slides, template, theme, status, is_public, share_token, stats, ai_generated, ai_prompt, target_investors, tags, collaborators, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
        "#;

        sqlx::query(query)
            .bind(deck.id.to_string())
            .bind(deck.user_id.to_string())
            .bind(&deck.title)
            .bind(&deck.description)
            .bind(serde_json::to_string(&deck.startup_info)?)
            .bind(serde_json::to_string(&deck.slides)?)
            .bind(&deck.template)
            .bind(serde_json::to_string(&deck.theme)?)
            .bind(deck.status.as_str())
            .bind(deck.is_public)
            .bind(&deck.share_token)
            .bind(serde_json::to_string(&deck.stats)?)
            .bind(deck.ai_generated)
            .bind(&deck.ai_prompt)
            .bind(serde_json::to_string(&deck.target_investors)?)
            .bind(serde_json::to_string(&deck.tags)?)
            .bind(serde_json::to_string(&deck.collaborators)?)
            .bind(deck.created_at.to_rfc3339())
            .bind(deck.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    AppError::ValidationError("Share token already exists".to_string())
                } else {
                    AppError::DatabaseError(format!("Failed to create deck: {}", e))
                }
            })?;

        println!("💾 Deck '{}' saved to database", deck.title);
        Ok(())
    }

    /// Owner-scoped fetch. A deck that exists but belongs to someone else
    /// comes back as None, same as a missing one.
    pub async fn get_deck(&self, deck_id: &Uuid, user_id: &Uuid) -> Result<Option<Deck>> {
        let row = sqlx::query("SELECT * FROM decks WHERE id = ?1 AND user_id = ?2")
            .bind(deck_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch deck: {}", e)))?;

        row.map(|r| Self::row_to_deck(&r)).transpose()
    }

    pub async fn get_deck_by_share_token(&self, token: &str) -> Result<Option<Deck>> {
        let row = sqlx::query("SELECT * FROM decks WHERE share_token = ?1 AND is_public = TRUE")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch shared deck: {}", e)))?;

        row.map(|r| Self::row_to_deck(&r)).transpose()
    }

    pub async fn list_decks(&self, user_id: &Uuid) -> Result<Vec<Deck>> {
        let rows = sqlx::query("SELECT * FROM decks WHERE user_id = ?1 ORDER BY updated_at DESC")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch decks: {}", e)))?;

        let mut decks = Vec::new();
        for row in rows {
            decks.push(Self::row_to_deck(&row)?);
        }

        Ok(decks)
    }

    pub async fn update_deck(&self, deck: &Deck) -> Result<()> {
        let query = r#"
            UPDATE decks
            SET title = ?2, description = ?3, startup_info = ?4, slides = ?5, template = ?6,
                theme = ?7, status = ?8, is_public = ?9, share_token = ?10, stats = ?11,
                ai_generated = ?12, ai_prompt = ?13, target_investors = ?14, tags = ?15,
                collaborators = ?16, updated_at = ?17
            WHERE id = ?1
        "#;

        sqlx::query(query)
            .bind(deck.id.to_string())
            .bind(&deck.title)
            .bind(&deck.description)
            .bind(serde_json::to_string(&deck.startup_info)?)
            .bind(serde_json::to_string(&deck.slides)?)
            .bind(&deck.template)
            .bind(serde_json::to_string(&deck.theme)?)
            .bind(deck.status.as_str())
            .bind(deck.is_public)
            .bind(&deck.share_token)
            .bind(serde_json::to_string(&deck.stats)?)
            .bind(deck.ai_generated)
            .bind(&deck.ai_prompt)
            .bind(serde_json::to_string(&deck.target_investors)?)
            .bind(serde_json::to_string(&deck.tags)?)
            .bind(serde_json::to_string(&deck.collaborators)?)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update deck: {}", e)))?;

        Ok(())
    }

    pub async fn delete_deck(&self, deck_id: &Uuid) -> Result<()> {
        sqlx::query("DELETE FROM decks WHERE id = ?1")
            .bind(deck_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete deck: {}", e)))?;

        Ok(())
    }

    // View event methods

    fn row_to_view_event(row: &SqliteRow) -> Result<ViewEvent> {
        let viewer_type_str: String = row.get("viewer_type");
        Ok(ViewEvent {
            id: parse_uuid("event ID", &row.get::<String, _>("id"))?,
            deck_id: parse_uuid("deck ID", &row.get::<String, _>("deck_id"))?,
            viewer_id: row.get("viewer_id"),
            viewer_type: ViewerType::parse(&viewer_type_str)
                .ok_or_else(|| AppError::DatabaseError(format!("Invalid viewer type: {}", viewer_type_str)))?,
            session_id: row.get("session_id"),
            timestamp: parse_datetime("timestamp", &row.get::<String, _>("timestamp"))?,
            duration: row.get("duration"),
            slide_views: parse_json("slide_views", &row.get::<String, _>("slide_views"))?,
            user_agent: row.get("user_agent"),
            ip_address: row.get("ip_address"),
            referrer: row.get("referrer"),
            location: parse_json("location", &row.get::<String, _>("location"))?,
        })
    }

    pub async fn insert_view_event(&self, event: &ViewEvent) -> Result<()> {
        let query = r#"
            INSERT INTO view_events (id, deck_id, viewer_id, viewer_type, session_id, timestamp, duration, slide_views, user_agent, ip_address, referrer, location)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#;

        sqlx::query(query)
            .bind(event.id.to_string())
            .bind(event.deck_id.to_string())
            .bind(&event.viewer_id)
            .bind(event.viewer_type.as_str())
            .bind(&event.session_id)
            .bind(event.timestamp.to_rfc3339())
            .bind(event.duration)
            .bind(serde_json::to_string(&event.slide_views)?)
            .bind(&event.user_agent)
            .bind(&event.ip_address)
            .bind(&event.referrer)
            .bind(serde_json::to_string(&event.location)?)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert view event: {}", e)))?;

        Ok(())
    }

    pub async fn get_deck_view_events(&self, deck_id: &Uuid) -> Result<Vec<ViewEvent>> {
        let rows = sqlx::query("SELECT * FROM view_events WHERE deck_id = ?1 ORDER BY timestamp ASC")
            .bind(deck_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch view events: {}", e)))?;

        let mut events = Vec::new();
        for row in rows {
            events.push(Self::row_to_view_event(&row)?);
        }

        Ok(events)
    }

    // Deck analytics methods

    fn row_to_analytics(row: &SqliteRow) -> Result<DeckAnalytics> {
        Ok(DeckAnalytics {
            id: parse_uuid("analytics ID", &row.get::<String, _>("id"))?,
            deck_id: parse_uuid("deck ID", &row.get::<String, _>("deck_id"))?,
            total_views: row.get("total_views"),
            unique_views: row.get("unique_views"),
            total_view_time: row.get("total_view_time"),
            avg_view_time: row.get("avg_view_time"),
            slide_engagement: parse_json("slide_engagement", &row.get::<String, _>("slide_engagement"))?,
            viewer_demographics: parse_json("viewer_demographics", &row.get::<String, _>("viewer_demographics"))?,
            engagement_metrics: parse_json("engagement_metrics", &row.get::<String, _>("engagement_metrics"))?,
            first_viewed: parse_opt_datetime("first_viewed", row.get("first_viewed"))?,
            last_viewed: parse_opt_datetime("last_viewed", row.get("last_viewed"))?,
            created_at: parse_datetime("created_at", &row.get::<String, _>("created_at"))?,
            updated_at: parse_datetime("updated_at", &row.get::<String, _>("updated_at"))?,
        })
    }

    pub async fn get_analytics_row(&self, deck_id: &Uuid) -> Result<Option<DeckAnalytics>> {
        let row = sqlx::query("SELECT * FROM deck_analytics WHERE deck_id = ?1")
            .bind(deck_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch analytics: {}", e)))?;

        row.map(|r| Self::row_to_analytics(&r)).transpose()
    }

    pub async fn insert_analytics(&self, analytics: &DeckAnalytics) -> Result<()> {
        let query = r#"
            INSERT INTO deck_analytics (id, deck_id, total_views, unique_views, total_view_time, avg_view_time, slide_engagement, viewer_demographics, engagement_metrics, first_viewed, last_viewed, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#;

        sqlx::query(query)
            .bind(analytics.id.to_string())
            .bind(analytics.deck_id.to_string())
            .bind(analytics.total_views)
            .bind(analytics.unique_views)
            .bind(analytics.total_view_time)
            .bind(analytics.avg_view_time)
            .bind(serde_json::to_string(&analytics.slide_engagement)?)
            .bind(serde_json::to_string(&analytics.viewer_demographics)?)
            .bind(serde_json::to_string(&analytics.engagement_metrics)?)
            .bind(analytics.first_viewed.map(|dt| dt.to_rfc3339()))
            .bind(analytics.last_viewed.map(|dt| dt.to_rfc3339()))
            .bind(analytics.created_at.to_rfc3339())
            .bind(analytics.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert analytics: {}", e)))?;

        Ok(())
    }

    pub async fn update_analytics(&self, analytics: &DeckAnalytics) -> Result<()> {
        let query = r#"
            UPDATE deck_analytics
            SET total_views = ?2, unique_views = ?3, total_view_time = ?4, avg_view_time = ?5,
                slide_engagement = ?6, viewer_demographics = ?7, engagement_metrics = ?8,
                first_viewed = ?9, last_viewed = ?10, updated_at = ?11
            WHERE deck_id = ?1
        "#;

        sqlx::query(query)
            .bind(analytics.deck_id.to_string())
            .bind(analytics.total_views)
            .bind(analytics.unique_views)
            .bind(analytics.total_view_time)
            .bind(analytics.avg_view_time)
            .bind(serde_json::to_string(&analytics.slide_engagement)?)
            .bind(serde_json::to_string(&analytics.viewer_demographics)?)
            .bind(serde_json::to_string(&analytics.engagement_metrics)?)
            .bind(analytics.first_viewed.map(|dt| dt.to_rfc3339()))
            .bind(analytics.last_viewed.map(|dt| dt.to_rfc3339()))
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update analytics: {}", e)))?;

        Ok(())
    }

    // Investor interaction methods

    fn row_to_interaction(row: &SqliteRow) -> Result<InvestorInteraction> {
        let investor_type_str: String = row.get("investor_type");
        let interest_str: String = row.get("interest_level");
        let status_str: String = row.get("status");
        Ok(InvestorInteraction {
            id: parse_uuid("interaction ID", &row.get::<String, _>("id"))?,
            deck_id: parse_uuid("deck ID", &row.get::<String, _>("deck_id"))?,
            investor_id: row.get("investor_id"),
            investor_name: row.get("investor_name"),
            investor_type: InvestorType::parse(&investor_type_str)
                .ok_or_else(|| AppError::DatabaseError(format!("Invalid investor type: {}", investor_type_str)))?,
            interactions: parse_json("interactions", &row.get::<String, _>("interactions"))?,
            interest_level: InterestLevel::parse(&interest_str)
                .ok_or_else(|| AppError::DatabaseError(format!("Invalid interest level: {}", interest_str)))?,
            notes: row.get("notes"),
            follow_up_date: parse_opt_datetime("follow_up_date", row.get("follow_up_date"))?,
            status: InteractionStatus::parse(&status_str)
                .ok_or_else(|| AppError::DatabaseError(format!("Invalid interaction status: {}", status_str)))?,
            created_at: parse_datetime("created_at", &row.get::<String, _>("created_at"))?,
            updated_at: parse_datetime("updated_at", &row.get::<String, _>("updated_at"))?,
        })
    }

    pub async fn find_interaction(&self, deck_id: &Uuid, investor_id: &str) -> Result<Option<InvestorInteraction>> {
        let row = sqlx::query("SELECT * FROM investor_interactions WHERE deck_id = ?1 AND investor_id = ?2")
            .bind(deck_id.to_string())
            .bind(investor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch interaction: {}", e)))?;

        row.map(|r| Self::row_to_interaction(&r)).transpose()
    }

    pub async fn get_interaction_by_id(&self, id: &Uuid) -> Result<Option<InvestorInteraction>> {
        let row = sqlx::query("SELECT * FROM investor_interactions WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch interaction: {}", e)))?;

        row.map(|r| Self::row_to_interaction(&r)).transpose()
    }

    pub async fn get_deck_interactions(&self, deck_id: &Uuid) -> Result<Vec<InvestorInteraction>> {
        let rows = sqlx::query("SELECT * FROM investor_interactions WHERE deck_id = ?1 ORDER BY created_at ASC")
            .bind(deck_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch interactions: {}", e)))?;

        let mut interactions = Vec::new();
        for row in rows {
            interactions.push(Self::row_to_interaction(&row)?);
        }

        Ok(interactions)
    }

    pub async fn insert_interaction(&self, interaction: &InvestorInteraction) -> Result<()> {
        let query = r#"
            INSERT INTO investor_interactions (id, deck_id, investor_id, investor_name, investor_type, interactions, interest_level, notes, follow_up_date, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#;

        sqlx::query(query)
            .bind(interaction.id.to_string())
            .bind(interaction.deck_id.to_string())
            .bind(&interaction.investor_id)
            .bind(&interaction.investor_name)
            .bind(interaction.investor_type.as_str())
            .bind(serde_json::to_string(&interaction.interactions)?)
            .bind(interaction.interest_level.as_str())
            .bind(&interaction.notes)
            .bind(interaction.follow_up_date.map(|dt| dt.to_rfc3339()))
            .bind(interaction.status.as_str())
            .bind(interaction.created_at.to_rfc3339())
            .bind(interaction.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert interaction: {}", e)))?;

        Ok(())
    }

    pub async fn update_interaction(&self, interaction: &InvestorInteraction) -> Result<()> {
        let query = r#"
            UPDATE investor_interactions
            SET investor_name = ?2, investor_type = ?3, interactions = ?4, interest_level = ?5,
                notes = ?6, follow_up_date = ?7, status = ?8, updated_at = ?9
            WHERE id = ?1
        "#;

        sqlx::query(query)
            .bind(interaction.id.to_string())
            .bind(&interaction.investor_name)
            .bind(interaction.investor_type.as_str())
            .bind(serde_json::to_string(&interaction.interactions)?)
            .bind(interaction.interest_level.as_str())
            .bind(&interaction.notes)
            .bind(interaction.follow_up_date.map(|dt| dt.to_rfc3339()))
            .bind(interaction.status.as_str())
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update interaction: {}", e)))?;

        Ok(())
    }

    // Investor profile methods

    fn row_to_investor(row: &SqliteRow) -> Result<Investor> {
        let investor_type_str: String = row.get("investor_type");
        let status_str: String = row.get("status");
        Ok(Investor {
            id: parse_uuid("investor ID", &row.get::<String, _>("id"))?,
            user_id: parse_uuid("user ID", &row.get::<String, _>("user_id"))?,
            name: row.get("name"),
            firm: row.get("firm"),
            title: row.get("title"),
            investor_type: InvestorType::parse(&investor_type_str)
                .ok_or_else(|| AppError::DatabaseError(format!("Invalid investor type: {}", investor_type_str)))?,
            email: row.get("email"),
            linkedin: row.get("linkedin"),
            website: row.get("website"),
            location: parse_json("location", &row.get::<String, _>("location"))?,
            bio: row.get("bio"),
            investment_criteria: parse_json("investment_criteria", &row.get::<String, _>("investment_criteria"))?,
            communication_preferences: parse_json("communication_preferences", &row.get::<String, _>("communication_preferences"))?,
            tags: parse_json("tags", &row.get::<String, _>("tags"))?,
            status: InvestorStatus::parse(&status_str)
                .ok_or_else(|| AppError::DatabaseError(format!("Invalid investor status: {}", status_str)))?,
            notes: row.get("notes"),
            last_contact: parse_opt_datetime("last_contact", row.get("last_contact"))?,
            next_follow_up: parse_opt_datetime("next_follow_up", row.get("next_follow_up"))?,
            created_at: parse_datetime("created_at", &row.get::<String, _>("created_at"))?,
            updated_at: parse_datetime("updated_at", &row.get::<String, _>("updated_at"))?,
        })
    }

    pub async fn create_investor(&self, investor: &Investor) -> Result<()> {
        let query = r#"
            INSERT INTO investors (id, user_id, name, firm, title, investor_type, email, linkedin, website, location, bio, investment_criteria, communication_preferences, tags, status, notes, last_contact, next_follow_up, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
        "#;

        sqlx::query(query)
            .bind(investor.id.to_string())
            .bind(investor.user_id.to_string())
            .bind(&investor.name)
            .bind(&investor.firm)
            .bind(&investor.title)
            .bind(investor.investor_type.as_str())
            .bind(&investor.email)
            .bind(&investor.linkedin)
            .bind(&investor.website)
            .bind(serde_json::to_string(&investor.location)?)
            .bind(&investor.bio)
            .bind(serde_json::to_string(&investor.investment_criteria)?)
            .bind(serde_json::to_string(&investor.communication_preferences)?)
            .bind(serde_json::to_string(&investor.tags)?)
            .bind(investor.status.as_str())
            .bind(&investor.notes)
            .bind(investor.last_contact.map(|dt| dt.to_rfc3339()))
            .bind(investor.next_follow_up.map(|dt| dt.to_rfc3339()))
            .bind(investor.created_at.to_rfc3339())
            .bind(investor.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create investor: {}", e)))?;

        println!("💾 Investor '{}' saved to database", investor.name);
        Ok(())
    }

    pub async fn get_investor(&self, investor_id: &Uuid, user_id: &Uuid) -> Result<Option<Investor>> {
        let row = sqlx::query("SELECT * FROM investors WHERE id = ?1 AND user_id = ?2")
            .bind(investor_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch investor: {}", e)))?;

        row.map(|r| Self::row_to_investor(&r)).transpose()
    }

    pub async fn list_investors(&self, user_id: &Uuid) -> Result<Vec<Investor>> {
        let rows = sqlx::query("SELECT * FROM investors WHERE user_id = ?1 ORDER BY created_at DESC")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch investors: {}", e)))?;

        let mut investors = Vec::new();
        for row in rows {
            investors.push(Self::row_to_investor(&row)?);
        }

        Ok(investors)
    }

    /// All active profiles in insertion order, the matcher's candidate set.
    pub async fn list_active_investors(&self) -> Result<Vec<Investor>> {
        let rows = sqlx::query("SELECT * FROM investors WHERE status = 'active' ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch active investors: {}", e)))?;

        let mut investors = Vec::new();
        for row in rows {
            investors.push(Self::row_to_investor(&row)?);
        }

        Ok(investors)
    }

    pub async fn update_investor(&self, investor: &Investor) -> Result<()> {
        let query = r#"
            UPDATE investors
            SET name = ?2, firm = ?3, title = ?4, investor_type = ?5, email = ?6, linkedin = ?7,
                website = ?8, location = ?9, bio = ?10, investment_criteria = ?11,
                communication_preferences = ?12, tags = ?13, status = ?14, notes = ?15,
                last_contact = ?16, next_follow_up = ?17, updated_at = ?18
            WHERE id = ?1
        "#;

        sqlx::query(query)
            .bind(investor.id.to_string())
            .bind(&investor.name)
            .bind(&investor.firm)
            .bind(&investor.title)
            .bind(investor.investor_type.as_str())
            .bind(&investor.email)
            .bind(&investor.linkedin)
            .bind(&investor.website)
            .bind(serde_json::to_string(&investor.location)?)
            .bind(&investor.bio)
            .bind(serde_json::to_string(&investor.investment_criteria)?)
            .bind(serde_json::to_string(&investor.communication_preferences)?)
            .bind(serde_json::to_string(&investor.tags)?)
            .bind(investor.status.as_str())
            .bind(&investor.notes)
            .bind(investor.last_contact.map(|dt| dt.to_rfc3339()))
            .bind(investor.next_follow_up.map(|dt| dt.to_rfc3339()))
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update investor: {}", e)))?;

        Ok(())
    }

    pub async fn delete_investor(&self, investor_id: &Uuid) -> Result<()> {
        sqlx::query("DELETE FROM investors WHERE id = ?1")
            .bind(investor_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete investor: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{Subscription, UserPreferences};
    use tempfile::TempDir;

    async fn temp_db() -> (TempDir, SqliteDatabase) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let db = SqliteDatabase::new(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    fn sample_user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password_hash: "hash".to_string(),
            company_name: "Analytical Engines".to_string(),
            role: "founder".to_string(),
            avatar: None,
            is_active: true,
            subscription: Subscription::default(),
            preferences: UserPreferences::default(),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn user_round_trip_by_email_and_id() {
        let (_dir, db) = temp_db().await;
        let user = sample_user("ada@example.com");
        db.create_user(&user).await.unwrap();

        let by_email = db.get_user_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.subscription.plan, "free");

        let by_id = db.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_validation_error() {
        let (_dir, db) = temp_db().await;
        db.create_user(&sample_user("dup@example.com")).await.unwrap();

        let err = db.create_user(&sample_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn deck_round_trip_preserves_embedded_documents() {
        let (_dir, db) = temp_db().await;
        let user = sample_user("deck@example.com");
        db.create_user(&user).await.unwrap();

        let mut deck = Deck::new(user.id, "Series A".to_string());
        deck.tags = vec!["fintech".to_string()];
        deck.startup_info.name = Some("Acme".to_string());
        db.create_deck(&deck).await.unwrap();

        let fetched = db.get_deck(&deck.id, &user.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Series A");
        assert_eq!(fetched.tags, vec!["fintech".to_string()]);
        assert_eq!(fetched.startup_info.name.as_deref(), Some("Acme"));
        assert_eq!(fetched.status, DeckStatus::Draft);
        assert_eq!(fetched.theme.primary_color, "#3B82F6");
    }

    #[tokio::test]
    async fn deck_fetch_is_owner_scoped() {
        let (_dir, db) = temp_db().await;
        let owner = sample_user("owner@example.com");
        let other = sample_user("other@example.com");
        db.create_user(&owner).await.unwrap();
        db.create_user(&other).await.unwrap();

        let deck = Deck::new(owner.id, "Private".to_string());
        db.create_deck(&deck).await.unwrap();

        assert!(db.get_deck(&deck.id, &owner.id).await.unwrap().is_some());
        assert!(db.get_deck(&deck.id, &other.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn shared_lookup_requires_public_flag() {
        let (_dir, db) = temp_db().await;
        let user = sample_user("share@example.com");
        db.create_user(&user).await.unwrap();

        let mut deck = Deck::new(user.id, "Shared".to_string());
        deck.share_token = Some("abc123".to_string());
        db.create_deck(&deck).await.unwrap();

        // Token exists but the deck is not public yet
        assert!(db.get_deck_by_share_token("abc123").await.unwrap().is_none());

        deck.is_public = true;
        db.update_deck(&deck).await.unwrap();
        assert!(db.get_deck_by_share_token("abc123").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn token_store_validate_revoke_cycle() {
        let (_dir, db) = temp_db().await;
        let user = sample_user("token@example.com");
        db.create_user(&user).await.unwrap();

        let expires = Utc::now() + chrono::Duration::hours(24);
        db.store_user_token(&user.id, "jti-1", "hash-1", expires).await.unwrap();
        assert!(db.is_token_valid("jti-1").await.unwrap());

        // Issuing a second token deactivates the first
        db.store_user_token(&user.id, "jti-2", "hash-2", expires).await.unwrap();
        assert!(!db.is_token_valid("jti-1").await.unwrap());
        assert!(db.is_token_valid("jti-2").await.unwrap());

        db.revoke_token("jti-2").await.unwrap();
        assert!(!db.is_token_valid("jti-2").await.unwrap());
    }
}
