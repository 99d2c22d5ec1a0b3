use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::deck::{
    Deck, DeckStats, DeckStatus, DeckTheme, Slide, StartupInfo, TargetInvestor,
};
use crate::services::ai_service::AiService;
use crate::utils::crypto::TokenManager;
use crate::utils::validation::Validator;

pub struct CreateDeckInput {
    pub title: String,
    pub description: Option<String>,
    pub startup_info: Option<StartupInfo>,
    pub target_investors: Vec<TargetInvestor>,
    pub tags: Vec<String>,
}

/// Writable deck fields. Everything else (share token, stats, AI flags) is
/// owned by dedicated flows and cannot be set through a plain update.
#[derive(Default)]
pub struct DeckUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub startup_info: Option<StartupInfo>,
    pub slides: Option<Vec<Slide>>,
    pub theme: Option<DeckTheme>,
    pub status: Option<DeckStatus>,
    pub target_investors: Option<Vec<TargetInvestor>>,
    pub tags: Option<Vec<String>>,
}

pub struct DeckService {
    db: Arc<SqliteDatabase>,
}

impl DeckService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }

    pub async fn list(&self, user_id: &Uuid) -> Result<Vec<Deck>> {
        self.db.list_decks(user_id).await
    }

    pub async fn get(&self, user_id: &Uuid, deck_id: &Uuid) -> Result<Deck> {
        self.db
            .get_deck(deck_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Deck not found".to_string()))
    }

    pub async fn create(&self, user_id: &Uuid, input: CreateDeckInput) -> Result<Deck> {
        Validator::validate_deck_title(&input.title)?;

        let mut deck = Deck::new(*user_id, input.title.trim().to_string());
        deck.description = input.description;
        deck.startup_info = input.startup_info.unwrap_or_default();
        deck.target_investors = input.target_investors;
        deck.tags = input.tags;

        self.db.create_deck(&deck).await?;
        Ok(deck)
    }

    pub async fn update(&self, user_id: &Uuid, deck_id: &Uuid, update: DeckUpdate) -> Result<Deck> {
        let mut deck = self.get(user_id, deck_id).await?;

        if let Some(title) = update.title {
            Validator::validate_deck_title(&title)?;
            deck.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            deck.description = Some(description);
        }
        if let Some(startup_info) = update.startup_info {
            deck.startup_info = startup_info;
        }
        if let Some(slides) = update.slides {
            deck.slides = slides;
        }
        if let Some(theme) = update.theme {
            deck.theme = theme;
        }
        if let Some(status) = update.status {
            deck.status = status;
        }
        if let Some(target_investors) = update.target_investors {
            deck.target_investors = target_investors;
        }
        if let Some(tags) = update.tags {
            deck.tags = tags;
        }

        deck.updated_at = Utc::now();
        self.db.update_deck(&deck).await?;
        Ok(deck)
    }

    pub async fn delete(&self, user_id: &Uuid, deck_id: &Uuid) -> Result<()> {
        let deck = self.get(user_id, deck_id).await?;
        self.db.delete_deck(&deck.id).await
    }

    /// Copy a deck as a fresh draft. Sharing state, stats and AI provenance
    /// do not carry over.
    pub async fn duplicate(&self, user_id: &Uuid, deck_id: &Uuid) -> Result<Deck> {
        let original = self.get(user_id, deck_id).await?;

        let now = Utc::now();
        let copy = Deck {
            id: Uuid::new_v4(),
            user_id: *user_id,
            title: format!("{} (Copy)", original.title),
            description: original.description,
            startup_info: original.startup_info,
            slides: original.slides,
            template: original.template,
            theme: original.theme,
            status: DeckStatus::Draft,
            is_public: false,
            share_token: None,
            stats: DeckStats::default(),
            ai_generated: false,
            ai_prompt: None,
            target_investors: original.target_investors,
            tags: original.tags,
            collaborators: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.db.create_deck(&copy).await?;
        Ok(copy)
    }

    /// Put the deck behind a public share link. Re-sharing rotates the
    /// token, which invalidates previously handed-out links.
    pub async fn share(&self, user_id: &Uuid, deck_id: &Uuid) -> Result<(String, String)> {
        let mut deck = self.get(user_id, deck_id).await?;

        let share_token = TokenManager::generate_share_token();
        deck.share_token = Some(share_token.clone());
        deck.is_public = true;
        deck.updated_at = Utc::now();
        self.db.update_deck(&deck).await?;

        let client_url =
            std::env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let share_url = format!("{}/deck/{}", client_url, share_token);

        println!("🔗 Deck shared: {} -> {}", deck.title, share_url);
        Ok((share_token, share_url))
    }

    /// Public, unauthenticated lookup by share token. Every open counts as
    /// a view on the deck's embedded stats.
    pub async fn open_shared(&self, token: &str) -> Result<Deck> {
        let mut deck = self
            .db
            .get_deck_by_share_token(token)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Deck not found or not shared".to_string()))?;

        deck.stats.views += 1;
        deck.stats.last_viewed = Some(Utc::now());
        self.db.update_deck(&deck).await?;

        Ok(deck)
    }

    pub async fn generate(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
        startup_info: StartupInfo,
        target_investors: Vec<TargetInvestor>,
        ai: &AiService,
    ) -> Result<Deck> {
        let mut deck = self.get(user_id, deck_id).await?;

        let slides = ai.generate_pitch_deck(&startup_info, &target_investors).await?;

        deck.ai_prompt = Some(format!(
            "Generated deck for {} in {}",
            startup_info.name.as_deref().unwrap_or("unnamed startup"),
            startup_info.industry.as_deref().unwrap_or("unspecified industry"),
        ));
        deck.startup_info = startup_info;
        deck.slides = slides;
        deck.target_investors = target_investors;
        deck.ai_generated = true;
        deck.updated_at = Utc::now();

        self.db.update_deck(&deck).await?;
        Ok(deck)
    }

    pub async fn analyze_slide(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
        slide_index: usize,
        ai: &AiService,
    ) -> Result<(crate::models::deck::AiFeedback, Slide)> {
        let mut deck = self.get(user_id, deck_id).await?;

        if slide_index >= deck.slides.len() {
            return Err(AppError::ValidationError("Invalid slide index".to_string()));
        }

        let slide = &deck.slides[slide_index];
        let feedback = ai.analyze_slide(&slide.content, slide.slide_type).await;

        deck.slides[slide_index].ai_feedback = Some(feedback.clone());
        deck.updated_at = Utc::now();
        self.db.update_deck(&deck).await?;

        Ok((feedback, deck.slides[slide_index].clone()))
    }

    pub async fn suggest_improvements(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
        slide_index: usize,
        target_investor: Option<TargetInvestor>,
        ai: &AiService,
    ) -> Result<String> {
        let deck = self.get(user_id, deck_id).await?;

        if slide_index >= deck.slides.len() {
            return Err(AppError::ValidationError("Invalid slide index".to_string()));
        }

        let slide = &deck.slides[slide_index];
        Ok(ai
            .suggest_improvements(&slide.content, slide.slide_type, target_investor.as_ref())
            .await)
    }

    /// Produce an investor-specific copy of every slide. The tailored text
    /// lands in each slide's customizations map keyed by investor type; the
    /// base content stays untouched.
    pub async fn customize(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
        profile: TargetInvestor,
        ai: &AiService,
    ) -> Result<Deck> {
        let mut deck = self.get(user_id, deck_id).await?;

        let key = profile.investor_type.as_str().to_string();
        for slide in &mut deck.slides {
            let customized = ai.customize_for_investor(&slide.content, &profile).await;
            slide.customizations.insert(key.clone(), customized);
        }

        deck.target_investors = vec![profile];
        deck.updated_at = Utc::now();
        self.db.update_deck(&deck).await?;

        Ok(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::deck::SlideContent;
    use crate::models::investor::InvestorType;
    use crate::models::user::{Subscription, User, UserPreferences};
    use crate::services::ai_service::ContentGenerator;
    use tempfile::TempDir;

    struct Scripted(String);

    #[axum::async_trait]
    impl ContentGenerator for Scripted {
        async fn generate(&self, _: &str, _: &str, _: f32, _: u32) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    #[axum::async_trait]
    impl ContentGenerator for Failing {
        async fn generate(&self, _: &str, _: &str, _: f32, _: u32) -> Result<String> {
            Err(AppError::AiError("no backend".to_string()))
        }
    }

    async fn setup() -> (TempDir, DeckService, Uuid) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("decks_test.db");
        let db = Arc::new(SqliteDatabase::new(path.to_str().unwrap()).await.unwrap());

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "founder@example.com".to_string(),
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
        };
        db.create_user(&user).await.unwrap();

        (dir, DeckService::new(db), user.id)
    }

    fn minimal_input(title: &str) -> CreateDeckInput {
        CreateDeckInput {
            title: title.to_string(),
            description: None,
            startup_info: None,
            target_investors: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn update_only_touches_supplied_fields() {
        let (_dir, decks, user_id) = setup().await;
        let deck = decks.create(&user_id, minimal_input("Pitch v1")).await.unwrap();

        let updated = decks
            .update(
                &user_id,
                &deck.id,
                DeckUpdate {
                    status: Some(DeckStatus::Review),
                    tags: Some(vec!["fintech".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Pitch v1");
        assert_eq!(updated.status, DeckStatus::Review);
        assert_eq!(updated.tags, vec!["fintech".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_resets_sharing_stats_and_provenance() {
        let (_dir, decks, user_id) = setup().await;
        let deck = decks.create(&user_id, minimal_input("Original")).await.unwrap();
        decks.share(&user_id, &deck.id).await.unwrap();

        let copy = decks.duplicate(&user_id, &deck.id).await.unwrap();

        assert_eq!(copy.title, "Original (Copy)");
        assert_eq!(copy.status, DeckStatus::Draft);
        assert!(copy.share_token.is_none());
        assert!(!copy.is_public);
        assert_eq!(copy.stats.views, 0);
        assert!(!copy.ai_generated);
    }

    #[tokio::test]
    async fn shared_view_bumps_embedded_stats() {
        let (_dir, decks, user_id) = setup().await;
        let deck = decks.create(&user_id, minimal_input("Public")).await.unwrap();
        let (token, share_url) = decks.share(&user_id, &deck.id).await.unwrap();
        assert!(share_url.ends_with(&token));

        decks.open_shared(&token).await.unwrap();
        let opened = decks.open_shared(&token).await.unwrap();

        assert_eq!(opened.stats.views, 2);
        assert!(opened.stats.last_viewed.is_some());

        let err = decks.open_shared("no-such-token").await.unwrap_err();
        assert!(matches!(err, AppError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn resharing_rotates_the_token() {
        let (_dir, decks, user_id) = setup().await;
        let deck = decks.create(&user_id, minimal_input("Rotating")).await.unwrap();

        let (first, _) = decks.share(&user_id, &deck.id).await.unwrap();
        let (second, _) = decks.share(&user_id, &deck.id).await.unwrap();

        assert_ne!(first, second);
        assert!(decks.open_shared(&first).await.is_err());
        assert!(decks.open_shared(&second).await.is_ok());
    }

    #[tokio::test]
    async fn generation_populates_slides_and_provenance() {
        let (_dir, decks, user_id) = setup().await;
        let deck = decks.create(&user_id, minimal_input("Empty")).await.unwrap();

        let ai = AiService::with_generator(Arc::new(Scripted(
            r#"[{"slide_type": "problem", "title": "P", "content": {"headline": "h"}}]"#.to_string(),
        )));
        let startup_info = StartupInfo {
            name: Some("Acme".to_string()),
            industry: Some("Robotics".to_string()),
            ..Default::default()
        };

        let generated = decks
            .generate(&user_id, &deck.id, startup_info, Vec::new(), &ai)
            .await
            .unwrap();

        assert_eq!(generated.slides.len(), 1);
        assert!(generated.ai_generated);
        assert_eq!(
            generated.ai_prompt.as_deref(),
            Some("Generated deck for Acme in Robotics")
        );
    }

    #[tokio::test]
    async fn analysis_persists_feedback_on_the_slide() {
        let (_dir, decks, user_id) = setup().await;
        let deck = decks.create(&user_id, minimal_input("With slides")).await.unwrap();
        decks
            .update(
                &user_id,
                &deck.id,
                DeckUpdate {
                    slides: Some(vec![Slide {
                        slide_type: crate::models::deck::SlideType::Problem,
                        title: "P".to_string(),
                        content: Default::default(),
                        order: 1,
                        ai_feedback: None,
                        customizations: Default::default(),
                    }]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let ai = AiService::with_generator(Arc::new(Scripted(
            r#"{"clarity": 9, "persuasiveness": 8, "suggestions": [], "tone": "confident"}"#.to_string(),
        )));

        let (feedback, _) = decks.analyze_slide(&user_id, &deck.id, 0, &ai).await.unwrap();
        assert_eq!(feedback.clarity, 9);

        let reloaded = decks.get(&user_id, &deck.id).await.unwrap();
        assert_eq!(reloaded.slides[0].ai_feedback.as_ref().unwrap().clarity, 9);

        let err = decks.analyze_slide(&user_id, &deck.id, 5, &ai).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn customization_is_keyed_by_investor_type() {
        let (_dir, decks, user_id) = setup().await;
        let deck = decks.create(&user_id, minimal_input("Tailored")).await.unwrap();
        decks
            .update(
                &user_id,
                &deck.id,
                DeckUpdate {
                    slides: Some(vec![Slide {
                        slide_type: crate::models::deck::SlideType::Traction,
                        title: "T".to_string(),
                        content: SlideContent {
                            headline: Some("10k users".to_string()),
                            ..Default::default()
                        },
                        order: 1,
                        ai_feedback: None,
                        customizations: Default::default(),
                    }]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // failing backend keeps the original content as the customized copy
        let ai = AiService::with_generator(Arc::new(Failing));
        let profile = TargetInvestor {
            investor_type: InvestorType::Angel,
            focus: vec!["Consumer".to_string()],
            stage: vec!["seed".to_string()],
            location: None,
        };

        let customized = decks.customize(&user_id, &deck.id, profile, &ai).await.unwrap();

        let copy = customized.slides[0].customizations.get("angel").unwrap();
        assert!(copy.contains("10k users"));
        assert_eq!(customized.target_investors.len(), 1);
    }

    #[tokio::test]
    async fn foreign_decks_are_invisible() {
        let (_dir, decks, user_id) = setup().await;
        let deck = decks.create(&user_id, minimal_input("Mine")).await.unwrap();

        let stranger = Uuid::new_v4();
        let err = decks.get(&stranger, &deck.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFoundError(_)));

        let err = decks.delete(&stranger, &deck.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFoundError(_)));
    }
}
