use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::deck::{StartupStage, TargetInvestor};
use crate::models::investor::{
    CommunicationPreferences, InvestmentCriteria, Investor, InvestorMatch, InvestorPersona,
    InvestorStatus, InvestorType, Location, MatchCriteria,
};
use crate::services::ai_service::AiService;
use crate::utils::validation::Validator;

pub struct CreateInvestorInput {
    pub name: String,
    pub investor_type: InvestorType,
    pub firm: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub location: Option<Location>,
    pub bio: Option<String>,
    pub investment_criteria: Option<InvestmentCriteria>,
    pub communication_preferences: Option<CommunicationPreferences>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Default)]
pub struct InvestorUpdate {
    pub name: Option<String>,
    pub firm: Option<String>,
    pub title: Option<String>,
    pub investor_type: Option<InvestorType>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub location: Option<Location>,
    pub bio: Option<String>,
    pub investment_criteria: Option<InvestmentCriteria>,
    pub communication_preferences: Option<CommunicationPreferences>,
    pub tags: Option<Vec<String>>,
    pub status: Option<InvestorStatus>,
    pub notes: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
    pub next_follow_up: Option<DateTime<Utc>>,
}

pub struct InvestorService {
    db: Arc<SqliteDatabase>,
}

impl InvestorService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }

    pub async fn list(&self, user_id: &Uuid) -> Result<Vec<Investor>> {
        self.db.list_investors(user_id).await
    }

    pub async fn get(&self, user_id: &Uuid, investor_id: &Uuid) -> Result<Investor> {
        self.db
            .get_investor(investor_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Investor not found".to_string()))
    }

    pub async fn create(&self, user_id: &Uuid, input: CreateInvestorInput) -> Result<Investor> {
        Validator::validate_investor_name(&input.name)?;

        let now = Utc::now();
        let investor = Investor {
            id: Uuid::new_v4(),
            user_id: *user_id,
            name: input.name.trim().to_string(),
            firm: input.firm,
            title: input.title,
            investor_type: input.investor_type,
            email: input.email,
            linkedin: input.linkedin,
            website: input.website,
            location: input.location.unwrap_or_default(),
            bio: input.bio,
            investment_criteria: input.investment_criteria.unwrap_or_default(),
            communication_preferences: input.communication_preferences.unwrap_or_default(),
            tags: input.tags,
            status: InvestorStatus::Active,
            notes: input.notes,
            last_contact: None,
            next_follow_up: None,
            created_at: now,
            updated_at: now,
        };

        self.db.create_investor(&investor).await?;
        Ok(investor)
    }

    pub async fn update(
        &self,
        user_id: &Uuid,
        investor_id: &Uuid,
        update: InvestorUpdate,
    ) -> Result<Investor> {
        let mut investor = self.get(user_id, investor_id).await?;

        if let Some(name) = update.name {
            Validator::validate_investor_name(&name)?;
            investor.name = name.trim().to_string();
        }
        if let Some(firm) = update.firm {
            investor.firm = Some(firm);
        }
        if let Some(title) = update.title {
            investor.title = Some(title);
        }
        if let Some(investor_type) = update.investor_type {
            investor.investor_type = investor_type;
        }
        if let Some(email) = update.email {
            investor.email = Some(email);
        }
        if let Some(linkedin) = update.linkedin {
            investor.linkedin = Some(linkedin);
        }
        if let Some(website) = update.website {
            investor.website = Some(website);
        }
        if let Some(location) = update.location {
            investor.location = location;
        }
        if let Some(bio) = update.bio {
            investor.bio = Some(bio);
        }
        if let Some(criteria) = update.investment_criteria {
            investor.investment_criteria = criteria;
        }
        if let Some(preferences) = update.communication_preferences {
            investor.communication_preferences = preferences;
        }
        if let Some(tags) = update.tags {
            investor.tags = tags;
        }
        if let Some(status) = update.status {
            investor.status = status;
        }
        if let Some(notes) = update.notes {
            investor.notes = Some(notes);
        }
        if let Some(last_contact) = update.last_contact {
            investor.last_contact = Some(last_contact);
        }
        if let Some(next_follow_up) = update.next_follow_up {
            investor.next_follow_up = Some(next_follow_up);
        }

        investor.updated_at = Utc::now();
        self.db.update_investor(&investor).await?;
        Ok(investor)
    }

    pub async fn delete(&self, user_id: &Uuid, investor_id: &Uuid) -> Result<()> {
        let investor = self.get(user_id, investor_id).await?;
        self.db.delete_investor(&investor.id).await
    }

    /// Filter-then-score matching. Every supplied criterion must hold for a
    /// profile to qualify at all, then the same criteria add up the score:
    /// stage 30, sector 25, geography 20, amount 25. The investor-type
    /// filter narrows without scoring. Ties keep insertion order.
    pub async fn match_investors(&self, criteria: &MatchCriteria) -> Result<Vec<InvestorMatch>> {
        let candidates = self.db.list_active_investors().await?;

        let mut matches: Vec<InvestorMatch> = candidates
            .into_iter()
            .filter(|investor| Self::matches_criteria(investor, criteria))
            .map(|investor| {
                let match_score = Self::match_score(&investor, criteria);
                InvestorMatch { investor, match_score }
            })
            .collect();

        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        Ok(matches)
    }

    fn matches_criteria(investor: &Investor, criteria: &MatchCriteria) -> bool {
        let ic = &investor.investment_criteria;

        if let Some(investor_type) = criteria.investor_type {
            if investor.investor_type != investor_type {
                return false;
            }
        }
        if let Some(stage) = criteria.stage {
            if !ic.preferred_stages.contains(&stage) {
                return false;
            }
        }
        if let Some(sector) = &criteria.sector {
            if !ic.preferred_sectors.iter().any(|s| s == sector) {
                return false;
            }
        }
        if let Some(geography) = &criteria.geography {
            if !ic.preferred_geographies.iter().any(|g| g == geography) {
                return false;
            }
        }
        if let Some(amount) = criteria.funding_amount {
            match (ic.min_investment, ic.max_investment) {
                (Some(min), Some(max)) if min <= amount && amount <= max => {}
                _ => return false,
            }
        }

        true
    }

    fn match_score(investor: &Investor, criteria: &MatchCriteria) -> u32 {
        let ic = &investor.investment_criteria;
        let mut score = 0;

        if let Some(stage) = criteria.stage {
            if ic.preferred_stages.contains(&stage) {
                score += 30;
            }
        }
        if let Some(sector) = &criteria.sector {
            if ic.preferred_sectors.iter().any(|s| s == sector) {
                score += 25;
            }
        }
        if let Some(geography) = &criteria.geography {
            if ic.preferred_geographies.iter().any(|g| g == geography) {
                score += 20;
            }
        }
        if let Some(amount) = criteria.funding_amount {
            if let (Some(min), Some(max)) = (ic.min_investment, ic.max_investment) {
                if min <= amount && amount <= max {
                    score += 25;
                }
            }
        }

        score
    }

    /// Built-in investor archetypes used as starting points for new
    /// profiles and for deck customization without a saved investor.
    pub fn personas() -> Vec<InvestorPersona> {
        vec![
            InvestorPersona {
                id: "vc-seed-stage",
                name: "Seed Stage VC",
                investor_type: InvestorType::Vc,
                description: "Early-stage venture capitalists focused on seed rounds",
                investment_criteria: InvestmentCriteria {
                    min_investment: Some(500_000.0),
                    max_investment: Some(5_000_000.0),
                    preferred_stages: vec![StartupStage::Seed, StartupStage::SeriesA],
                    preferred_sectors: vec![
                        "SaaS".to_string(),
                        "Fintech".to_string(),
                        "Healthtech".to_string(),
                    ],
                    ..Default::default()
                },
                communication_preferences: CommunicationPreferences {
                    preferred_format: "pitch_deck".to_string(),
                    preferred_length: "standard".to_string(),
                    key_focus_areas: vec![
                        "traction".to_string(),
                        "team".to_string(),
                        "market_size".to_string(),
                        "unit_economics".to_string(),
                    ],
                    ..Default::default()
                },
            },
            InvestorPersona {
                id: "angel-investor",
                name: "Angel Investor",
                investor_type: InvestorType::Angel,
                description: "Individual angel investors with diverse interests",
                investment_criteria: InvestmentCriteria {
                    min_investment: Some(25_000.0),
                    max_investment: Some(500_000.0),
                    preferred_stages: vec![
                        StartupStage::Idea,
                        StartupStage::PreSeed,
                        StartupStage::Seed,
                    ],
                    preferred_sectors: vec!["All".to_string()],
                    ..Default::default()
                },
                communication_preferences: CommunicationPreferences {
                    preferred_format: "pitch_deck".to_string(),
                    preferred_length: "brief".to_string(),
                    key_focus_areas: vec![
                        "problem".to_string(),
                        "solution".to_string(),
                        "team".to_string(),
                        "traction".to_string(),
                    ],
                    ..Default::default()
                },
            },
            InvestorPersona {
                id: "accelerator-program",
                name: "Accelerator Program",
                investor_type: InvestorType::Accelerator,
                description: "Startup accelerators and incubators",
                investment_criteria: InvestmentCriteria {
                    min_investment: Some(50_000.0),
                    max_investment: Some(150_000.0),
                    preferred_stages: vec![StartupStage::Idea, StartupStage::PreSeed],
                    preferred_sectors: vec!["All".to_string()],
                    ..Default::default()
                },
                communication_preferences: CommunicationPreferences {
                    preferred_format: "pitch_deck".to_string(),
                    preferred_length: "standard".to_string(),
                    key_focus_areas: vec![
                        "problem".to_string(),
                        "solution".to_string(),
                        "market".to_string(),
                        "team".to_string(),
                    ],
                    ..Default::default()
                },
            },
            InvestorPersona {
                id: "corporate-vc",
                name: "Corporate VC",
                investor_type: InvestorType::Corporate,
                description: "Corporate venture capital arms",
                investment_criteria: InvestmentCriteria {
                    min_investment: Some(1_000_000.0),
                    max_investment: Some(10_000_000.0),
                    preferred_stages: vec![
                        StartupStage::Seed,
                        StartupStage::SeriesA,
                        StartupStage::SeriesB,
                    ],
                    preferred_sectors: vec![
                        "Enterprise".to_string(),
                        "B2B".to_string(),
                        "Deep Tech".to_string(),
                    ],
                    ..Default::default()
                },
                communication_preferences: CommunicationPreferences {
                    preferred_format: "pitch_deck".to_string(),
                    preferred_length: "detailed".to_string(),
                    key_focus_areas: vec![
                        "technology".to_string(),
                        "market_fit".to_string(),
                        "scalability".to_string(),
                        "partnership_potential".to_string(),
                    ],
                    ..Default::default()
                },
            },
        ]
    }

    /// Tailor one of the caller's decks to one of their saved investors.
    pub async fn customize_deck(
        &self,
        user_id: &Uuid,
        investor_id: &Uuid,
        deck_id: &Uuid,
        customization_focus: &str,
        ai: &AiService,
    ) -> Result<(Investor, String)> {
        let investor = self.get(user_id, investor_id).await?;
        let deck = self
            .db
            .get_deck(deck_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Deck not found".to_string()))?;

        let profile = TargetInvestor {
            investor_type: investor.investor_type,
            focus: investor.investment_criteria.preferred_sectors.clone(),
            stage: investor
                .investment_criteria
                .preferred_stages
                .iter()
                .map(|s| s.to_string())
                .collect(),
            location: investor.location.country.clone(),
        };

        let customized = ai
            .customize_deck_for_investor(&deck, &profile, customization_focus)
            .await;

        Ok((investor, customized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{Subscription, User, UserPreferences};
    use crate::services::ai_service::ContentGenerator;
    use crate::services::deck_service::{CreateDeckInput, DeckService};
    use tempfile::TempDir;

    struct Failing;

    #[axum::async_trait]
    impl ContentGenerator for Failing {
        async fn generate(&self, _: &str, _: &str, _: f32, _: u32) -> Result<String> {
            Err(AppError::AiError("no backend".to_string()))
        }
    }

    async fn setup() -> (TempDir, InvestorService, Arc<SqliteDatabase>, Uuid) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("investors_test.db");
        let db = Arc::new(SqliteDatabase::new(path.to_str().unwrap()).await.unwrap());

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "scout@example.com".to_string(),
            first_name: "Scout".to_string(),
            last_name: "Finch".to_string(),
            password_hash: "hash".to_string(),
            company_name: "Scouting Co".to_string(),
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

        (dir, InvestorService::new(db.clone()), db, user.id)
    }

    fn investor_input(name: &str, investor_type: InvestorType) -> CreateInvestorInput {
        CreateInvestorInput {
            name: name.to_string(),
            investor_type,
            firm: None,
            title: None,
            email: None,
            linkedin: None,
            website: None,
            location: None,
            bio: None,
            investment_criteria: None,
            communication_preferences: None,
            tags: Vec::new(),
            notes: None,
        }
    }

    fn full_criteria() -> InvestmentCriteria {
        InvestmentCriteria {
            min_investment: Some(100_000.0),
            max_investment: Some(1_000_000.0),
            preferred_stages: vec![StartupStage::Seed],
            preferred_sectors: vec!["SaaS".to_string()],
            preferred_geographies: vec!["US".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn every_matching_criterion_adds_its_weight() {
        let (_dir, investors, _db, user_id) = setup().await;

        let mut input = investor_input("Full Match", InvestorType::Vc);
        input.investment_criteria = Some(full_criteria());
        investors.create(&user_id, input).await.unwrap();

        let matches = investors
            .match_investors(&MatchCriteria {
                stage: Some(StartupStage::Seed),
                sector: Some("SaaS".to_string()),
                geography: Some("US".to_string()),
                funding_amount: Some(500_000.0),
                investor_type: None,
            })
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_score, 100);
    }

    #[tokio::test]
    async fn unmatched_criteria_exclude_rather_than_rank_low() {
        let (_dir, investors, _db, user_id) = setup().await;

        let mut saas = investor_input("SaaS VC", InvestorType::Vc);
        saas.investment_criteria = Some(full_criteria());
        investors.create(&user_id, saas).await.unwrap();

        let mut biotech = investor_input("Biotech VC", InvestorType::Vc);
        biotech.investment_criteria = Some(InvestmentCriteria {
            preferred_stages: vec![StartupStage::Seed],
            preferred_sectors: vec!["Biotech".to_string()],
            ..Default::default()
        });
        investors.create(&user_id, biotech).await.unwrap();

        let matches = investors
            .match_investors(&MatchCriteria {
                stage: Some(StartupStage::Seed),
                sector: Some("SaaS".to_string()),
                funding_amount: Some(500_000.0),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].investor.name, "SaaS VC");
        // stage 30 + sector 25 + amount 25
        assert_eq!(matches[0].match_score, 80);
    }

    #[tokio::test]
    async fn amount_match_needs_a_full_range() {
        let (_dir, investors, _db, user_id) = setup().await;

        let mut open_ended = investor_input("No ceiling", InvestorType::Vc);
        open_ended.investment_criteria = Some(InvestmentCriteria {
            min_investment: Some(100_000.0),
            max_investment: None,
            ..Default::default()
        });
        investors.create(&user_id, open_ended).await.unwrap();

        let matches = investors
            .match_investors(&MatchCriteria {
                funding_amount: Some(500_000.0),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn type_filter_narrows_without_scoring() {
        let (_dir, investors, _db, user_id) = setup().await;
        investors.create(&user_id, investor_input("An angel", InvestorType::Angel)).await.unwrap();
        investors.create(&user_id, investor_input("A fund", InvestorType::Vc)).await.unwrap();

        let matches = investors
            .match_investors(&MatchCriteria {
                investor_type: Some(InvestorType::Angel),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].investor.name, "An angel");
        assert_eq!(matches[0].match_score, 0);
    }

    #[tokio::test]
    async fn inactive_profiles_never_match() {
        let (_dir, investors, _db, user_id) = setup().await;
        let investor = investors
            .create(&user_id, investor_input("Retired", InvestorType::Angel))
            .await
            .unwrap();
        investors
            .update(
                &user_id,
                &investor.id,
                InvestorUpdate {
                    status: Some(InvestorStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let matches = investors.match_investors(&MatchCriteria::default()).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (_dir, investors, _db, user_id) = setup().await;
        let investor = investors
            .create(&user_id, investor_input("Jane", InvestorType::Vc))
            .await
            .unwrap();

        let updated = investors
            .update(
                &user_id,
                &investor.id,
                InvestorUpdate {
                    firm: Some("Alpha Capital".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.firm.as_deref(), Some("Alpha Capital"));
        assert_eq!(updated.name, "Jane");
        assert_eq!(updated.investor_type, InvestorType::Vc);
    }

    #[tokio::test]
    async fn deleted_profiles_are_gone() {
        let (_dir, investors, _db, user_id) = setup().await;
        let investor = investors
            .create(&user_id, investor_input("Temp", InvestorType::Angel))
            .await
            .unwrap();

        investors.delete(&user_id, &investor.id).await.unwrap();

        let err = investors.get(&user_id, &investor.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFoundError(_)));
    }

    #[test]
    fn persona_catalog_covers_the_four_archetypes() {
        let personas = InvestorService::personas();

        let ids: Vec<&str> = personas.iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec!["vc-seed-stage", "angel-investor", "accelerator-program", "corporate-vc"]
        );

        let corporate = &personas[3];
        assert_eq!(corporate.investor_type, InvestorType::Corporate);
        assert_eq!(corporate.investment_criteria.max_investment, Some(10_000_000.0));
        assert_eq!(corporate.communication_preferences.preferred_length, "detailed");
    }

    #[tokio::test]
    async fn deck_customization_echoes_content_when_the_backend_fails() {
        let (_dir, investors, db, user_id) = setup().await;
        let investor = investors
            .create(&user_id, investor_input("Tailor", InvestorType::Vc))
            .await
            .unwrap();

        let decks = DeckService::new(db);
        let deck = decks
            .create(
                &user_id,
                CreateDeckInput {
                    title: "Series A narrative".to_string(),
                    description: None,
                    startup_info: None,
                    target_investors: Vec::new(),
                    tags: Vec::new(),
                },
            )
            .await
            .unwrap();

        let ai = AiService::with_generator(Arc::new(Failing));
        let (echoed, customized) = investors
            .customize_deck(&user_id, &investor.id, &deck.id, "tone", &ai)
            .await
            .unwrap();

        assert_eq!(echoed.id, investor.id);
        assert!(customized.contains("Series A narrative"));
    }
}
