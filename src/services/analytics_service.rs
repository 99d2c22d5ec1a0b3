use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::sqlite::SqliteDatabase;
use crate::errors::{AppError, Result};
use crate::models::analytics::{
    DeckAnalytics, InteractionKind, InteractionStatus, InterestLevel, InvestorInteraction,
    InvestorInteractionEvent, SlideEngagement, SlideView, ViewEvent, ViewerType,
};
use crate::models::deck::{Deck, SlideType};
use crate::models::investor::{InvestorType, Location};

pub struct TrackViewInput {
    pub deck_id: Uuid,
    pub session_id: String,
    pub viewer_id: Option<String>,
    pub viewer_type: Option<ViewerType>,
    pub slide_views: Vec<SlideView>,
    pub duration: Option<f64>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub referrer: Option<String>,
}

pub struct RecordInteractionInput {
    pub deck_id: Uuid,
    pub investor_id: String,
    pub interaction_type: InteractionKind,
    pub investor_name: Option<String>,
    pub investor_type: InvestorType,
    pub interest_level: Option<InterestLevel>,
    pub notes: Option<String>,
}

pub struct InteractionStatusUpdate {
    pub status: InteractionStatus,
    pub interest_level: Option<InterestLevel>,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
}

/// One deck's numbers inside the account-wide overview. Times are seconds.
pub struct DeckAnalyticsSummary {
    pub deck_id: Uuid,
    pub title: String,
    pub views: i64,
    pub unique_views: i64,
    pub avg_view_time: f64,
}

pub struct RecentActivity {
    pub deck_id: Uuid,
    pub title: String,
    pub last_viewed: DateTime<Utc>,
    pub views: i64,
}

pub struct AnalyticsOverview {
    pub total_views: i64,
    pub total_unique_views: i64,
    pub total_decks: usize,
    /// Seconds per view across every deck, weighted by view count.
    pub avg_view_time: f64,
    pub top_decks: Vec<DeckAnalyticsSummary>,
    pub recent_activity: Vec<RecentActivity>,
}

/// Per-slide engagement joined with the deck's slide list, one row per
/// slide even when nobody reached it.
pub struct SlideAnalyticsRow {
    pub slide_index: u32,
    pub title: String,
    pub slide_type: SlideType,
    pub views: i64,
    pub avg_time_spent: f64,
    pub drop_off_rate: f64,
    pub interactions: i64,
}

pub struct AnalyticsService {
    db: Arc<SqliteDatabase>,
}

impl AnalyticsService {
    pub fn new(db: Arc<SqliteDatabase>) -> Self {
        Self { db }
    }

    /// Record one viewing session and fold it into the deck's rollup.
    /// Deliberately does not check that the deck exists: view beacons fire
    /// from public share pages and must never 404.
    pub async fn track_view(&self, input: TrackViewInput) -> Result<()> {
        let deck_id = input.deck_id;
        let event = ViewEvent {
            id: Uuid::new_v4(),
            deck_id,
            viewer_id: input.viewer_id.unwrap_or_else(|| "anonymous".to_string()),
            viewer_type: input.viewer_type.unwrap_or(ViewerType::Anonymous),
            session_id: input.session_id,
            timestamp: Utc::now(),
            duration: input.duration.unwrap_or(0.0),
            slide_views: input.slide_views,
            user_agent: input.user_agent,
            ip_address: input.ip_address,
            referrer: input.referrer,
            location: Location::default(),
        };

        self.db.insert_view_event(&event).await?;
        self.refresh_deck_analytics(&deck_id).await?;
        Ok(())
    }

    /// Find-or-create the rollup row for a deck and rebuild it from the
    /// full event log.
    pub async fn refresh_deck_analytics(&self, deck_id: &Uuid) -> Result<DeckAnalytics> {
        let mut analytics = match self.db.get_analytics_row(deck_id).await? {
            Some(row) => row,
            None => {
                let fresh = DeckAnalytics::new(*deck_id);
                self.db.insert_analytics(&fresh).await?;
                fresh
            }
        };

        let events = self.db.get_deck_view_events(deck_id).await?;

        analytics.total_views = events.len() as i64;
        analytics.unique_views = events
            .iter()
            .map(|e| e.viewer_id.as_str())
            .collect::<HashSet<_>>()
            .len() as i64;
        analytics.total_view_time = events.iter().map(|e| e.duration).sum();
        analytics.avg_view_time = if analytics.total_views > 0 {
            analytics.total_view_time / analytics.total_views as f64
        } else {
            0.0
        };

        // Group slide views by index; a slide counts once per session it
        // appeared in.
        let mut slide_stats: BTreeMap<u32, (i64, f64, i64)> = BTreeMap::new();
        for event in &events {
            for slide_view in &event.slide_views {
                let entry = slide_stats.entry(slide_view.slide_index).or_insert((0, 0.0, 0));
                entry.0 += 1;
                entry.1 += slide_view.time_spent;
                entry.2 += slide_view.interactions.len() as i64;
            }
        }
        analytics.slide_engagement = slide_stats
            .into_iter()
            .map(|(slide_index, (views, total_time, interactions))| SlideEngagement {
                slide_index,
                views,
                avg_time_spent: if views > 0 { total_time / views as f64 } else { 0.0 },
                drop_off_rate: 0.0,
                interactions,
            })
            .collect();

        if !events.is_empty() {
            analytics.first_viewed = events.iter().map(|e| e.timestamp).min();
            analytics.last_viewed = events.iter().map(|e| e.timestamp).max();
        }

        analytics.updated_at = Utc::now();
        self.db.update_analytics(&analytics).await?;
        Ok(analytics)
    }

    /// Owner's dashboard for one deck: fresh rollup plus the investor
    /// relationship log.
    pub async fn deck_analytics(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> Result<(Deck, DeckAnalytics, Vec<InvestorInteraction>)> {
        let deck = self
            .db
            .get_deck(deck_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Deck not found".to_string()))?;

        let analytics = self.refresh_deck_analytics(deck_id).await?;
        let interactions = self.db.get_deck_interactions(deck_id).await?;

        Ok((deck, analytics, interactions))
    }

    /// Account-wide rollup. Every deck is refreshed first, so the overview
    /// reflects all events recorded up to this call.
    pub async fn overview(&self, user_id: &Uuid) -> Result<AnalyticsOverview> {
        let decks = self.db.list_decks(user_id).await?;

        let mut pairs: Vec<(&Deck, DeckAnalytics)> = Vec::with_capacity(decks.len());
        for deck in &decks {
            let analytics = self.refresh_deck_analytics(&deck.id).await?;
            pairs.push((deck, analytics));
        }

        let total_views: i64 = pairs.iter().map(|(_, a)| a.total_views).sum();
        let total_unique_views: i64 = pairs.iter().map(|(_, a)| a.unique_views).sum();
        let total_view_time: f64 = pairs.iter().map(|(_, a)| a.total_view_time).sum();
        let avg_view_time = if total_views > 0 {
            total_view_time / total_views as f64
        } else {
            0.0
        };

        let mut top_decks: Vec<DeckAnalyticsSummary> = pairs
            .iter()
            .map(|(deck, analytics)| DeckAnalyticsSummary {
                deck_id: deck.id,
                title: deck.title.clone(),
                views: analytics.total_views,
                unique_views: analytics.unique_views,
                avg_view_time: analytics.avg_view_time,
            })
            .collect();
        top_decks.sort_by(|a, b| b.views.cmp(&a.views));
        top_decks.truncate(5);

        let mut recent_activity: Vec<RecentActivity> = pairs
            .iter()
            .filter_map(|(deck, analytics)| {
                analytics.last_viewed.map(|last_viewed| RecentActivity {
                    deck_id: deck.id,
                    title: deck.title.clone(),
                    last_viewed,
                    views: analytics.total_views,
                })
            })
            .collect();
        recent_activity.sort_by(|a, b| b.last_viewed.cmp(&a.last_viewed));
        recent_activity.truncate(10);

        Ok(AnalyticsOverview {
            total_views,
            total_unique_views,
            total_decks: decks.len(),
            avg_view_time,
            top_decks,
            recent_activity,
        })
    }

    /// Log an investor touching a deck. One record per (deck, investor)
    /// pair; repeat calls append to its event list. Name and type are fixed
    /// at creation, interest and notes follow the latest call.
    pub async fn record_interaction(
        &self,
        user_id: &Uuid,
        input: RecordInteractionInput,
    ) -> Result<InvestorInteraction> {
        self.db
            .get_deck(&input.deck_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Deck not found".to_string()))?;

        let existing = self.db.find_interaction(&input.deck_id, &input.investor_id).await?;
        let is_new = existing.is_none();

        let mut interaction = existing.unwrap_or_else(|| {
            let mut fresh = InvestorInteraction::new(
                input.deck_id,
                input.investor_id.clone(),
                input.investor_type,
            );
            fresh.investor_name = input.investor_name.clone();
            fresh
        });

        interaction.interactions.push(InvestorInteractionEvent {
            kind: input.interaction_type,
            timestamp: Utc::now(),
            metadata: None,
        });
        if let Some(level) = input.interest_level {
            interaction.interest_level = level;
        }
        if let Some(notes) = input.notes {
            interaction.notes = Some(notes);
        }
        interaction.updated_at = Utc::now();

        if is_new {
            self.db.insert_interaction(&interaction).await?;
        } else {
            self.db.update_interaction(&interaction).await?;
        }

        Ok(interaction)
    }

    pub async fn update_interaction_status(
        &self,
        user_id: &Uuid,
        interaction_id: &Uuid,
        update: InteractionStatusUpdate,
    ) -> Result<InvestorInteraction> {
        let mut interaction = self
            .db
            .get_interaction_by_id(interaction_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Interaction not found".to_string()))?;

        // The interaction's deck must belong to the caller.
        if self.db.get_deck(&interaction.deck_id, user_id).await?.is_none() {
            return Err(AppError::ForbiddenError("Access denied".to_string()));
        }

        interaction.status = update.status;
        if let Some(level) = update.interest_level {
            interaction.interest_level = level;
        }
        if let Some(notes) = update.notes {
            interaction.notes = Some(notes);
        }
        if let Some(date) = update.follow_up_date {
            interaction.follow_up_date = Some(date);
        }
        interaction.updated_at = Utc::now();

        self.db.update_interaction(&interaction).await?;
        Ok(interaction)
    }

    /// Slide-by-slide table for one deck. Rows follow the deck's slide
    /// order; slides nobody saw report zeros.
    pub async fn slide_analytics(
        &self,
        user_id: &Uuid,
        deck_id: &Uuid,
    ) -> Result<Vec<SlideAnalyticsRow>> {
        let deck = self
            .db
            .get_deck(deck_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFoundError("Deck not found".to_string()))?;

        let analytics = self.refresh_deck_analytics(deck_id).await?;

        let rows = deck
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| {
                let engagement = analytics
                    .slide_engagement
                    .iter()
                    .find(|e| e.slide_index == index as u32);

                SlideAnalyticsRow {
                    slide_index: index as u32,
                    title: slide.title.clone(),
                    slide_type: slide.slide_type,
                    views: engagement.map(|e| e.views).unwrap_or(0),
                    avg_time_spent: engagement.map(|e| e.avg_time_spent).unwrap_or(0.0),
                    drop_off_rate: engagement.map(|e| e.drop_off_rate).unwrap_or(0.0),
                    interactions: engagement.map(|e| e.interactions).unwrap_or(0),
                }
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analytics::SlideInteraction;
    use crate::models::deck::{Deck, Slide, SlideContent};
    use crate::models::user::{Subscription, User, UserPreferences};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, AnalyticsService, Arc<SqliteDatabase>, Uuid) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("analytics_test.db");
        let db = Arc::new(SqliteDatabase::new(path.to_str().unwrap()).await.unwrap());

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
            first_name: "Deck".to_string(),
            last_name: "Owner".to_string(),
            password_hash: "hash".to_string(),
            company_name: "Decks Inc".to_string(),
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

        (dir, AnalyticsService::new(db.clone()), db, user.id)
    }

    async fn seed_deck(db: &SqliteDatabase, user_id: Uuid, title: &str) -> Deck {
        let deck = Deck::new(user_id, title.to_string());
        db.create_deck(&deck).await.unwrap();
        deck
    }

    fn view(deck_id: Uuid, viewer: &str, duration: f64) -> TrackViewInput {
        TrackViewInput {
            deck_id,
            session_id: Uuid::new_v4().to_string(),
            viewer_id: Some(viewer.to_string()),
            viewer_type: Some(ViewerType::Investor),
            slide_views: Vec::new(),
            duration: Some(duration),
            user_agent: None,
            ip_address: None,
            referrer: None,
        }
    }

    #[tokio::test]
    async fn fresh_deck_reports_zeroes() {
        let (_dir, analytics, db, user_id) = setup().await;
        let deck = seed_deck(&db, user_id, "Quiet").await;

        let rollup = analytics.refresh_deck_analytics(&deck.id).await.unwrap();

        assert_eq!(rollup.total_views, 0);
        assert_eq!(rollup.unique_views, 0);
        assert_eq!(rollup.avg_view_time, 0.0);
        assert!(rollup.slide_engagement.is_empty());
        assert!(rollup.first_viewed.is_none());
        assert!(rollup.last_viewed.is_none());
    }

    #[tokio::test]
    async fn rollup_follows_the_event_log() {
        let (_dir, analytics, db, user_id) = setup().await;
        let deck = seed_deck(&db, user_id, "Busy").await;

        analytics.track_view(view(deck.id, "alice", 30.0)).await.unwrap();
        analytics.track_view(view(deck.id, "alice", 60.0)).await.unwrap();
        analytics.track_view(view(deck.id, "bob", 0.0)).await.unwrap();

        let rollup = analytics.refresh_deck_analytics(&deck.id).await.unwrap();

        assert_eq!(rollup.total_views, 3);
        assert_eq!(rollup.unique_views, 2);
        assert_eq!(rollup.total_view_time, 90.0);
        assert_eq!(rollup.avg_view_time, 30.0);
        assert!(rollup.unique_views <= rollup.total_views);
        assert!(rollup.first_viewed.unwrap() <= rollup.last_viewed.unwrap());
    }

    #[tokio::test]
    async fn slide_engagement_groups_by_index() {
        let (_dir, analytics, db, user_id) = setup().await;
        let deck = seed_deck(&db, user_id, "Slides").await;

        let mut first = view(deck.id, "alice", 25.0);
        first.slide_views = vec![
            SlideView { slide_index: 0, time_spent: 10.0, interactions: Vec::new() },
            SlideView {
                slide_index: 1,
                time_spent: 5.0,
                interactions: vec![
                    SlideInteraction { kind: "click".to_string(), timestamp: None, element: None },
                    SlideInteraction { kind: "scroll".to_string(), timestamp: None, element: None },
                ],
            },
        ];
        let mut second = view(deck.id, "bob", 20.0);
        second.slide_views = vec![SlideView { slide_index: 0, time_spent: 20.0, interactions: Vec::new() }];

        analytics.track_view(first).await.unwrap();
        analytics.track_view(second).await.unwrap();

        let rollup = analytics.refresh_deck_analytics(&deck.id).await.unwrap();

        assert_eq!(rollup.slide_engagement.len(), 2);
        let slide0 = &rollup.slide_engagement[0];
        assert_eq!(slide0.slide_index, 0);
        assert_eq!(slide0.views, 2);
        assert_eq!(slide0.avg_time_spent, 15.0);
        let slide1 = &rollup.slide_engagement[1];
        assert_eq!(slide1.views, 1);
        assert_eq!(slide1.interactions, 2);
    }

    #[tokio::test]
    async fn tracking_an_unknown_deck_still_records() {
        let (_dir, analytics, _db, _user_id) = setup().await;
        let phantom = Uuid::new_v4();

        analytics.track_view(view(phantom, "ghost", 10.0)).await.unwrap();

        let rollup = analytics.refresh_deck_analytics(&phantom).await.unwrap();
        assert_eq!(rollup.total_views, 1);
    }

    #[tokio::test]
    async fn repeat_interactions_merge_into_one_record() {
        let (_dir, analytics, db, user_id) = setup().await;
        let deck = seed_deck(&db, user_id, "Courted").await;

        let first = analytics
            .record_interaction(
                &user_id,
                RecordInteractionInput {
                    deck_id: deck.id,
                    investor_id: "sequoia-jane".to_string(),
                    interaction_type: InteractionKind::View,
                    investor_name: Some("Jane Doe".to_string()),
                    investor_type: InvestorType::Vc,
                    interest_level: Some(InterestLevel::Medium),
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(first.interactions.len(), 1);
        assert_eq!(first.status, InteractionStatus::Pending);

        let second = analytics
            .record_interaction(
                &user_id,
                RecordInteractionInput {
                    deck_id: deck.id,
                    investor_id: "sequoia-jane".to_string(),
                    interaction_type: InteractionKind::Download,
                    investor_name: None,
                    investor_type: InvestorType::Vc,
                    interest_level: Some(InterestLevel::High),
                    notes: Some("asked for the data room".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.interactions.len(), 2);
        assert_eq!(second.interest_level, InterestLevel::High);
        // name is fixed at creation
        assert_eq!(second.investor_name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn interaction_for_foreign_deck_is_not_found() {
        let (_dir, analytics, db, user_id) = setup().await;
        let deck = seed_deck(&db, user_id, "Private").await;

        let stranger = Uuid::new_v4();
        let err = analytics
            .record_interaction(
                &stranger,
                RecordInteractionInput {
                    deck_id: deck.id,
                    investor_id: "x".to_string(),
                    interaction_type: InteractionKind::View,
                    investor_name: None,
                    investor_type: InvestorType::Angel,
                    interest_level: None,
                    notes: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFoundError(_)));
    }

    #[tokio::test]
    async fn status_update_requires_deck_ownership() {
        let (_dir, analytics, db, user_id) = setup().await;
        let deck = seed_deck(&db, user_id, "Hot lead").await;

        let interaction = analytics
            .record_interaction(
                &user_id,
                RecordInteractionInput {
                    deck_id: deck.id,
                    investor_id: "a16z-bob".to_string(),
                    interaction_type: InteractionKind::Contact,
                    investor_name: None,
                    investor_type: InvestorType::Vc,
                    interest_level: None,
                    notes: None,
                },
            )
            .await
            .unwrap();

        let stranger = Uuid::new_v4();
        let err = analytics
            .update_interaction_status(
                &stranger,
                &interaction.id,
                InteractionStatusUpdate {
                    status: InteractionStatus::Contacted,
                    interest_level: None,
                    notes: None,
                    follow_up_date: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenError(_)));

        let updated = analytics
            .update_interaction_status(
                &user_id,
                &interaction.id,
                InteractionStatusUpdate {
                    status: InteractionStatus::MeetingScheduled,
                    interest_level: Some(InterestLevel::High),
                    notes: None,
                    follow_up_date: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, InteractionStatus::MeetingScheduled);
        assert_eq!(updated.interest_level, InterestLevel::High);
    }

    #[tokio::test]
    async fn overview_sums_across_decks_and_ranks_by_views() {
        let (_dir, analytics, db, user_id) = setup().await;
        let quiet = seed_deck(&db, user_id, "Quiet").await;
        let busy = seed_deck(&db, user_id, "Busy").await;

        analytics.track_view(view(busy.id, "alice", 40.0)).await.unwrap();
        analytics.track_view(view(busy.id, "bob", 20.0)).await.unwrap();
        analytics.track_view(view(quiet.id, "alice", 10.0)).await.unwrap();

        let overview = analytics.overview(&user_id).await.unwrap();

        assert_eq!(overview.total_decks, 2);
        assert_eq!(overview.total_views, 3);
        assert_eq!(overview.total_unique_views, 3);
        // weighted: (40 + 20 + 10) / 3
        assert!((overview.avg_view_time - 70.0 / 3.0).abs() < 1e-9);

        assert_eq!(overview.top_decks[0].title, "Busy");
        assert_eq!(overview.top_decks[0].views, 2);

        assert_eq!(overview.recent_activity.len(), 2);
        assert_eq!(overview.recent_activity[0].title, "Quiet");
    }

    #[tokio::test]
    async fn slide_table_covers_every_slide() {
        let (_dir, analytics, db, user_id) = setup().await;
        let mut deck = seed_deck(&db, user_id, "Two slides").await;
        deck.slides = vec![
            Slide {
                slide_type: SlideType::Problem,
                title: "The Problem".to_string(),
                content: SlideContent::default(),
                order: 1,
                ai_feedback: None,
                customizations: Default::default(),
            },
            Slide {
                slide_type: SlideType::Ask,
                title: "The Ask".to_string(),
                content: SlideContent::default(),
                order: 2,
                ai_feedback: None,
                customizations: Default::default(),
            },
        ];
        db.update_deck(&deck).await.unwrap();

        let mut event = view(deck.id, "alice", 12.0);
        event.slide_views = vec![SlideView { slide_index: 0, time_spent: 12.0, interactions: Vec::new() }];
        analytics.track_view(event).await.unwrap();

        let rows = analytics.slide_analytics(&user_id, &deck.id).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].views, 1);
        assert_eq!(rows[0].avg_time_spent, 12.0);
        assert_eq!(rows[1].views, 0);
        assert_eq!(rows[1].avg_time_spent, 0.0);
    }
}
