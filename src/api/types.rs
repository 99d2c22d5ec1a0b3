use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::analytics::{
    DeckAnalytics, EngagementMetrics, InteractionKind, InterestLevel, InteractionStatus,
    InvestorInteraction, SlideEngagement, SlideView, ViewerDemographics, ViewerType,
};
use crate::models::deck::{
    Deck, DeckStats, DeckStatus, DeckTheme, Slide, StartupInfo, StartupStage, TargetInvestor,
};
use crate::models::investor::{
    CommunicationPreferences, InvestmentCriteria, Investor, InvestorType, Location,
};
use crate::models::user::UserResponse;
use crate::services::analytics_service::{
    AnalyticsOverview, DeckAnalyticsSummary, RecentActivity, SlideAnalyticsRow,
};

/// Stored view times are seconds; the dashboard reads minutes with two
/// decimal places.
pub fn seconds_to_minutes(seconds: f64) -> f64 {
    (seconds / 60.0 * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotificationSettingsPatch {
    pub email: Option<bool>,
    pub push: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<String>,
    pub notifications: Option<NotificationSettingsPatch>,
}

// ---------------------------------------------------------------------------
// Decks
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDeckRequest {
    pub title: String,
    pub description: Option<String>,
    pub startup_info: Option<StartupInfo>,
    #[serde(default)]
    pub target_investors: Vec<TargetInvestor>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDeckRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub startup_info: Option<StartupInfo>,
    pub slides: Option<Vec<Slide>>,
    pub theme: Option<DeckTheme>,
    pub status: Option<DeckStatus>,
    pub target_investors: Option<Vec<TargetInvestor>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateDeckRequest {
    pub startup_info: StartupInfo,
    #[serde(default)]
    pub target_investors: Vec<TargetInvestor>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SuggestionsRequest {
    pub target_investor: Option<TargetInvestor>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomizeDeckRequest {
    pub investor_profile: TargetInvestor,
}

/// List-view projection of a deck.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeckSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: DeckStatus,
    pub slide_count: usize,
    pub stats: DeckStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Deck> for DeckSummary {
    fn from(deck: &Deck) -> Self {
        DeckSummary {
            id: deck.id,
            title: deck.title.clone(),
            description: deck.description.clone(),
            status: deck.status,
            slide_count: deck.slides.len(),
            stats: deck.stats.clone(),
            created_at: deck.created_at,
            updated_at: deck.updated_at,
        }
    }
}

/// Everything the editor needs. Sharing state and view counters are owned
/// by their own endpoints and stay out of this payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeckEditResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub startup_info: StartupInfo,
    pub slides: Vec<Slide>,
    pub template: String,
    pub theme: DeckTheme,
    pub status: DeckStatus,
    pub target_investors: Vec<TargetInvestor>,
    pub tags: Vec<String>,
    pub ai_generated: bool,
    pub ai_prompt: Option<String>,
}

impl From<Deck> for DeckEditResponse {
    fn from(deck: Deck) -> Self {
        DeckEditResponse {
            id: deck.id,
            title: deck.title,
            description: deck.description,
            startup_info: deck.startup_info,
            slides: deck.slides,
            template: deck.template,
            theme: deck.theme,
            status: deck.status,
            target_investors: deck.target_investors,
            tags: deck.tags,
            ai_generated: deck.ai_generated,
            ai_prompt: deck.ai_prompt,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateDeckResponse {
    pub message: String,
    pub deck: DeckEditResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomizeDeckResponse {
    pub message: String,
    pub deck: DeckEditResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeSlideResponse {
    pub slide_index: usize,
    pub feedback: crate::models::deck::AiFeedback,
    pub slide: Slide,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionsResponse {
    pub slide_index: usize,
    pub suggestions: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShareDeckResponse {
    pub share_token: String,
    pub share_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicStartupInfo {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub stage: Option<StartupStage>,
}

/// Viewer-facing projection of a shared deck. Slide content is loaded
/// through the presentation client, not this payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct SharedDeckResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub startup_info: PublicStartupInfo,
    pub slide_count: usize,
    pub theme: DeckTheme,
    pub stats: DeckStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Deck> for SharedDeckResponse {
    fn from(deck: Deck) -> Self {
        SharedDeckResponse {
            id: deck.id,
            title: deck.title,
            description: deck.description,
            startup_info: PublicStartupInfo {
                name: deck.startup_info.name,
                industry: deck.startup_info.industry,
                stage: deck.startup_info.stage,
            },
            slide_count: deck.slides.len(),
            theme: deck.theme,
            stats: deck.stats,
            created_at: deck.created_at,
            updated_at: deck.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Investors
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvestorRequest {
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
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInvestorRequest {
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
    pub status: Option<crate::models::investor::InvestorStatus>,
    pub notes: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
    pub next_follow_up: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicInvestmentCriteria {
    pub preferred_stages: Vec<StartupStage>,
    pub preferred_sectors: Vec<String>,
    pub preferred_geographies: Vec<String>,
    pub investment_thesis: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicCommunicationPreferences {
    pub preferred_format: String,
    pub preferred_length: String,
    pub key_focus_areas: Vec<String>,
}

/// Contact card without the owner's private notes and pipeline fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvestorPublicProfile {
    pub id: Uuid,
    pub name: String,
    pub firm: Option<String>,
    pub title: Option<String>,
    pub investor_type: InvestorType,
    pub location: Location,
    pub bio: Option<String>,
    pub investment_criteria: PublicInvestmentCriteria,
    pub communication_preferences: PublicCommunicationPreferences,
    pub tags: Vec<String>,
}

impl From<&Investor> for InvestorPublicProfile {
    fn from(investor: &Investor) -> Self {
        InvestorPublicProfile {
            id: investor.id,
            name: investor.name.clone(),
            firm: investor.firm.clone(),
            title: investor.title.clone(),
            investor_type: investor.investor_type,
            location: investor.location.clone(),
            bio: investor.bio.clone(),
            investment_criteria: PublicInvestmentCriteria {
                preferred_stages: investor.investment_criteria.preferred_stages.clone(),
                preferred_sectors: investor.investment_criteria.preferred_sectors.clone(),
                preferred_geographies: investor.investment_criteria.preferred_geographies.clone(),
                investment_thesis: investor.investment_criteria.investment_thesis.clone(),
            },
            communication_preferences: PublicCommunicationPreferences {
                preferred_format: investor.communication_preferences.preferred_format.clone(),
                preferred_length: investor.communication_preferences.preferred_length.clone(),
                key_focus_areas: investor.communication_preferences.key_focus_areas.clone(),
            },
            tags: investor.tags.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommunicationStyle {
    pub preferred_format: String,
    pub preferred_length: String,
}

/// Pitch-preparation briefing derived from a saved investor profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvestorInsights {
    pub key_focus_areas: Vec<String>,
    pub deal_breakers: Vec<String>,
    pub questions_to_prepare: Vec<String>,
    pub investment_thesis: Option<String>,
    pub portfolio_companies: Vec<String>,
    pub communication_style: CommunicationStyle,
    pub match_score: u32,
    pub recommendations: Vec<String>,
}

impl From<&Investor> for InvestorInsights {
    fn from(investor: &Investor) -> Self {
        let prefs = &investor.communication_preferences;
        let criteria = &investor.investment_criteria;

        let focus = if prefs.key_focus_areas.is_empty() {
            "traction and team".to_string()
        } else {
            prefs.key_focus_areas.join(", ")
        };
        let highlight = if criteria.preferred_sectors.is_empty() {
            "market opportunity".to_string()
        } else {
            criteria.preferred_sectors.join(", ")
        };

        InvestorInsights {
            key_focus_areas: prefs.key_focus_areas.clone(),
            deal_breakers: prefs.deal_breakers.clone(),
            questions_to_prepare: prefs.questions_to_prepare.clone(),
            investment_thesis: criteria.investment_thesis.clone(),
            portfolio_companies: criteria.portfolio_companies.clone(),
            communication_style: CommunicationStyle {
                preferred_format: prefs.preferred_format.clone(),
                preferred_length: prefs.preferred_length.clone(),
            },
            match_score: 0,
            recommendations: vec![
                format!("Focus on {}", focus),
                format!("Prepare for {} format", prefs.preferred_length),
                format!("Highlight {}", highlight),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationType {
    Tone,
    Content,
    FocusAreas,
    Full,
}

impl CustomizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomizationType::Tone => "tone",
            CustomizationType::Content => "content",
            CustomizationType::FocusAreas => "focus_areas",
            CustomizationType::Full => "full",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomizeForInvestorRequest {
    pub deck_id: Uuid,
    pub customization_type: CustomizationType,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomizeForInvestorResponse {
    pub investor: InvestorPublicProfile,
    pub customized_content: String,
    pub customization_type: CustomizationType,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrackViewRequest {
    pub deck_id: Uuid,
    pub session_id: String,
    pub viewer_id: Option<String>,
    pub viewer_type: Option<ViewerType>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub slide_views: Vec<SlideView>,
    pub referrer: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackViewResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeckRef {
    pub id: Uuid,
    pub title: String,
    pub status: DeckStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeckAnalyticsBody {
    pub total_views: i64,
    pub unique_views: i64,
    /// Minutes, unlike the per-slide figures which stay in seconds.
    pub avg_view_time: f64,
    pub slide_engagement: Vec<SlideEngagement>,
    pub viewer_demographics: ViewerDemographics,
    pub engagement_metrics: EngagementMetrics,
    pub last_viewed: Option<DateTime<Utc>>,
    pub first_viewed: Option<DateTime<Utc>>,
}

impl From<DeckAnalytics> for DeckAnalyticsBody {
    fn from(analytics: DeckAnalytics) -> Self {
        DeckAnalyticsBody {
            total_views: analytics.total_views,
            unique_views: analytics.unique_views,
            avg_view_time: seconds_to_minutes(analytics.avg_view_time),
            slide_engagement: analytics.slide_engagement,
            viewer_demographics: analytics.viewer_demographics,
            engagement_metrics: analytics.engagement_metrics,
            last_viewed: analytics.last_viewed,
            first_viewed: analytics.first_viewed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InteractionSummary {
    pub id: Uuid,
    pub investor_name: Option<String>,
    pub investor_type: InvestorType,
    pub interest_level: InterestLevel,
    pub status: InteractionStatus,
    pub last_interaction: Option<DateTime<Utc>>,
    pub total_interactions: usize,
}

impl From<&InvestorInteraction> for InteractionSummary {
    fn from(interaction: &InvestorInteraction) -> Self {
        InteractionSummary {
            id: interaction.id,
            investor_name: interaction.investor_name.clone(),
            investor_type: interaction.investor_type,
            interest_level: interaction.interest_level,
            status: interaction.status,
            last_interaction: interaction.interactions.last().map(|event| event.timestamp),
            total_interactions: interaction.interactions.len(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeckAnalyticsResponse {
    pub deck: DeckRef,
    pub analytics: DeckAnalyticsBody,
    pub investor_interactions: Vec<InteractionSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordInteractionRequest {
    pub deck_id: Uuid,
    pub investor_id: String,
    pub interaction_type: InteractionKind,
    pub investor_name: Option<String>,
    pub investor_type: InvestorType,
    pub interest_level: Option<InterestLevel>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInteractionRequest {
    pub status: InteractionStatus,
    pub interest_level: Option<InterestLevel>,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InteractionBrief {
    pub id: Uuid,
    pub investor_name: Option<String>,
    pub investor_type: InvestorType,
    pub interest_level: InterestLevel,
    pub status: InteractionStatus,
    pub total_interactions: usize,
}

impl From<&InvestorInteraction> for InteractionBrief {
    fn from(interaction: &InvestorInteraction) -> Self {
        InteractionBrief {
            id: interaction.id,
            investor_name: interaction.investor_name.clone(),
            investor_type: interaction.investor_type,
            interest_level: interaction.interest_level,
            status: interaction.status,
            total_interactions: interaction.interactions.len(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InteractionResponse {
    pub success: bool,
    pub interaction: InteractionBrief,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopDeck {
    pub deck_id: Uuid,
    pub title: String,
    pub views: i64,
    pub unique_views: i64,
    pub avg_view_time: f64,
}

impl From<DeckAnalyticsSummary> for TopDeck {
    fn from(summary: DeckAnalyticsSummary) -> Self {
        TopDeck {
            deck_id: summary.deck_id,
            title: summary.title,
            views: summary.views,
            unique_views: summary.unique_views,
            avg_view_time: seconds_to_minutes(summary.avg_view_time),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentActivityEntry {
    pub deck_id: Uuid,
    pub title: String,
    pub last_viewed: DateTime<Utc>,
    pub views: i64,
}

impl From<RecentActivity> for RecentActivityEntry {
    fn from(activity: RecentActivity) -> Self {
        RecentActivityEntry {
            deck_id: activity.deck_id,
            title: activity.title,
            last_viewed: activity.last_viewed,
            views: activity.views,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub total_views: i64,
    pub total_unique_views: i64,
    pub total_decks: usize,
    pub avg_view_time: f64,
    pub top_decks: Vec<TopDeck>,
    pub recent_activity: Vec<RecentActivityEntry>,
}

impl From<AnalyticsOverview> for OverviewResponse {
    fn from(overview: AnalyticsOverview) -> Self {
        OverviewResponse {
            total_views: overview.total_views,
            total_unique_views: overview.total_unique_views,
            total_decks: overview.total_decks,
            avg_view_time: seconds_to_minutes(overview.avg_view_time),
            top_decks: overview.top_decks.into_iter().map(TopDeck::from).collect(),
            recent_activity: overview
                .recent_activity
                .into_iter()
                .map(RecentActivityEntry::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlideAnalyticsEntry {
    pub slide_index: u32,
    pub title: String,
    pub slide_type: crate::models::deck::SlideType,
    pub views: i64,
    pub avg_time_spent: f64,
    pub drop_off_rate: f64,
    pub interactions: i64,
}

impl From<SlideAnalyticsRow> for SlideAnalyticsEntry {
    fn from(row: SlideAnalyticsRow) -> Self {
        SlideAnalyticsEntry {
            slide_index: row.slide_index,
            title: row.title,
            slide_type: row.slide_type,
            views: row.views,
            avg_time_spent: row.avg_time_spent,
            drop_off_rate: row.drop_off_rate,
            interactions: row.interactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_times_round_to_two_decimal_minutes() {
        assert_eq!(seconds_to_minutes(90.0), 1.5);
        assert_eq!(seconds_to_minutes(100.0), 1.67);
        assert_eq!(seconds_to_minutes(0.0), 0.0);
    }

    #[test]
    fn insights_fall_back_to_generic_advice() {
        let investor = Investor {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Jordan Blake".to_string(),
            firm: None,
            title: None,
            investor_type: InvestorType::Angel,
            email: None,
            linkedin: None,
            website: None,
            location: Location::default(),
            bio: None,
            investment_criteria: InvestmentCriteria::default(),
            communication_preferences: CommunicationPreferences::default(),
            tags: Vec::new(),
            status: crate::models::investor::InvestorStatus::Active,
            notes: None,
            last_contact: None,
            next_follow_up: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let insights = InvestorInsights::from(&investor);
        assert_eq!(insights.recommendations[0], "Focus on traction and team");
        assert_eq!(insights.recommendations[1], "Prepare for standard format");
        assert_eq!(insights.recommendations[2], "Highlight market opportunity");
        assert_eq!(insights.match_score, 0);
    }
}
