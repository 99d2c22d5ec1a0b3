use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::investor::{InvestorType, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewerType {
    Anonymous,
    User,
    Investor,
}

impl ViewerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerType::Anonymous => "anonymous",
            ViewerType::User => "user",
            ViewerType::Investor => "investor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "anonymous" => Some(ViewerType::Anonymous),
            "user" => Some(ViewerType::User),
            "investor" => Some(ViewerType::Investor),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single in-slide interaction ('click', 'scroll', 'hover', ...).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlideInteraction {
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub element: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlideView {
    pub slide_index: u32,
    /// Cumulative seconds the viewer spent on this slide.
    #[serde(default)]
    pub time_spent: f64,
    #[serde(default)]
    pub interactions: Vec<SlideInteraction>,
}

/// One viewer session on one deck. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ViewEvent {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub viewer_id: String,
    pub viewer_type: ViewerType,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    /// Total session duration in seconds.
    pub duration: f64,
    #[serde(default)]
    pub slide_views: Vec<SlideView>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub referrer: Option<String>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlideEngagement {
    pub slide_index: u32,
    pub views: i64,
    pub avg_time_spent: f64,
    /// Reserved: share of viewers who left after this slide. Always 0.
    pub drop_off_rate: f64,
    pub interactions: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CountryCount {
    pub country: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceCount {
    pub device: String, // "desktop", "mobile", "tablet"
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BrowserCount {
    pub browser: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ViewerDemographics {
    #[serde(default)]
    pub countries: Vec<CountryCount>,
    #[serde(default)]
    pub devices: Vec<DeviceCount>,
    #[serde(default)]
    pub browsers: Vec<BrowserCount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EngagementMetrics {
    pub bounce_rate: f64,
    pub avg_session_duration: f64,
    pub pages_per_session: f64,
    pub return_visitors: i64,
}

/// Derived per-deck rollup. One row per deck, rebuilt from the deck's view
/// events on every read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeckAnalytics {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub total_views: i64,
    pub unique_views: i64,
    pub total_view_time: f64,
    pub avg_view_time: f64,
    #[serde(default)]
    pub slide_engagement: Vec<SlideEngagement>,
    #[serde(default)]
    pub viewer_demographics: ViewerDemographics,
    #[serde(default)]
    pub engagement_metrics: EngagementMetrics,
    pub first_viewed: Option<DateTime<Utc>>,
    pub last_viewed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeckAnalytics {
    pub fn new(deck_id: Uuid) -> Self {
        let now = Utc::now();
        DeckAnalytics {
            id: Uuid::new_v4(),
            deck_id,
            total_views: 0,
            unique_views: 0,
            total_view_time: 0.0,
            avg_view_time: 0.0,
            slide_engagement: Vec::new(),
            viewer_demographics: ViewerDemographics::default(),
            engagement_metrics: EngagementMetrics::default(),
            first_viewed: None,
            last_viewed: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Download,
    Share,
    Contact,
    FollowUp,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Download => "download",
            InteractionKind::Share => "share",
            InteractionKind::Contact => "contact",
            InteractionKind::FollowUp => "follow_up",
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InterestLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl InterestLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestLevel::High => "high",
            InterestLevel::Medium => "medium",
            InterestLevel::Low => "low",
            InterestLevel::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(InterestLevel::High),
            "medium" => Some(InterestLevel::Medium),
            "low" => Some(InterestLevel::Low),
            "unknown" => Some(InterestLevel::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for InterestLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InteractionStatus {
    Pending,
    Contacted,
    MeetingScheduled,
    Passed,
    Invested,
}

impl InteractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionStatus::Pending => "pending",
            InteractionStatus::Contacted => "contacted",
            InteractionStatus::MeetingScheduled => "meeting_scheduled",
            InteractionStatus::Passed => "passed",
            InteractionStatus::Invested => "invested",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InteractionStatus::Pending),
            "contacted" => Some(InteractionStatus::Contacted),
            "meeting_scheduled" => Some(InteractionStatus::MeetingScheduled),
            "passed" => Some(InteractionStatus::Passed),
            "invested" => Some(InteractionStatus::Invested),
            _ => None,
        }
    }
}

impl std::fmt::Display for InteractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvestorInteractionEvent {
    pub kind: InteractionKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

/// Running relationship record for one (deck, investor) pair. The event
/// list only ever grows; interest, notes and status are last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvestorInteraction {
    pub id: Uuid,
    pub deck_id: Uuid,
    /// Free-form identifier supplied by the caller, not a profile reference.
    pub investor_id: String,
    pub investor_name: Option<String>,
    pub investor_type: InvestorType,
    #[serde(default)]
    pub interactions: Vec<InvestorInteractionEvent>,
    pub interest_level: InterestLevel,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub status: InteractionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvestorInteraction {
    pub fn new(deck_id: Uuid, investor_id: String, investor_type: InvestorType) -> Self {
        let now = Utc::now();
        InvestorInteraction {
            id: Uuid::new_v4(),
            deck_id,
            investor_id,
            investor_name: None,
            investor_type,
            interactions: Vec::new(),
            interest_level: InterestLevel::Unknown,
            notes: None,
            follow_up_date: None,
            status: InteractionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
