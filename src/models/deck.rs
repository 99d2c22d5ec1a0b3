use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::investor::InvestorType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeckStatus {
    Draft,
    Review,
    Published,
    Archived,
}

impl DeckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeckStatus::Draft => "draft",
            DeckStatus::Review => "review",
            DeckStatus::Published => "published",
            DeckStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(DeckStatus::Draft),
            "review" => Some(DeckStatus::Review),
            "published" => Some(DeckStatus::Published),
            "archived" => Some(DeckStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StartupStage {
    Idea,
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
}

impl StartupStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            StartupStage::Idea => "idea",
            StartupStage::PreSeed => "pre-seed",
            StartupStage::Seed => "seed",
            StartupStage::SeriesA => "series-a",
            StartupStage::SeriesB => "series-b",
            StartupStage::SeriesC => "series-c",
        }
    }
}

impl std::fmt::Display for StartupStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    Problem,
    Solution,
    Market,
    Traction,
    Team,
    Financials,
    Ask,
    Custom,
}

impl SlideType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideType::Problem => "problem",
            SlideType::Solution => "solution",
            SlideType::Market => "market",
            SlideType::Traction => "traction",
            SlideType::Team => "team",
            SlideType::Financials => "financials",
            SlideType::Ask => "ask",
            SlideType::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "problem" => Some(SlideType::Problem),
            "solution" => Some(SlideType::Solution),
            "market" => Some(SlideType::Market),
            "traction" => Some(SlideType::Traction),
            "team" => Some(SlideType::Team),
            "financials" => Some(SlideType::Financials),
            "ask" => Some(SlideType::Ask),
            "custom" => Some(SlideType::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for SlideType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slide body: the known presentation fields plus whatever extra keys an
/// editor or the generator attaches (charts, image refs, speaker notes).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SlideContent {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub visual_description: Option<String>,
    #[serde(default)]
    pub call_to_action: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiFeedback {
    pub clarity: u8,        // 1-10
    pub persuasiveness: u8, // 1-10
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Slide {
    pub slide_type: SlideType,
    pub title: String,
    #[serde(default)]
    pub content: SlideContent,
    pub order: u32,
    #[serde(default)]
    pub ai_feedback: Option<AiFeedback>,
    /// Investor-type keyed customized copy, written by the customize flow.
    #[serde(default)]
    pub customizations: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Financials {
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub growth: Option<f64>,
    #[serde(default)]
    pub burn_rate: Option<f64>,
    #[serde(default)]
    pub runway: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StartupInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub stage: Option<StartupStage>,
    #[serde(default)]
    pub funding_goal: Option<f64>,
    #[serde(default)]
    pub current_funding: Option<f64>,
    #[serde(default)]
    pub team_size: Option<u32>,
    #[serde(default)]
    pub founded_year: Option<i32>,
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub market_size: Option<String>,
    #[serde(default)]
    pub traction: Option<String>,
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default)]
    pub business_model: Option<String>,
    #[serde(default)]
    pub financials: Option<Financials>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeckTheme {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
}

impl Default for DeckTheme {
    fn default() -> Self {
        DeckTheme {
            primary_color: "#3B82F6".to_string(),
            secondary_color: "#1F2937".to_string(),
            font_family: "Inter".to_string(),
        }
    }
}

/// Quick counters embedded on the deck itself. The shared-link view bumps
/// these directly; the full per-event numbers live in DeckAnalytics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeckStats {
    pub views: i64,
    pub unique_views: i64,
    pub avg_view_time: f64,
    #[serde(default)]
    pub last_viewed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TargetInvestor {
    pub investor_type: InvestorType,
    #[serde(default)]
    pub focus: Vec<String>,
    #[serde(default)]
    pub stage: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Collaborator {
    pub user_id: Uuid,
    pub role: String, // "viewer", "editor", "admin"
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Deck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub startup_info: StartupInfo,
    #[serde(default)]
    pub slides: Vec<Slide>,
    pub template: String,
    #[serde(default)]
    pub theme: DeckTheme,
    pub status: DeckStatus,
    pub is_public: bool,
    pub share_token: Option<String>,
    #[serde(default)]
    pub stats: DeckStats,
    pub ai_generated: bool,
    pub ai_prompt: Option<String>,
    #[serde(default)]
    pub target_investors: Vec<TargetInvestor>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(user_id: Uuid, title: String) -> Self {
        let now = Utc::now();
        Deck {
            id: Uuid::new_v4(),
            user_id,
            title,
            description: None,
            startup_info: StartupInfo::default(),
            slides: Vec::new(),
            template: "default".to_string(),
            theme: DeckTheme::default(),
            status: DeckStatus::Draft,
            is_public: false,
            share_token: None,
            stats: DeckStats::default(),
            ai_generated: false,
            ai_prompt: None,
            target_investors: Vec::new(),
            tags: Vec::new(),
            collaborators: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
