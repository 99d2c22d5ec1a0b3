use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::deck::StartupStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvestorType {
    Vc,
    Angel,
    Accelerator,
    Corporate,
    FamilyOffice,
}

impl InvestorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorType::Vc => "vc",
            InvestorType::Angel => "angel",
            InvestorType::Accelerator => "accelerator",
            InvestorType::Corporate => "corporate",
            InvestorType::FamilyOffice => "family_office",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vc" => Some(InvestorType::Vc),
            "angel" => Some(InvestorType::Angel),
            "accelerator" => Some(InvestorType::Accelerator),
            "corporate" => Some(InvestorType::Corporate),
            "family_office" => Some(InvestorType::FamilyOffice),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvestorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvestorStatus {
    Active,
    Inactive,
    Archived,
}

impl InvestorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorStatus::Active => "active",
            InvestorStatus::Inactive => "inactive",
            InvestorStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(InvestorStatus::Active),
            "inactive" => Some(InvestorStatus::Inactive),
            "archived" => Some(InvestorStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvestorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InvestmentCriteria {
    #[serde(default)]
    pub min_investment: Option<f64>,
    #[serde(default)]
    pub max_investment: Option<f64>,
    #[serde(default)]
    pub preferred_stages: Vec<StartupStage>,
    #[serde(default)]
    pub preferred_sectors: Vec<String>,
    #[serde(default)]
    pub preferred_geographies: Vec<String>,
    #[serde(default)]
    pub investment_thesis: Option<String>,
    #[serde(default)]
    pub portfolio_companies: Vec<String>,
    #[serde(default)]
    pub exit_preferences: Vec<String>, // IPO, M&A, etc.
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommunicationPreferences {
    pub preferred_format: String, // "pitch_deck", "executive_summary", "video_pitch", "live_demo"
    pub preferred_length: String, // "brief", "standard", "detailed"
    #[serde(default)]
    pub key_focus_areas: Vec<String>,
    #[serde(default)]
    pub deal_breakers: Vec<String>,
    #[serde(default)]
    pub questions_to_prepare: Vec<String>,
}

impl Default for CommunicationPreferences {
    fn default() -> Self {
        CommunicationPreferences {
            preferred_format: "pitch_deck".to_string(),
            preferred_length: "standard".to_string(),
            key_focus_areas: Vec::new(),
            deal_breakers: Vec::new(),
            questions_to_prepare: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Investor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub firm: Option<String>,
    pub title: Option<String>,
    pub investor_type: InvestorType,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub location: Location,
    pub bio: Option<String>,
    #[serde(default)]
    pub investment_criteria: InvestmentCriteria,
    #[serde(default)]
    pub communication_preferences: CommunicationPreferences,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: InvestorStatus,
    pub notes: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
    pub next_follow_up: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Search filters for the matcher. Every supplied field both narrows the
/// candidate set and contributes its weight to the score.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MatchCriteria {
    #[serde(default)]
    pub stage: Option<StartupStage>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub geography: Option<String>,
    #[serde(default)]
    pub funding_amount: Option<f64>,
    #[serde(default)]
    pub investor_type: Option<InvestorType>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvestorMatch {
    #[serde(flatten)]
    pub investor: Investor,
    pub match_score: u32,
}

/// Built-in investor persona, served by the templates endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvestorPersona {
    pub id: &'static str,
    pub name: &'static str,
    pub investor_type: InvestorType,
    pub description: &'static str,
    pub investment_criteria: InvestmentCriteria,
    pub communication_preferences: CommunicationPreferences,
}
