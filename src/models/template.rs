use serde::Serialize;
use utoipa::ToSchema;

/// Built-in deck layout served by the templates endpoints. Slide names are
/// loose strings: templates may carry composites ("business-model") that are
/// split into typed slides only when a deck is built from them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeckTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub slides: &'static [&'static str],
}

pub const DECK_TEMPLATES: &[DeckTemplate] = &[
    DeckTemplate {
        id: "default",
        name: "Default Template",
        description: "Standard pitch deck template",
        category: "general",
        slides: &[
            "problem",
            "solution",
            "market",
            "traction",
            "team",
            "financials",
            "ask",
        ],
    },
    DeckTemplate {
        id: "saas",
        name: "SaaS Template",
        description: "Optimized for SaaS companies",
        category: "saas",
        slides: &[
            "problem",
            "solution",
            "market",
            "traction",
            "business-model",
            "team",
            "financials",
            "ask",
        ],
    },
    DeckTemplate {
        id: "fintech",
        name: "Fintech Template",
        description: "Designed for fintech startups",
        category: "fintech",
        slides: &[
            "problem",
            "solution",
            "market",
            "traction",
            "business-model",
            "team",
            "financials",
            "ask",
        ],
    },
];

pub fn find_template(id: &str) -> Option<&'static DeckTemplate> {
    DECK_TEMPLATES.iter().find(|t| t.id == id)
}
