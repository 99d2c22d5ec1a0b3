use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::errors::{AppError, Result};
use crate::models::deck::{AiFeedback, Slide, SlideContent, SlideType, StartupInfo, TargetInvestor};

/// Chat-completion backend. The HTTP client implements this for the real
/// API; tests swap in scripted generators.
#[axum::async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String>;
}

pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::ConfigError("OPENAI_API_KEY must be set".to_string()))?;
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
            client: reqwest::Client::new(),
        })
    }
}

#[axum::async_trait]
impl ContentGenerator for OpenAiClient {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::AiError(format!(
                "Completion API returned status {}",
                response.status()
            )));
        }

        let payload = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::AiError(format!("Failed to parse completion response: {}", e)))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::AiError("Completion response had no content".to_string()))
    }
}

/// Slide as the model returns it. The type comes back as a free string and
/// is mapped onto the known slide types afterwards.
#[derive(Debug, Deserialize)]
struct GeneratedSlide {
    slide_type: String,
    title: String,
    #[serde(default)]
    content: SlideContent,
}

const CONSULTANT_SYSTEM: &str = "You are a pitch deck consultant who has reviewed thousands of \
    decks for top accelerators and venture funds. Produce concise, investor-ready content.";

pub struct AiService {
    generator: Arc<dyn ContentGenerator>,
}

impl AiService {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            generator: Arc::new(OpenAiClient::from_env()?),
        })
    }

    pub fn with_generator(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    /// Generate a full slide set for a startup. A failed completion call is
    /// an error; a completion that comes back unparseable degrades to the
    /// two-slide skeleton so the caller still gets a usable deck.
    pub async fn generate_pitch_deck(
        &self,
        startup_info: &StartupInfo,
        target_investors: &[TargetInvestor],
    ) -> Result<Vec<Slide>> {
        let prompt = build_generation_prompt(startup_info, target_investors);
        let raw = self.generator.generate(CONSULTANT_SYSTEM, &prompt, 0.7, 4000).await?;

        match parse_generated_slides(&raw) {
            Some(slides) => Ok(slides),
            None => {
                tracing::warn!(action = "generate_pitch_deck", "unparseable completion, using fallback slides");
                Ok(fallback_slides())
            }
        }
    }

    /// Score a single slide. Any failure degrades to neutral feedback.
    pub async fn analyze_slide(&self, content: &SlideContent, slide_type: SlideType) -> AiFeedback {
        match self.try_analyze_slide(content, slide_type).await {
            Ok(feedback) => feedback,
            Err(e) => {
                tracing::warn!(action = "analyze_slide", error = %e, "analysis failed, using fallback feedback");
                AiFeedback {
                    clarity: 6,
                    persuasiveness: 6,
                    suggestions: vec!["Review content for clarity".to_string()],
                    tone: Some("professional".to_string()),
                }
            }
        }
    }

    async fn try_analyze_slide(
        &self,
        content: &SlideContent,
        slide_type: SlideType,
    ) -> Result<AiFeedback> {
        let prompt = format!(
            "Review this pitch deck slide and score it.\n\n\
             Slide type: {}\n\
             Content: {}\n\n\
             Reply with a JSON object only:\n\
             {{\n\
               \"clarity\": <1-10>,\n\
               \"persuasiveness\": <1-10>,\n\
               \"suggestions\": [\"...\"],\n\
               \"tone\": \"professional|casual|confident|humble\"\n\
             }}",
            slide_type,
            serde_json::to_string(content)?,
        );

        let raw = self.generator.generate(CONSULTANT_SYSTEM, &prompt, 0.3, 1000).await?;
        let feedback: AiFeedback = serde_json::from_str(raw.trim())?;
        Ok(feedback)
    }

    /// Rewrite slide content for one investor profile. On failure the
    /// original content is returned unchanged, serialized.
    pub async fn customize_for_investor(
        &self,
        content: &SlideContent,
        profile: &TargetInvestor,
    ) -> String {
        let original = serde_json::to_string(content).unwrap_or_default();
        let prompt = format!(
            "Tailor this pitch deck content for one specific investor.\n\n\
             Investor type: {}\n\
             Focus areas: {}\n\
             Investment stages: {}\n\
             Location: {}\n\n\
             Original content: {}\n\n\
             Rewrite the content to put the aspects this investor cares about first.",
            profile.investor_type,
            profile.focus.join(", "),
            profile.stage.join(", "),
            profile.location.as_deref().unwrap_or("unspecified"),
            original,
        );

        match self.generator.generate(CONSULTANT_SYSTEM, &prompt, 0.5, 2000).await {
            Ok(customized) => customized,
            Err(e) => {
                tracing::warn!(action = "customize_for_investor", error = %e, "customization failed, keeping original content");
                original
            }
        }
    }

    /// Rewrite a whole deck for one investor profile. The customization
    /// focus narrows what the model is asked to change. On failure the
    /// deck's current content is returned serialized, unchanged.
    pub async fn customize_deck_for_investor(
        &self,
        deck: &crate::models::deck::Deck,
        profile: &TargetInvestor,
        customization_focus: &str,
    ) -> String {
        let original = serde_json::to_string(&json!({
            "title": deck.title,
            "startup_info": deck.startup_info,
            "slides": deck.slides,
        }))
        .unwrap_or_default();

        let prompt = format!(
            "Tailor this pitch deck for one specific investor.\n\n\
             Investor type: {}\n\
             Focus areas: {}\n\
             Investment stages: {}\n\
             Location: {}\n\
             Customization focus: {}\n\n\
             Deck: {}\n\n\
             Rewrite the deck content, adjusting only what the customization focus asks for.",
            profile.investor_type,
            profile.focus.join(", "),
            profile.stage.join(", "),
            profile.location.as_deref().unwrap_or("unspecified"),
            customization_focus,
            original,
        );

        match self.generator.generate(CONSULTANT_SYSTEM, &prompt, 0.5, 2000).await {
            Ok(customized) => customized,
            Err(e) => {
                tracing::warn!(action = "customize_deck_for_investor", error = %e, "customization failed, keeping original content");
                original
            }
        }
    }

    /// Free-form improvement advice for one slide. Degrades to a canned
    /// suggestion when the completion call fails.
    pub async fn suggest_improvements(
        &self,
        content: &SlideContent,
        slide_type: SlideType,
        target_investor: Option<&TargetInvestor>,
    ) -> String {
        let mut prompt = format!(
            "Suggest improvements for this pitch deck slide.\n\n\
             Slide type: {}\n\
             Content: {}\n",
            slide_type,
            serde_json::to_string(content).unwrap_or_default(),
        );

        if let Some(investor) = target_investor {
            prompt.push_str(&format!(
                "Target investor: {} focused on {}\n",
                investor.investor_type,
                investor.focus.join(", "),
            ));
        }

        prompt.push_str("\nGive specific, actionable suggestions to improve clarity, persuasiveness and impact.");

        match self.generator.generate(CONSULTANT_SYSTEM, &prompt, 0.4, 1500).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::warn!(action = "suggest_improvements", error = %e, "suggestion call failed, using fallback");
                "Review content for clarity and impact. Consider adding more specific data and metrics."
                    .to_string()
            }
        }
    }
}

fn build_generation_prompt(startup_info: &StartupInfo, target_investors: &[TargetInvestor]) -> String {
    let investor_context = if target_investors.is_empty() {
        "General investor audience".to_string()
    } else {
        let described: Vec<String> = target_investors
            .iter()
            .map(|inv| format!("{} focused on {}", inv.investor_type, inv.focus.join(", ")))
            .collect();
        format!("Target investors: {}", described.join(", "))
    };

    let financials = startup_info.financials.clone().unwrap_or_default();

    format!(
        "Generate a complete pitch deck for the following startup:\n\n\
         Startup name: {}\n\
         Industry: {}\n\
         Stage: {}\n\
         Funding goal: ${}\n\
         Current funding: ${}\n\
         Team size: {}\n\
         Founded: {}\n\n\
         Problem: {}\n\
         Solution: {}\n\
         Market size: {}\n\
         Traction: {}\n\
         Competitors: {}\n\
         Business model: {}\n\n\
         Financials:\n\
         - Revenue: ${}\n\
         - Growth: {}%\n\
         - Burn rate: ${}/month\n\
         - Runway: {} months\n\n\
         {}\n\n\
         Produce slides for: problem, solution, market, traction, business model, team, \
         financials and the ask.\n\n\
         Reply with a JSON array only. Each element:\n\
         {{\n\
           \"slide_type\": \"problem|solution|market|traction|team|financials|ask|custom\",\n\
           \"title\": \"...\",\n\
           \"content\": {{\n\
             \"headline\": \"...\",\n\
             \"key_points\": [\"...\"],\n\
             \"visual_description\": \"...\",\n\
             \"call_to_action\": \"...\"\n\
           }}\n\
         }}\n\n\
         Make the content compelling, data-driven and tailored to the startup's stage and audience.",
        startup_info.name.as_deref().unwrap_or("TBD"),
        startup_info.industry.as_deref().unwrap_or("TBD"),
        startup_info.stage.map(|s| s.to_string()).unwrap_or_else(|| "TBD".to_string()),
        startup_info.funding_goal.map(|v| v.to_string()).unwrap_or_else(|| "TBD".to_string()),
        startup_info.current_funding.map(|v| v.to_string()).unwrap_or_else(|| "0".to_string()),
        startup_info.team_size.map(|v| v.to_string()).unwrap_or_else(|| "TBD".to_string()),
        startup_info.founded_year.map(|v| v.to_string()).unwrap_or_else(|| "TBD".to_string()),
        startup_info.problem.as_deref().unwrap_or("TBD"),
        startup_info.solution.as_deref().unwrap_or("TBD"),
        startup_info.market_size.as_deref().unwrap_or("TBD"),
        startup_info.traction.as_deref().unwrap_or("TBD"),
        if startup_info.competitors.is_empty() {
            "None specified".to_string()
        } else {
            startup_info.competitors.join(", ")
        },
        startup_info.business_model.as_deref().unwrap_or("TBD"),
        financials.revenue.unwrap_or(0.0),
        financials.growth.unwrap_or(0.0),
        financials.burn_rate.unwrap_or(0.0),
        financials.runway.unwrap_or(0.0),
        investor_context,
    )
}

/// Pull the first JSON array out of the completion text and map it onto
/// typed slides. Unknown slide types become custom slides rather than
/// discarding the model's work.
fn parse_generated_slides(raw: &str) -> Option<Vec<Slide>> {
    let array_regex = Regex::new(r"(?s)\[.*\]").ok()?;
    let json_text = array_regex.find(raw)?.as_str();
    let generated: Vec<GeneratedSlide> = serde_json::from_str(json_text).ok()?;

    if generated.is_empty() {
        return None;
    }

    let slides = generated
        .into_iter()
        .enumerate()
        .map(|(index, slide)| Slide {
            slide_type: SlideType::parse(&slide.slide_type).unwrap_or(SlideType::Custom),
            title: slide.title,
            content: slide.content,
            order: index as u32 + 1,
            ai_feedback: Some(AiFeedback {
                clarity: 8,
                persuasiveness: 8,
                suggestions: Vec::new(),
                tone: Some("professional".to_string()),
            }),
            customizations: Default::default(),
        })
        .collect();

    Some(slides)
}

fn fallback_slides() -> Vec<Slide> {
    let neutral_feedback = AiFeedback {
        clarity: 7,
        persuasiveness: 7,
        suggestions: Vec::new(),
        tone: Some("professional".to_string()),
    };

    vec![
        Slide {
            slide_type: SlideType::Problem,
            title: "The Problem".to_string(),
            content: SlideContent {
                headline: Some("What problem are you solving?".to_string()),
                key_points: vec![
                    "Define the problem clearly".to_string(),
                    "Show market pain points".to_string(),
                    "Quantify the opportunity".to_string(),
                ],
                visual_description: Some("Problem statement with supporting data".to_string()),
                call_to_action: Some("Clearly articulate the problem".to_string()),
                extra: Default::default(),
            },
            order: 1,
            ai_feedback: Some(neutral_feedback.clone()),
            customizations: Default::default(),
        },
        Slide {
            slide_type: SlideType::Solution,
            title: "Our Solution".to_string(),
            content: SlideContent {
                headline: Some("How do you solve it?".to_string()),
                key_points: vec![
                    "Your unique approach".to_string(),
                    "Key differentiators".to_string(),
                    "Product/market fit".to_string(),
                ],
                visual_description: Some("Solution overview with key features".to_string()),
                call_to_action: Some("Demonstrate your solution".to_string()),
                extra: Default::default(),
            },
            order: 2,
            ai_feedback: Some(neutral_feedback),
            customizations: Default::default(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::investor::InvestorType;

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

    fn scripted(response: &str) -> AiService {
        AiService::with_generator(Arc::new(Scripted(response.to_string())))
    }

    #[tokio::test]
    async fn generated_slides_are_typed_and_ordered() {
        let response = r#"Here is your deck:
        [
            {"slide_type": "problem", "title": "P", "content": {"headline": "h"}},
            {"slide_type": "business_model", "title": "BM", "content": {}}
        ]"#;
        let ai = scripted(response);

        let slides = ai
            .generate_pitch_deck(&StartupInfo::default(), &[])
            .await
            .unwrap();

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].slide_type, SlideType::Problem);
        assert_eq!(slides[0].order, 1);
        // unrecognized type lands as a custom slide instead of being dropped
        assert_eq!(slides[1].slide_type, SlideType::Custom);
        assert_eq!(slides[1].order, 2);
    }

    #[tokio::test]
    async fn unparseable_completion_degrades_to_fallback_deck() {
        let ai = scripted("I cannot produce JSON today.");

        let slides = ai
            .generate_pitch_deck(&StartupInfo::default(), &[])
            .await
            .unwrap();

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].slide_type, SlideType::Problem);
        assert_eq!(slides[1].slide_type, SlideType::Solution);
    }

    #[tokio::test]
    async fn failed_backend_is_an_error_for_generation() {
        let ai = AiService::with_generator(Arc::new(Failing));

        let result = ai.generate_pitch_deck(&StartupInfo::default(), &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn analysis_falls_back_to_neutral_feedback() {
        let ai = scripted("not json");

        let feedback = ai.analyze_slide(&SlideContent::default(), SlideType::Team).await;

        assert_eq!(feedback.clarity, 6);
        assert_eq!(feedback.suggestions, vec!["Review content for clarity".to_string()]);
    }

    #[tokio::test]
    async fn analysis_parses_well_formed_feedback() {
        let ai = scripted(r#"{"clarity": 9, "persuasiveness": 4, "suggestions": ["tighten"], "tone": "confident"}"#);

        let feedback = ai.analyze_slide(&SlideContent::default(), SlideType::Ask).await;

        assert_eq!(feedback.clarity, 9);
        assert_eq!(feedback.persuasiveness, 4);
        assert_eq!(feedback.tone.as_deref(), Some("confident"));
    }

    #[tokio::test]
    async fn customization_returns_original_content_on_failure() {
        let ai = AiService::with_generator(Arc::new(Failing));
        let content = SlideContent {
            headline: Some("keep me".to_string()),
            ..Default::default()
        };
        let profile = TargetInvestor {
            investor_type: InvestorType::Vc,
            focus: vec!["SaaS".to_string()],
            stage: vec!["seed".to_string()],
            location: None,
        };

        let customized = ai.customize_for_investor(&content, &profile).await;
        assert!(customized.contains("keep me"));
    }

    #[tokio::test]
    async fn suggestions_fall_back_to_canned_advice() {
        let ai = AiService::with_generator(Arc::new(Failing));

        let advice = ai
            .suggest_improvements(&SlideContent::default(), SlideType::Market, None)
            .await;

        assert!(advice.contains("Review content for clarity and impact"));
    }
}
