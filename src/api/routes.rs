use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::types::*;
use crate::database::sqlite::{SqliteDatabase, GLOBAL_DB};
use crate::errors::{AppError, Result};
use crate::models::investor::{Investor, InvestorMatch, InvestorPersona, MatchCriteria};
use crate::models::template::{find_template, DeckTemplate, DECK_TEMPLATES};
use crate::models::user::{UserPreferences, UserResponse};
use crate::services::ai_service::AiService;
use crate::services::analytics_service::{
    AnalyticsService, InteractionStatusUpdate, RecordInteractionInput, TrackViewInput,
};
use crate::services::auth::{AuthService, RegisterInput};
use crate::services::deck_service::{CreateDeckInput, DeckService, DeckUpdate};
use crate::services::investor_service::{CreateInvestorInput, InvestorService, InvestorUpdate};
use crate::services::jwt::AuthenticatedUser;
use crate::services::user_service::{
    NotificationUpdate, PreferencesUpdate, ProfileUpdate, UserService,
};

/// Extractor for Bearer token from Authorization header
pub struct AuthBearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthBearer
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.headers.get("Authorization") {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    return Ok(AuthBearer(token.to_string()));
                }
            }
        }
        Err((
            StatusCode::UNAUTHORIZED,
            "Missing or invalid Authorization header".to_string(),
        ))
    }
}

fn db() -> Result<Arc<SqliteDatabase>> {
    GLOBAL_DB
        .get()
        .cloned()
        .ok_or_else(|| AppError::InternalError("Database is not initialized".to_string()))
}

async fn authenticate(token: &str) -> Result<AuthenticatedUser> {
    AuthService::new(db()?).validate_token(token).await
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[utoipa::path(post, path = "/api/auth/register", request_body = RegisterRequest, responses((status = 201, body = AuthResponse)), tag = "Auth")]
pub async fn register(
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth_service = AuthService::new(db()?);
    let (user, token) = auth_service
        .register(RegisterInput {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            company_name: req.company_name,
            role: req.role,
        })
        .await?;
    info!(action = "register_success", user_id = %user.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[utoipa::path(post, path = "/api/auth/login", request_body = LoginRequest, responses((status = 200, body = AuthResponse)), tag = "Auth")]
pub async fn login(Json(req): Json<LoginRequest>) -> Result<Json<AuthResponse>> {
    let auth_service = AuthService::new(db()?);
    let (user, token) = auth_service.login(&req.email, &req.password).await?;
    info!(action = "login_success", user_id = %user.id);
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(post, path = "/api/auth/logout", responses((status = 200, body = LogoutResponse)), tag = "Auth")]
pub async fn logout(AuthBearer(token): AuthBearer) -> Result<Json<LogoutResponse>> {
    let auth_service = AuthService::new(db()?);
    auth_service.logout(&token).await?;
    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

#[utoipa::path(get, path = "/api/auth/me", responses((status = 200, body = UserResponse)), tag = "Auth")]
pub async fn me(AuthBearer(token): AuthBearer) -> Result<Json<UserResponse>> {
    let user = authenticate(&token).await?;
    let profile = UserService::new(db()?).get_profile(&user.user_id).await?;
    Ok(Json(profile))
}

pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[utoipa::path(get, path = "/api/users/profile", responses((status = 200, body = UserResponse)), tag = "Users")]
pub async fn get_profile(AuthBearer(token): AuthBearer) -> Result<Json<UserResponse>> {
    let user = authenticate(&token).await?;
    let profile = UserService::new(db()?).get_profile(&user.user_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(put, path = "/api/users/profile", request_body = UpdateProfileRequest, responses((status = 200, body = UserResponse)), tag = "Users")]
pub async fn update_profile(
    AuthBearer(token): AuthBearer,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    let user = authenticate(&token).await?;
    let user_service = UserService::new(db()?);
    let profile = user_service
        .update_profile(
            &user.user_id,
            ProfileUpdate {
                first_name: req.first_name,
                last_name: req.last_name,
                company_name: req.company_name,
                role: req.role,
            },
        )
        .await?;
    Ok(Json(profile))
}

#[utoipa::path(get, path = "/api/users/preferences", responses((status = 200, body = UserPreferences)), tag = "Users")]
pub async fn get_preferences(AuthBearer(token): AuthBearer) -> Result<Json<UserPreferences>> {
    let user = authenticate(&token).await?;
    let preferences = UserService::new(db()?).get_preferences(&user.user_id).await?;
    Ok(Json(preferences))
}

#[utoipa::path(put, path = "/api/users/preferences", request_body = UpdatePreferencesRequest, responses((status = 200, body = UserPreferences)), tag = "Users")]
pub async fn update_preferences(
    AuthBearer(token): AuthBearer,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Json<UserPreferences>> {
    let user = authenticate(&token).await?;
    let user_service = UserService::new(db()?);
    let preferences = user_service
        .update_preferences(
            &user.user_id,
            PreferencesUpdate {
                theme: req.theme,
                notifications: req.notifications.map(|n| NotificationUpdate {
                    email: n.email,
                    push: n.push,
                }),
            },
        )
        .await?;
    Ok(Json(preferences))
}

pub fn users_router() -> Router {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile", put(update_profile))
        .route("/preferences", get(get_preferences))
        .route("/preferences", put(update_preferences))
}

// ---------------------------------------------------------------------------
// Decks
// ---------------------------------------------------------------------------

#[utoipa::path(get, path = "/api/decks", responses((status = 200, body = [DeckSummary])), tag = "Decks")]
pub async fn list_decks(AuthBearer(token): AuthBearer) -> Result<Json<Vec<DeckSummary>>> {
    let user = authenticate(&token).await?;
    let decks = DeckService::new(db()?).list(&user.user_id).await?;
    Ok(Json(decks.iter().map(DeckSummary::from).collect()))
}

#[utoipa::path(post, path = "/api/decks", request_body = CreateDeckRequest, responses((status = 201, body = DeckEditResponse)), tag = "Decks")]
pub async fn create_deck(
    AuthBearer(token): AuthBearer,
    Json(req): Json<CreateDeckRequest>,
) -> Result<(StatusCode, Json<DeckEditResponse>)> {
    let user = authenticate(&token).await?;
    let deck_service = DeckService::new(db()?);
    let deck = deck_service
        .create(
            &user.user_id,
            CreateDeckInput {
                title: req.title,
                description: req.description,
                startup_info: req.startup_info,
                target_investors: req.target_investors,
                tags: req.tags,
            },
        )
        .await?;
    info!(action = "deck_created", deck_id = %deck.id, user_id = %user.user_id);
    Ok((StatusCode::CREATED, Json(deck.into())))
}

#[utoipa::path(get, path = "/api/decks/{id}", responses((status = 200, body = DeckEditResponse)), tag = "Decks")]
pub async fn get_deck(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckEditResponse>> {
    let user = authenticate(&token).await?;
    let deck = DeckService::new(db()?).get(&user.user_id, &deck_id).await?;
    Ok(Json(deck.into()))
}

#[utoipa::path(put, path = "/api/decks/{id}", request_body = UpdateDeckRequest, responses((status = 200, body = DeckEditResponse)), tag = "Decks")]
pub async fn update_deck(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<UpdateDeckRequest>,
) -> Result<Json<DeckEditResponse>> {
    let user = authenticate(&token).await?;
    let deck_service = DeckService::new(db()?);
    let deck = deck_service
        .update(
            &user.user_id,
            &deck_id,
            DeckUpdate {
                title: req.title,
                description: req.description,
                startup_info: req.startup_info,
                slides: req.slides,
                theme: req.theme,
                status: req.status,
                target_investors: req.target_investors,
                tags: req.tags,
            },
        )
        .await?;
    Ok(Json(deck.into()))
}

#[utoipa::path(delete, path = "/api/decks/{id}", responses((status = 200, body = MessageResponse)), tag = "Decks")]
pub async fn delete_deck(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let user = authenticate(&token).await?;
    DeckService::new(db()?).delete(&user.user_id, &deck_id).await?;
    info!(action = "deck_deleted", deck_id = %deck_id, user_id = %user.user_id);
    Ok(Json(MessageResponse {
        message: "Deck deleted successfully".to_string(),
    }))
}

#[utoipa::path(post, path = "/api/decks/{id}/generate", request_body = GenerateDeckRequest, responses((status = 200, body = GenerateDeckResponse)), tag = "Decks")]
pub async fn generate_deck(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<GenerateDeckRequest>,
) -> Result<Json<GenerateDeckResponse>> {
    let user = authenticate(&token).await?;
    let ai = AiService::from_env()?;
    let deck_service = DeckService::new(db()?);
    let deck = deck_service
        .generate(
            &user.user_id,
            &deck_id,
            req.startup_info,
            req.target_investors,
            &ai,
        )
        .await?;
    info!(action = "deck_generated", deck_id = %deck.id, user_id = %user.user_id);
    Ok(Json(GenerateDeckResponse {
        message: "Deck generated successfully".to_string(),
        deck: deck.into(),
    }))
}

#[utoipa::path(post, path = "/api/decks/{id}/slides/{index}/analyze", responses((status = 200, body = AnalyzeSlideResponse)), tag = "Decks")]
pub async fn analyze_slide(
    AuthBearer(token): AuthBearer,
    Path((deck_id, slide_index)): Path<(Uuid, usize)>,
) -> Result<Json<AnalyzeSlideResponse>> {
    let user = authenticate(&token).await?;
    let ai = AiService::from_env()?;
    let deck_service = DeckService::new(db()?);
    let (feedback, slide) = deck_service
        .analyze_slide(&user.user_id, &deck_id, slide_index, &ai)
        .await?;
    Ok(Json(AnalyzeSlideResponse {
        slide_index,
        feedback,
        slide,
    }))
}

#[utoipa::path(post, path = "/api/decks/{id}/slides/{index}/suggestions", request_body = SuggestionsRequest, responses((status = 200, body = SuggestionsResponse)), tag = "Decks")]
pub async fn slide_suggestions(
    AuthBearer(token): AuthBearer,
    Path((deck_id, slide_index)): Path<(Uuid, usize)>,
    Json(req): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>> {
    let user = authenticate(&token).await?;
    let ai = AiService::from_env()?;
    let deck_service = DeckService::new(db()?);
    let suggestions = deck_service
        .suggest_improvements(
            &user.user_id,
            &deck_id,
            slide_index,
            req.target_investor,
            &ai,
        )
        .await?;
    Ok(Json(SuggestionsResponse {
        slide_index,
        suggestions,
    }))
}

#[utoipa::path(post, path = "/api/decks/{id}/customize", request_body = CustomizeDeckRequest, responses((status = 200, body = CustomizeDeckResponse)), tag = "Decks")]
pub async fn customize_deck(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
    Json(req): Json<CustomizeDeckRequest>,
) -> Result<Json<CustomizeDeckResponse>> {
    let user = authenticate(&token).await?;
    let ai = AiService::from_env()?;
    let deck_service = DeckService::new(db()?);
    let deck = deck_service
        .customize(&user.user_id, &deck_id, req.investor_profile, &ai)
        .await?;
    Ok(Json(CustomizeDeckResponse {
        message: "Deck customized successfully".to_string(),
        deck: deck.into(),
    }))
}

#[utoipa::path(post, path = "/api/decks/{id}/share", responses((status = 200, body = ShareDeckResponse)), tag = "Decks")]
pub async fn share_deck(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<ShareDeckResponse>> {
    let user = authenticate(&token).await?;
    let (share_token, share_url) = DeckService::new(db()?).share(&user.user_id, &deck_id).await?;
    info!(action = "deck_shared", deck_id = %deck_id, user_id = %user.user_id);
    Ok(Json(ShareDeckResponse {
        share_token,
        share_url,
    }))
}

/// Public endpoint: shared decks are reachable by token alone.
#[utoipa::path(get, path = "/api/decks/shared/{token}", responses((status = 200, body = SharedDeckResponse)), tag = "Decks")]
pub async fn get_shared_deck(Path(share_token): Path<String>) -> Result<Json<SharedDeckResponse>> {
    let deck = DeckService::new(db()?).open_shared(&share_token).await?;
    Ok(Json(deck.into()))
}

#[utoipa::path(post, path = "/api/decks/{id}/duplicate", responses((status = 201, body = DeckEditResponse)), tag = "Decks")]
pub async fn duplicate_deck(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
) -> Result<(StatusCode, Json<DeckEditResponse>)> {
    let user = authenticate(&token).await?;
    let deck = DeckService::new(db()?).duplicate(&user.user_id, &deck_id).await?;
    Ok((StatusCode::CREATED, Json(deck.into())))
}

pub fn decks_router() -> Router {
    Router::new()
        .route("/", get(list_decks))
        .route("/", post(create_deck))
        .route("/shared/:token", get(get_shared_deck))
        .route("/:id", get(get_deck))
        .route("/:id", put(update_deck))
        .route("/:id", delete(delete_deck))
        .route("/:id/generate", post(generate_deck))
        .route("/:id/slides/:index/analyze", post(analyze_slide))
        .route("/:id/slides/:index/suggestions", post(slide_suggestions))
        .route("/:id/customize", post(customize_deck))
        .route("/:id/share", post(share_deck))
        .route("/:id/duplicate", post(duplicate_deck))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[utoipa::path(get, path = "/api/templates", responses((status = 200, body = [DeckTemplate])), tag = "Templates")]
pub async fn list_templates(AuthBearer(token): AuthBearer) -> Result<Json<Vec<DeckTemplate>>> {
    authenticate(&token).await?;
    Ok(Json(DECK_TEMPLATES.to_vec()))
}

#[utoipa::path(get, path = "/api/templates/{id}", responses((status = 200, body = DeckTemplate)), tag = "Templates")]
pub async fn get_template(
    AuthBearer(token): AuthBearer,
    Path(template_id): Path<String>,
) -> Result<Json<DeckTemplate>> {
    authenticate(&token).await?;
    let template = find_template(&template_id)
        .ok_or_else(|| AppError::NotFoundError("Template not found".to_string()))?;
    Ok(Json(template.clone()))
}

pub fn templates_router() -> Router {
    Router::new()
        .route("/", get(list_templates))
        .route("/:id", get(get_template))
}

// ---------------------------------------------------------------------------
// Investors
// ---------------------------------------------------------------------------

#[utoipa::path(get, path = "/api/investors", responses((status = 200, body = [Investor])), tag = "Investors")]
pub async fn list_investors(AuthBearer(token): AuthBearer) -> Result<Json<Vec<Investor>>> {
    let user = authenticate(&token).await?;
    let investors = InvestorService::new(db()?).list(&user.user_id).await?;
    Ok(Json(investors))
}

#[utoipa::path(post, path = "/api/investors", request_body = CreateInvestorRequest, responses((status = 201, body = Investor)), tag = "Investors")]
pub async fn create_investor(
    AuthBearer(token): AuthBearer,
    Json(req): Json<CreateInvestorRequest>,
) -> Result<(StatusCode, Json<Investor>)> {
    let user = authenticate(&token).await?;
    let investor_service = InvestorService::new(db()?);
    let investor = investor_service
        .create(
            &user.user_id,
            CreateInvestorInput {
                name: req.name,
                investor_type: req.investor_type,
                firm: req.firm,
                title: req.title,
                email: req.email,
                linkedin: req.linkedin,
                website: req.website,
                location: req.location,
                bio: req.bio,
                investment_criteria: req.investment_criteria,
                communication_preferences: req.communication_preferences,
                tags: req.tags,
                notes: req.notes,
            },
        )
        .await?;
    info!(action = "investor_created", investor_id = %investor.id, user_id = %user.user_id);
    Ok((StatusCode::CREATED, Json(investor)))
}

/// Built-in persona catalog, served before the `{id}` routes so the
/// literal path wins.
#[utoipa::path(get, path = "/api/investors/templates", responses((status = 200, body = [InvestorPersona])), tag = "Investors")]
pub async fn investor_personas(AuthBearer(token): AuthBearer) -> Result<Json<Vec<InvestorPersona>>> {
    authenticate(&token).await?;
    Ok(Json(InvestorService::personas()))
}

#[utoipa::path(post, path = "/api/investors/match", request_body = MatchCriteria, responses((status = 200, body = [InvestorMatch])), tag = "Investors")]
pub async fn match_investors(
    AuthBearer(token): AuthBearer,
    Json(criteria): Json<MatchCriteria>,
) -> Result<Json<Vec<InvestorMatch>>> {
    authenticate(&token).await?;
    let matches = InvestorService::new(db()?).match_investors(&criteria).await?;
    Ok(Json(matches))
}

#[utoipa::path(get, path = "/api/investors/{id}", responses((status = 200, body = Investor)), tag = "Investors")]
pub async fn get_investor(
    AuthBearer(token): AuthBearer,
    Path(investor_id): Path<Uuid>,
) -> Result<Json<Investor>> {
    let user = authenticate(&token).await?;
    let investor = InvestorService::new(db()?).get(&user.user_id, &investor_id).await?;
    Ok(Json(investor))
}

#[utoipa::path(put, path = "/api/investors/{id}", request_body = UpdateInvestorRequest, responses((status = 200, body = Investor)), tag = "Investors")]
pub async fn update_investor(
    AuthBearer(token): AuthBearer,
    Path(investor_id): Path<Uuid>,
    Json(req): Json<UpdateInvestorRequest>,
) -> Result<Json<Investor>> {
    let user = authenticate(&token).await?;
    let investor_service = InvestorService::new(db()?);
    let investor = investor_service
        .update(
            &user.user_id,
            &investor_id,
            InvestorUpdate {
                name: req.name,
                firm: req.firm,
                title: req.title,
                investor_type: req.investor_type,
                email: req.email,
                linkedin: req.linkedin,
                website: req.website,
                location: req.location,
                bio: req.bio,
                investment_criteria: req.investment_criteria,
                communication_preferences: req.communication_preferences,
                tags: req.tags,
                status: req.status,
                notes: req.notes,
                last_contact: req.last_contact,
                next_follow_up: req.next_follow_up,
            },
        )
        .await?;
    Ok(Json(investor))
}

#[utoipa::path(delete, path = "/api/investors/{id}", responses((status = 200, body = MessageResponse)), tag = "Investors")]
pub async fn delete_investor(
    AuthBearer(token): AuthBearer,
    Path(investor_id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let user = authenticate(&token).await?;
    InvestorService::new(db()?).delete(&user.user_id, &investor_id).await?;
    Ok(Json(MessageResponse {
        message: "Investor deleted successfully".to_string(),
    }))
}

#[utoipa::path(get, path = "/api/investors/{id}/insights", responses((status = 200, body = InvestorInsights)), tag = "Investors")]
pub async fn investor_insights(
    AuthBearer(token): AuthBearer,
    Path(investor_id): Path<Uuid>,
) -> Result<Json<InvestorInsights>> {
    let user = authenticate(&token).await?;
    let investor = InvestorService::new(db()?).get(&user.user_id, &investor_id).await?;
    Ok(Json(InvestorInsights::from(&investor)))
}

#[utoipa::path(post, path = "/api/investors/{id}/customize-deck", request_body = CustomizeForInvestorRequest, responses((status = 200, body = CustomizeForInvestorResponse)), tag = "Investors")]
pub async fn customize_for_investor(
    AuthBearer(token): AuthBearer,
    Path(investor_id): Path<Uuid>,
    Json(req): Json<CustomizeForInvestorRequest>,
) -> Result<Json<CustomizeForInvestorResponse>> {
    let user = authenticate(&token).await?;
    let ai = AiService::from_env()?;
    let investor_service = InvestorService::new(db()?);
    let (investor, customized_content) = investor_service
        .customize_deck(
            &user.user_id,
            &investor_id,
            &req.deck_id,
            req.customization_type.as_str(),
            &ai,
        )
        .await?;
    Ok(Json(CustomizeForInvestorResponse {
        investor: InvestorPublicProfile::from(&investor),
        customized_content,
        customization_type: req.customization_type,
    }))
}

pub fn investors_router() -> Router {
    Router::new()
        .route("/", get(list_investors))
        .route("/", post(create_investor))
        .route("/templates", get(investor_personas))
        .route("/match", post(match_investors))
        .route("/:id", get(get_investor))
        .route("/:id", put(update_investor))
        .route("/:id", delete(delete_investor))
        .route("/:id/insights", get(investor_insights))
        .route("/:id/customize-deck", post(customize_for_investor))
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Public endpoint: the share-page beacon posts here without credentials.
#[utoipa::path(post, path = "/api/analytics/track", request_body = TrackViewRequest, responses((status = 200, body = TrackViewResponse)), tag = "Analytics")]
pub async fn track_view(
    headers: HeaderMap,
    Json(req): Json<TrackViewRequest>,
) -> Result<Json<TrackViewResponse>> {
    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .map(String::from);
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let analytics_service = AnalyticsService::new(db()?);
    analytics_service
        .track_view(TrackViewInput {
            deck_id: req.deck_id,
            session_id: req.session_id,
            viewer_id: req.viewer_id,
            viewer_type: req.viewer_type,
            slide_views: req.slide_views,
            duration: req.duration,
            user_agent,
            ip_address,
            referrer: req.referrer,
        })
        .await?;
    Ok(Json(TrackViewResponse { success: true }))
}

#[utoipa::path(get, path = "/api/analytics/deck/{id}", responses((status = 200, body = DeckAnalyticsResponse)), tag = "Analytics")]
pub async fn deck_analytics(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckAnalyticsResponse>> {
    let user = authenticate(&token).await?;
    let analytics_service = AnalyticsService::new(db()?);
    let (deck, analytics, interactions) = analytics_service
        .deck_analytics(&user.user_id, &deck_id)
        .await?;
    Ok(Json(DeckAnalyticsResponse {
        deck: DeckRef {
            id: deck.id,
            title: deck.title,
            status: deck.status,
        },
        analytics: analytics.into(),
        investor_interactions: interactions.iter().map(InteractionSummary::from).collect(),
    }))
}

#[utoipa::path(get, path = "/api/analytics/overview", responses((status = 200, body = OverviewResponse)), tag = "Analytics")]
pub async fn analytics_overview(AuthBearer(token): AuthBearer) -> Result<Json<OverviewResponse>> {
    let user = authenticate(&token).await?;
    let overview = AnalyticsService::new(db()?).overview(&user.user_id).await?;
    Ok(Json(overview.into()))
}

#[utoipa::path(post, path = "/api/analytics/investor-interaction", request_body = RecordInteractionRequest, responses((status = 200, body = InteractionResponse)), tag = "Analytics")]
pub async fn record_interaction(
    AuthBearer(token): AuthBearer,
    Json(req): Json<RecordInteractionRequest>,
) -> Result<Json<InteractionResponse>> {
    let user = authenticate(&token).await?;
    let analytics_service = AnalyticsService::new(db()?);
    let interaction = analytics_service
        .record_interaction(
            &user.user_id,
            RecordInteractionInput {
                deck_id: req.deck_id,
                investor_id: req.investor_id,
                interaction_type: req.interaction_type,
                investor_name: req.investor_name,
                investor_type: req.investor_type,
                interest_level: req.interest_level,
                notes: req.notes,
            },
        )
        .await?;
    info!(action = "interaction_recorded", interaction_id = %interaction.id, deck_id = %interaction.deck_id);
    Ok(Json(InteractionResponse {
        success: true,
        interaction: InteractionBrief::from(&interaction),
    }))
}

#[utoipa::path(put, path = "/api/analytics/investor-interaction/{id}", request_body = UpdateInteractionRequest, responses((status = 200, body = InteractionResponse)), tag = "Analytics")]
pub async fn update_interaction(
    AuthBearer(token): AuthBearer,
    Path(interaction_id): Path<Uuid>,
    Json(req): Json<UpdateInteractionRequest>,
) -> Result<Json<InteractionResponse>> {
    let user = authenticate(&token).await?;
    let analytics_service = AnalyticsService::new(db()?);
    let interaction = analytics_service
        .update_interaction_status(
            &user.user_id,
            &interaction_id,
            InteractionStatusUpdate {
                status: req.status,
                interest_level: req.interest_level,
                notes: req.notes,
                follow_up_date: req.follow_up_date,
            },
        )
        .await?;
    Ok(Json(InteractionResponse {
        success: true,
        interaction: InteractionBrief::from(&interaction),
    }))
}

#[utoipa::path(get, path = "/api/analytics/deck/{id}/slides", responses((status = 200, body = [SlideAnalyticsEntry])), tag = "Analytics")]
pub async fn deck_slide_analytics(
    AuthBearer(token): AuthBearer,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<Vec<SlideAnalyticsEntry>>> {
    let user = authenticate(&token).await?;
    let rows = AnalyticsService::new(db()?)
        .slide_analytics(&user.user_id, &deck_id)
        .await?;
    Ok(Json(rows.into_iter().map(SlideAnalyticsEntry::from).collect()))
}

pub fn analytics_router() -> Router {
    Router::new()
        .route("/track", post(track_view))
        .route("/overview", get(analytics_overview))
        .route("/deck/:id", get(deck_analytics))
        .route("/deck/:id/slides", get(deck_slide_analytics))
        .route("/investor-interaction", post(record_interaction))
        .route("/investor-interaction/:id", put(update_interaction))
}
