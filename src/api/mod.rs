use axum::{response::IntoResponse, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use axum::http::Method;
use axum::{http::StatusCode, routing::options};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::database::sqlite::{SqliteDatabase, GLOBAL_DB};
use crate::utils::middleware::global_rate_limiter;

mod routes;
mod types;
pub mod docs;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::register,
        routes::login,
        routes::logout,
        routes::me,
        // User endpoints:
        routes::get_profile,
        routes::update_profile,
        routes::get_preferences,
        routes::update_preferences,
        // Deck endpoints:
        routes::list_decks,
        routes::create_deck,
        routes::get_deck,
        routes::update_deck,
        routes::delete_deck,
        routes::generate_deck,
        routes::analyze_slide,
        routes::slide_suggestions,
        routes::customize_deck,
        routes::share_deck,
        routes::get_shared_deck,
        routes::duplicate_deck,
        // Template endpoints:
        routes::list_templates,
        routes::get_template,
        // Investor endpoints:
        routes::list_investors,
        routes::create_investor,
        routes::investor_personas,
        routes::match_investors,
        routes::get_investor,
        routes::update_investor,
        routes::delete_investor,
        routes::investor_insights,
        routes::customize_for_investor,
        // Analytics endpoints:
        routes::track_view,
        routes::deck_analytics,
        routes::analytics_overview,
        routes::record_interaction,
        routes::update_interaction,
        routes::deck_slide_analytics,
    ),
    components(
        schemas(
            types::RegisterRequest,
            types::LoginRequest,
            types::AuthResponse,
            types::LogoutResponse,
            types::MessageResponse,
            types::UpdateProfileRequest,
            types::NotificationSettingsPatch,
            types::UpdatePreferencesRequest,
            // Deck types:
            types::CreateDeckRequest,
            types::UpdateDeckRequest,
            types::GenerateDeckRequest,
            types::SuggestionsRequest,
            types::CustomizeDeckRequest,
            types::DeckSummary,
            types::DeckEditResponse,
            types::GenerateDeckResponse,
            types::CustomizeDeckResponse,
            types::AnalyzeSlideResponse,
            types::SuggestionsResponse,
            types::ShareDeckResponse,
            types::PublicStartupInfo,
            types::SharedDeckResponse,
            // Investor types:
            types::CreateInvestorRequest,
            types::UpdateInvestorRequest,
            types::PublicInvestmentCriteria,
            types::PublicCommunicationPreferences,
            types::InvestorPublicProfile,
            types::CommunicationStyle,
            types::InvestorInsights,
            types::CustomizationType,
            types::CustomizeForInvestorRequest,
            types::CustomizeForInvestorResponse,
            // Analytics types:
            types::TrackViewRequest,
            types::TrackViewResponse,
            types::DeckRef,
            types::DeckAnalyticsBody,
            types::InteractionSummary,
            types::DeckAnalyticsResponse,
            types::RecordInteractionRequest,
            types::UpdateInteractionRequest,
            types::InteractionBrief,
            types::InteractionResponse,
            types::TopDeck,
            types::RecentActivityEntry,
            types::OverviewResponse,
            types::SlideAnalyticsEntry,

            crate::models::user::UserResponse,
            crate::models::user::UserPreferences,
            crate::models::user::NotificationSettings,
            crate::models::user::Subscription,
            crate::models::deck::DeckStatus,
            crate::models::deck::StartupStage,
            crate::models::deck::SlideType,
            crate::models::deck::SlideContent,
            crate::models::deck::AiFeedback,
            crate::models::deck::Slide,
            crate::models::deck::Financials,
            crate::models::deck::StartupInfo,
            crate::models::deck::DeckTheme,
            crate::models::deck::DeckStats,
            crate::models::deck::TargetInvestor,
            crate::models::template::DeckTemplate,
            crate::models::investor::InvestorType,
            crate::models::investor::InvestorStatus,
            crate::models::investor::Location,
            crate::models::investor::InvestmentCriteria,
            crate::models::investor::CommunicationPreferences,
            crate::models::investor::Investor,
            crate::models::investor::MatchCriteria,
            crate::models::investor::InvestorMatch,
            crate::models::investor::InvestorPersona,
            crate::models::analytics::ViewerType,
            crate::models::analytics::SlideInteraction,
            crate::models::analytics::SlideView,
            crate::models::analytics::SlideEngagement,
            crate::models::analytics::CountryCount,
            crate::models::analytics::DeviceCount,
            crate::models::analytics::BrowserCount,
            crate::models::analytics::ViewerDemographics,
            crate::models::analytics::EngagementMetrics,
            crate::models::analytics::InteractionKind,
            crate::models::analytics::InterestLevel,
            crate::models::analytics::InteractionStatus,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "User profile and preference endpoints"),
        (name = "Decks", description = "Pitch deck management endpoints. ⚠️ Most endpoints require JWT authentication. Use the Authorize button and paste your token as 'Bearer <token>'!"),
        (name = "Templates", description = "Deck template catalog endpoints"),
        (name = "Investors", description = "Investor profile and matching endpoints"),
        (name = "Analytics", description = "View tracking and engagement analytics endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
        openapi.components.as_mut().unwrap().add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.security = Some(vec![utoipa::openapi::security::SecurityRequirement::new(
            "bearerAuth",
            Vec::<String>::new(),
        )]);
    }
}

pub async fn request_id_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(request_id.clone());
    let span = tracing::info_span!("request", request_id = %request_id, method = %req.method(), uri = %req.uri());
    let _enter = span.enter();
    next.run(req).await
}

/// Main entry point for the DeckPilot API server.
/// Sets up all routes, middleware, and documentation endpoints.
pub async fn start_http_server() {
    let openapi = ApiDoc::openapi();
    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "deckpilot.db".to_string());
    let db = Arc::new(SqliteDatabase::new(&database_path).await.unwrap());
    GLOBAL_DB.set(db.clone()).unwrap();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/auth/login", options(|| async { StatusCode::NO_CONTENT }))
        .route("/api/auth/register", options(|| async { StatusCode::NO_CONTENT }))
        .route("/*path", options(|| async { StatusCode::NO_CONTENT })) // fallback for other paths
        .nest("/api/auth", routes::auth_router())
        .nest("/api/users", routes::users_router())
        .nest("/api/decks", routes::decks_router())
        .nest("/api/templates", routes::templates_router())
        .nest("/api/investors", routes::investors_router())
        .nest("/api/analytics", routes::analytics_router())
        .route("/health", axum::routing::get(health_check))
        // OpenAPI Documentation Routes
        .route("/docs/openapi.json", axum::routing::get(openapi_json))
        .route("/docs/swagger.json", axum::routing::get(openapi_json))
        .route("/docs/api-docs.json", axum::routing::get(openapi_json))
        .route("/docs/redoc", axum::routing::get(redoc_ui))
        .route("/docs/markdown", axum::routing::get(api_markdown))
        .route("/docs", axum::routing::get(api_documentation))
        // Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi.clone()))
        // Redoc UI
        .merge(Redoc::with_url("/api/redoc", openapi))
        .layer(cors)
        .layer(axum::middleware::from_fn(global_rate_limiter))
        .layer(axum::middleware::from_fn(request_id_middleware));

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse().unwrap();

    println!("🚀 HTTP API running at http://{}/health", addr);
    println!("📚 API Documentation available at: http://{}/api/docs", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Export OpenAPI specification as JSON
async fn openapi_json() -> Json<Value> {
    let openapi = ApiDoc::openapi();
    Json(serde_json::to_value(openapi).unwrap())
}

/// Serves the Redoc UI for API documentation.
async fn redoc_ui() -> impl IntoResponse {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>DeckPilot API Documentation</title>
        <meta charset="utf-8"/>
        <meta name="viewport" content="width=device-width, initial-scale=1">
        <link href="https://fonts.googleapis.com/css?family=Montserrat:300,400,700|Roboto:300,400,700" rel="stylesheet">
        <style>
            body {
                margin: 0;
                padding: 0;
            }
        </style>
    </head>
    <body>
        <redoc spec-url="/docs/openapi.json"></redoc>
        <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
    </body>
    </html>
    "#;
    axum::response::Html(html)
}

/// Serves the API documentation as downloadable Markdown.
async fn api_markdown() -> impl IntoResponse {
    let markdown = docs::generate_markdown_docs();
    axum::response::Response::builder()
        .header("Content-Type", "text/markdown")
        .header(
            "Content-Disposition",
            "attachment; filename=\"API_DOCUMENTATION.md\"",
        )
        .body(axum::body::Body::from(markdown))
        .unwrap()
}

/// Serves the main API documentation HTML page.
async fn api_documentation() -> impl IntoResponse {
    let html = docs::generate_documentation_html();
    axum::response::Html(html)
}
