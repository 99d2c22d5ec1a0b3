pub mod ai_service;
pub mod analytics_service;
pub mod auth;
pub mod deck_service;
pub mod investor_service;
pub mod jwt;
pub mod user_service;
