pub mod analytics;
pub mod deck;
pub mod investor;
pub mod template;
pub mod user;
