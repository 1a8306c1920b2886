//! Connect Algo - matching and vetting service for the founder/provider marketplace
//!
//! This library provides the scoring engines behind the marketplace: ranking
//! providers for a founder, scoring provider applications, and choosing where
//! a signed-in user lands.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{resolve_destination, score_application, score_match, ApplicationScorer, Matcher};
pub use models::{
    ApplicationScore, AuthState, FounderProfile, MatchRecommendation, MatchWeights,
    ProviderApplicationSubmission, ProviderProfile, ReasonCode, Route, Tier,
};
