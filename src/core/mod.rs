// Core algorithm exports
pub mod application;
pub mod buckets;
pub mod filters;
pub mod matcher;
pub mod routing;
pub mod scoring;

pub use application::{score_application, ApplicationScorer};
pub use buckets::{experience_level, revenue_fraction};
pub use filters::{goal_keywords, is_excluded, is_founder, is_visible_provider};
pub use matcher::{MatchResult, Matcher};
pub use routing::resolve_destination;
pub use scoring::{score_match, score_match_with};
