// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ApplicationRecord, ApplicationScore, ApplicationStatus, ApplicationThresholds, AuthState,
    FounderProfile, ImprovementHint, MatchRecommendation, MatchWeights,
    ProviderApplicationSubmission, ProviderProfile, RankedMatch, ReasonCode, Role, Route,
    ScoreBreakdown, Tier,
};
pub use requests::{FindMatchesRequest, PreviewApplicationRequest, ReviewApplicationRequest};
pub use responses::{
    DestinationResponse, ErrorResponse, FindMatchesResponse, HealthResponse,
    PreviewApplicationResponse, ReviewApplicationResponse, ScoreApplicationResponse, ScoreHistoryEntry,
};
