use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role stored on the profile record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Founder,
    Provider,
    Admin,
}

fn default_founder_role() -> Role { Role::Founder }

/// eCommerce business owner looking for an email-marketing provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FounderProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_founder_role")]
    pub role: Role,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub email_platform: Option<String>,
    #[serde(default)]
    pub monthly_revenue: Option<String>,
    #[serde(default)]
    pub marketing_goal: Option<String>,
}

impl FounderProfile {
    /// Bare founder record with no business attributes filled in
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            role: Role::Founder,
            industry: None,
            email_platform: None,
            monthly_revenue: None,
            marketing_goal: None,
        }
    }
}

/// Email-marketing specialist offering services to founders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub industries_served: Vec<String>,
    #[serde(default)]
    pub primary_esp: Option<String>,
    #[serde(default)]
    pub years_experience: Option<String>,
    #[serde(default)]
    pub approach_description: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub onboarding_complete: Option<bool>,
}

impl ProviderProfile {
    /// Bare provider record, unapproved and not onboarded
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            industries_served: vec![],
            primary_esp: None,
            years_experience: None,
            approach_description: None,
            is_featured: None,
            approved: None,
            onboarding_complete: None,
        }
    }

    /// Helper to get is_featured as a bool, defaulting to false
    pub fn featured(&self) -> bool {
        self.is_featured.unwrap_or(false)
    }

    /// Helper to get approved as a bool, defaulting to false
    pub fn is_approved(&self) -> bool {
        self.approved.unwrap_or(false)
    }

    /// Helper to get onboarding_complete as a bool, defaulting to false
    pub fn is_onboarded(&self) -> bool {
        self.onboarding_complete.unwrap_or(false)
    }
}

/// Symbolic explanation attached to a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    IndustryMatch,
    PlatformExpertise,
    HighExperience,
    MediumExperience,
    FeaturedProvider,
    GoalAlignment,
    RevenueMatch,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::IndustryMatch => "industry_match",
            ReasonCode::PlatformExpertise => "platform_expertise",
            ReasonCode::HighExperience => "high_experience",
            ReasonCode::MediumExperience => "medium_experience",
            ReasonCode::FeaturedProvider => "featured_provider",
            ReasonCode::GoalAlignment => "goal_alignment",
            ReasonCode::RevenueMatch => "revenue_match",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compatibility between one founder and one provider
///
/// Derived on demand and never updated in place; a fresh computation
/// supersedes the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecommendation {
    #[serde(rename = "founderId")]
    pub founder_id: String,
    #[serde(rename = "providerId")]
    pub provider_id: String,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "reasonCodes")]
    pub reason_codes: Vec<ReasonCode>,
    #[serde(rename = "generatedAt", default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl MatchRecommendation {
    /// Stamp the recommendation with the time it was produced
    pub fn generated_at(mut self, at: chrono::DateTime<chrono::Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }
}

/// Ranked provider returned from the matching pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    #[serde(flatten)]
    pub recommendation: MatchRecommendation,
    pub provider: ProviderProfile,
}

/// Scoring weights for the match engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchWeights {
    pub industry_match: f64,
    pub platform_match: f64,
    pub experience: f64,
    pub revenue_match: f64,
    pub goal_match: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            industry_match: 40.0,
            platform_match: 20.0,
            experience: 15.0,
            revenue_match: 15.0,
            goal_match: 10.0,
        }
    }
}

/// Answers submitted with a provider application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderApplicationSubmission {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default, alias = "yearsExperience")]
    pub years_experience: Option<String>,
    #[serde(default, alias = "caseStudies")]
    pub case_studies: Option<String>,
    #[serde(default, alias = "portfolioUrl")]
    pub portfolio_url: Option<String>,
    #[serde(default, alias = "linkedinUrl")]
    pub linkedin_url: Option<String>,
    #[serde(default, alias = "guaranteeOffered")]
    pub guarantee_offered: Option<bool>,
    #[serde(default, alias = "expertiseAreas")]
    pub expertise_areas: Vec<String>,
}

/// Review state of a provider application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Provider application as stored in the submission store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub user_id: String,
    pub status: ApplicationStatus,
    #[serde(flatten)]
    pub submission: ProviderApplicationSubmission,
}

/// Approval tier derived from an application score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Standard,
    Verified,
    Premium,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Standard => "standard",
            Tier::Verified => "verified",
            Tier::Premium => "premium",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Tier::Standard),
            "verified" => Ok(Tier::Verified),
            "premium" => Ok(Tier::Premium),
            other => Err(format!("unknown tier: {}", other)),
        }
    }
}

/// Per-criterion contribution to an application score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub headline: u8,
    pub experience: u8,
    pub case_studies: u8,
    pub portfolio: u8,
    pub linkedin: u8,
    pub guarantee: u8,
    pub expertise: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        [
            self.headline,
            self.experience,
            self.case_studies,
            self.portfolio,
            self.linkedin,
            self.guarantee,
            self.expertise,
        ]
        .iter()
        .map(|&v| v as u32)
        .sum()
    }
}

/// Suggestion surfaced to an applicant whose score is below auto-approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementHint {
    AddCaseStudyDetail,
    AddPortfolio,
    AddLinkedin,
    OfferGuarantee,
    BroadenExpertise,
}

impl ImprovementHint {
    pub fn message(&self) -> &'static str {
        match self {
            ImprovementHint::AddCaseStudyDetail => {
                "Add more detail to your case studies, including concrete results"
            }
            ImprovementHint::AddPortfolio => "Add a portfolio URL showcasing your work",
            ImprovementHint::AddLinkedin => "Add your LinkedIn profile URL",
            ImprovementHint::OfferGuarantee => "Consider offering a performance guarantee",
            ImprovementHint::BroadenExpertise => "Select more areas of expertise",
        }
    }
}

/// Automated evaluation of a provider application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationScore {
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub tier: Tier,
    pub auto_approved: bool,
    #[serde(default)]
    pub hints: Vec<ImprovementHint>,
}

/// Score thresholds for the application engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationThresholds {
    pub auto_approve: u8,
    pub premium: u8,
    pub verified: u8,
}

impl Default for ApplicationThresholds {
    fn default() -> Self {
        Self {
            auto_approve: 85,
            premium: 85,
            verified: 70,
        }
    }
}

/// Explicit authentication state used to pick a landing route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub authenticated: bool,
    pub role: Option<Role>,
    pub onboarding_complete: bool,
    pub application_status: Option<ApplicationStatus>,
}

/// Landing destinations chosen by the destination resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    RoleSelection,
    AdminDashboard,
    FounderOnboarding,
    FounderDashboard,
    ProviderApplication,
    ApplicationPending,
    ApplicationRejected,
    ProviderOnboarding,
    ProviderDashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::RoleSelection => "/select-role",
            Route::AdminDashboard => "/admin",
            Route::FounderOnboarding => "/founder/onboarding",
            Route::FounderDashboard => "/founder/dashboard",
            Route::ProviderApplication => "/provider/apply",
            Route::ApplicationPending => "/provider/application-status",
            Route::ApplicationRejected => "/provider/application-rejected",
            Route::ProviderOnboarding => "/provider/onboarding",
            Route::ProviderDashboard => "/provider/dashboard",
        }
    }
}
