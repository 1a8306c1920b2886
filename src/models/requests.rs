use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to rank providers for the session founder
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(default)]
    #[serde(alias = "exclude_provider_ids", rename = "excludeProviderIds")]
    pub exclude_provider_ids: Vec<String>,
    /// Skip cached rankings and recompute
    #[serde(default)]
    pub refresh: bool,
}

fn default_limit() -> u16 {
    20
}

impl Default for FindMatchesRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            exclude_provider_ids: vec![],
            refresh: false,
        }
    }
}

/// Raw application answers scored without persistence
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PreviewApplicationRequest {
    #[validate(length(max = 200))]
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default, alias = "years_experience", rename = "yearsExperience")]
    pub years_experience: Option<String>,
    #[validate(length(max = 20000))]
    #[serde(default, alias = "case_studies", rename = "caseStudies")]
    pub case_studies: Option<String>,
    #[validate(length(max = 2048))]
    #[serde(default, alias = "portfolio_url", rename = "portfolioUrl")]
    pub portfolio_url: Option<String>,
    #[validate(length(max = 2048))]
    #[serde(default, alias = "linkedin_url", rename = "linkedinUrl")]
    pub linkedin_url: Option<String>,
    #[serde(default, alias = "guarantee_offered", rename = "guaranteeOffered")]
    pub guarantee_offered: Option<bool>,
    #[validate(length(max = 50))]
    #[serde(default, alias = "expertise_areas", rename = "expertiseAreas")]
    pub expertise_areas: Vec<String>,
}

impl From<PreviewApplicationRequest> for crate::models::ProviderApplicationSubmission {
    fn from(req: PreviewApplicationRequest) -> Self {
        Self {
            headline: req.headline,
            years_experience: req.years_experience,
            case_studies: req.case_studies,
            portfolio_url: req.portfolio_url,
            linkedin_url: req.linkedin_url,
            guarantee_offered: req.guarantee_offered,
            expertise_areas: req.expertise_areas,
        }
    }
}

/// Human review decision on a provider application
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewApplicationRequest {
    #[validate(length(min = 1))]
    pub decision: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub notes: Option<String>,
}
