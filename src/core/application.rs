//! Automated scoring of provider applications.
//!
//! The breakdown criteria sum to 100:
//!
//! | criterion    | max | rule                                              |
//! |--------------|-----|---------------------------------------------------|
//! | headline     | 10  | ≥ 20 chars → 10, any → 5                          |
//! | experience   | 20  | `5+` → 20, `3-5` → 15, `1-3` → 8, other → 3       |
//! | case studies | 30  | ≥ 500 chars → 30, ≥ 250 → 20, ≥ 100 → 10, any → 5 |
//! | portfolio    | 10  | valid http(s) URL                                 |
//! | linkedin     | 10  | valid URL whose host is linkedin.com              |
//! | guarantee    | 5   | guarantee offered                                 |
//! | expertise    | 15  | 3 per distinct area                               |
//!
//! The score only supports human review; it never rejects on its own.

use url::Url;

use crate::core::buckets::experience_level;
use crate::models::{
    ApplicationScore, ApplicationThresholds, ImprovementHint, ProviderApplicationSubmission,
    ScoreBreakdown, Tier,
};

const HEADLINE_MAX: u8 = 10;
const HEADLINE_FULL_CHARS: usize = 20;

const CASE_STUDIES_MAX: u8 = 30;
const EXPERTISE_MAX: u8 = 15;
const POINTS_PER_EXPERTISE_AREA: u8 = 3;

const PORTFOLIO_POINTS: u8 = 10;
const LINKEDIN_POINTS: u8 = 10;
const GUARANTEE_POINTS: u8 = 5;

const LINKEDIN_HOST: &str = "linkedin.com";

/// Score a submission with the default thresholds
pub fn score_application(submission: &ProviderApplicationSubmission) -> ApplicationScore {
    ApplicationScorer::default().score(submission)
}

/// Application scorer carrying the tier and auto-approval thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationScorer {
    thresholds: ApplicationThresholds,
}

impl ApplicationScorer {
    pub fn new(thresholds: ApplicationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ApplicationThresholds {
        &self.thresholds
    }

    /// Compute score, breakdown, tier, auto-approval and hints
    pub fn score(&self, submission: &ProviderApplicationSubmission) -> ApplicationScore {
        let breakdown = ScoreBreakdown {
            headline: headline_points(submission.headline.as_deref()),
            experience: experience_points(submission.years_experience.as_deref()),
            case_studies: case_study_points(submission.case_studies.as_deref()),
            portfolio: if is_valid_url(submission.portfolio_url.as_deref()) {
                PORTFOLIO_POINTS
            } else {
                0
            },
            linkedin: if is_linkedin_url(submission.linkedin_url.as_deref()) {
                LINKEDIN_POINTS
            } else {
                0
            },
            guarantee: if submission.guarantee_offered.unwrap_or(false) {
                GUARANTEE_POINTS
            } else {
                0
            },
            expertise: expertise_points(&submission.expertise_areas),
        };

        let score = breakdown.total().min(100) as u8;
        let auto_approved = score >= self.thresholds.auto_approve;

        ApplicationScore {
            score,
            breakdown,
            tier: self.tier_for(score),
            auto_approved,
            hints: if auto_approved { vec![] } else { hints_for(&breakdown) },
        }
    }

    /// Approval tier for a score
    pub fn tier_for(&self, score: u8) -> Tier {
        if score >= self.thresholds.premium {
            Tier::Premium
        } else if score >= self.thresholds.verified {
            Tier::Verified
        } else {
            Tier::Standard
        }
    }
}

/// Improvement hints for criteria below their thresholds, in display order
fn hints_for(breakdown: &ScoreBreakdown) -> Vec<ImprovementHint> {
    let mut hints = Vec::new();

    if breakdown.case_studies < CASE_STUDIES_MAX {
        hints.push(ImprovementHint::AddCaseStudyDetail);
    }
    if breakdown.portfolio == 0 {
        hints.push(ImprovementHint::AddPortfolio);
    }
    if breakdown.linkedin == 0 {
        hints.push(ImprovementHint::AddLinkedin);
    }
    if breakdown.guarantee == 0 {
        hints.push(ImprovementHint::OfferGuarantee);
    }
    if breakdown.expertise < EXPERTISE_MAX {
        hints.push(ImprovementHint::BroadenExpertise);
    }

    hints
}

fn trimmed_len(value: Option<&str>) -> usize {
    value.map(|v| v.trim().chars().count()).unwrap_or(0)
}

fn headline_points(headline: Option<&str>) -> u8 {
    match trimmed_len(headline) {
        0 => 0,
        n if n >= HEADLINE_FULL_CHARS => HEADLINE_MAX,
        _ => HEADLINE_MAX / 2,
    }
}

fn experience_points(bucket: Option<&str>) -> u8 {
    match experience_level(bucket) {
        5 => 20,
        4 => 15,
        2 => 8,
        1 => 3,
        _ => 0,
    }
}

fn case_study_points(case_studies: Option<&str>) -> u8 {
    match trimmed_len(case_studies) {
        0 => 0,
        n if n >= 500 => CASE_STUDIES_MAX,
        n if n >= 250 => 20,
        n if n >= 100 => 10,
        _ => 5,
    }
}

fn expertise_points(areas: &[String]) -> u8 {
    let mut distinct: Vec<String> = Vec::new();
    for area in areas {
        let area = area.trim().to_lowercase();
        if !area.is_empty() && !distinct.contains(&area) {
            distinct.push(area);
        }
    }

    (distinct.len().min(u8::MAX as usize) as u8)
        .saturating_mul(POINTS_PER_EXPERTISE_AREA)
        .min(EXPERTISE_MAX)
}

/// Parse user-entered URLs; scheme-less input is assumed to be https
fn parse_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.chars().any(char::is_whitespace) {
        return None;
    }

    let url = if raw.contains("://") {
        Url::parse(raw).ok()?
    } else {
        Url::parse(&format!("https://{}", raw)).ok()?
    };

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    // Require a dotted host
    url.host_str().filter(|host| host.contains('.'))?;

    Some(url)
}

fn is_valid_url(raw: Option<&str>) -> bool {
    raw.and_then(parse_url).is_some()
}

fn is_linkedin_url(raw: Option<&str>) -> bool {
    raw.and_then(parse_url)
        .and_then(|url| url.host_str().map(is_linkedin_host))
        .unwrap_or(false)
}

fn is_linkedin_host(host: &str) -> bool {
    let host = host.to_lowercase();
    host == LINKEDIN_HOST || host.ends_with(&format!(".{}", LINKEDIN_HOST))
}
