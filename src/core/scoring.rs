use crate::models::{FounderProfile, MatchRecommendation, MatchWeights, ProviderProfile, ReasonCode};
use crate::core::{
    buckets::{experience_level, revenue_fraction},
    filters::goal_keywords,
};

/// Points per experience level before the experience weight cap
const POINTS_PER_EXPERIENCE_LEVEL: f64 = 3.0;

/// Revenue fraction at or above which `revenue_match` is surfaced
const REVENUE_REASON_FRACTION: f64 = 0.8;

/// Score a founder/provider pair with the default weights
pub fn score_match(founder: &FounderProfile, provider: &ProviderProfile) -> MatchRecommendation {
    score_match_with(founder, provider, &MatchWeights::default())
}

/// Calculate a match score (0-100) and reason codes for a founder/provider pair
///
/// Scoring formula (default weights):
/// score = (
///     industry_match * 40 +        # provider serves founder's industry
///     platform_match * 20 +        # same email platform
///     min(level * 3, 15) +         # provider experience bucket
///     revenue_fraction * 15 +      # founder revenue tier
///     goal_match * 10              # goal keyword found in approach
/// )
///
/// Pairs without an industry on both sides score 0. Experience and
/// revenue only count when industry, platform or goal overlap, so a pair
/// sharing nothing scores 0. Missing fields contribute nothing. Reason
/// codes are collected in evaluation order and do not have to carry weight: `featured_provider`
/// is surfaced without affecting the score.
pub fn score_match_with(
    founder: &FounderProfile,
    provider: &ProviderProfile,
    weights: &MatchWeights,
) -> MatchRecommendation {
    let mut total = 0.0;
    let mut reasons: Vec<ReasonCode> = Vec::new();

    // Without an industry on both sides nothing is comparable
    if !has_industry_data(founder, provider) {
        if provider.featured() {
            push_reason(&mut reasons, ReasonCode::FeaturedProvider);
        }
        return recommendation(founder, provider, 0.0, reasons);
    }

    let industry = industry_matches(founder, provider);
    let platform = platform_matches(founder, provider);
    let goal = goal_matches(founder, provider);

    // One-sided criteria only count once the pair overlaps somewhere
    let overlaps = industry || platform || goal;

    if industry {
        total += weights.industry_match;
        push_reason(&mut reasons, ReasonCode::IndustryMatch);
    }

    if platform {
        total += weights.platform_match;
        push_reason(&mut reasons, ReasonCode::PlatformExpertise);
    }

    // Experience
    let level = if overlaps {
        experience_level(provider.years_experience.as_deref())
    } else {
        0
    };
    if level > 0 {
        total += (level as f64 * POINTS_PER_EXPERIENCE_LEVEL).min(weights.experience);
    }
    match level {
        5 => push_reason(&mut reasons, ReasonCode::HighExperience),
        4 => push_reason(&mut reasons, ReasonCode::MediumExperience),
        _ => {}
    }

    if provider.featured() {
        push_reason(&mut reasons, ReasonCode::FeaturedProvider);
    }

    if goal {
        total += weights.goal_match;
        push_reason(&mut reasons, ReasonCode::GoalAlignment);
    }

    // Revenue tier
    if overlaps {
        let fraction = revenue_fraction(founder.monthly_revenue.as_deref());
        total += fraction * weights.revenue_match;
        if fraction >= REVENUE_REASON_FRACTION {
            push_reason(&mut reasons, ReasonCode::RevenueMatch);
        }
    }

    recommendation(founder, provider, total, reasons)
}

fn recommendation(
    founder: &FounderProfile,
    provider: &ProviderProfile,
    total: f64,
    reasons: Vec<ReasonCode>,
) -> MatchRecommendation {
    MatchRecommendation {
        founder_id: founder.id.clone(),
        provider_id: provider.id.clone(),
        match_score: clamp_score(total),
        reason_codes: reasons,
        generated_at: None,
    }
}

/// Round to the nearest integer and clamp into 0..=100
#[inline]
fn clamp_score(total: f64) -> u8 {
    if total.is_nan() {
        return 0;
    }
    total.round().clamp(0.0, 100.0) as u8
}

#[inline]
fn push_reason(reasons: &mut Vec<ReasonCode>, code: ReasonCode) {
    if !reasons.contains(&code) {
        reasons.push(code);
    }
}

/// Non-empty, trimmed, case-insensitive value
fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn has_industry_data(founder: &FounderProfile, provider: &ProviderProfile) -> bool {
    present(founder.industry.as_deref()).is_some()
        && provider
            .industries_served
            .iter()
            .any(|served| !served.trim().is_empty())
}

fn industry_matches(founder: &FounderProfile, provider: &ProviderProfile) -> bool {
    let Some(industry) = present(founder.industry.as_deref()) else {
        return false;
    };

    provider
        .industries_served
        .iter()
        .any(|served| served.trim().to_lowercase() == industry)
}

fn platform_matches(founder: &FounderProfile, provider: &ProviderProfile) -> bool {
    match (
        present(founder.email_platform.as_deref()),
        present(provider.primary_esp.as_deref()),
    ) {
        (Some(founder_platform), Some(provider_platform)) => founder_platform == provider_platform,
        _ => false,
    }
}

fn goal_matches(founder: &FounderProfile, provider: &ProviderProfile) -> bool {
    let (Some(goal), Some(approach)) = (
        founder.marketing_goal.as_deref(),
        present(provider.approach_description.as_deref()),
    ) else {
        return false;
    };

    goal_keywords(goal)
        .iter()
        .any(|keyword| approach.contains(keyword.as_str()))
}
