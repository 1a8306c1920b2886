use crate::models::{FounderProfile, ProviderProfile, Role};

/// Check if a provider may be shown to founders
///
/// Stage 1 of the ranking pipeline: only approved providers that finished
/// onboarding are visible.
#[inline]
pub fn is_visible_provider(provider: &ProviderProfile) -> bool {
    provider.is_approved() && provider.is_onboarded()
}

/// Check if a profile record can be scored as a founder
#[inline]
pub fn is_founder(founder: &FounderProfile) -> bool {
    founder.role == Role::Founder
}

/// Check if a provider was explicitly excluded by the caller
#[inline]
pub fn is_excluded(provider: &ProviderProfile, exclude_ids: &[String]) -> bool {
    exclude_ids.iter().any(|id| id == &provider.id)
}

/// Words from a free-text goal used for keyword overlap
///
/// Splits on anything that is not alphanumeric and keeps lowercase words
/// longer than three characters, first occurrence only.
pub fn goal_keywords(goal: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();

    for word in goal
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 3)
    {
        let word = word.to_lowercase();
        if !keywords.contains(&word) {
            keywords.push(word);
        }
    }

    keywords
}
