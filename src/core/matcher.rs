use crate::models::{FounderProfile, MatchRecommendation, MatchWeights, ProviderProfile, RankedMatch};
use crate::core::{
    filters::{is_excluded, is_visible_provider},
    scoring::score_match_with,
};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<RankedMatch>,
    pub total_candidates: usize,
}

/// Main matching orchestrator - ranks providers for one founder
///
/// # Pipeline Stages
/// 1. Visibility filter (approved and onboarded providers only)
/// 2. Caller exclusions
/// 3. Scoring
/// 4. Ranking by score, ties broken by provider id
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: MatchWeights,
    min_score: u8,
}

impl Matcher {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights, min_score: 0 }
    }

    pub fn with_default_weights() -> Self {
        Self::new(MatchWeights::default())
    }

    /// Drop providers scoring below `min_score` from ranked results
    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Score a single founder/provider pair with this matcher's weights
    pub fn score(&self, founder: &FounderProfile, provider: &ProviderProfile) -> MatchRecommendation {
        score_match_with(founder, provider, &self.weights)
    }

    /// Rank candidate providers for a founder
    ///
    /// # Arguments
    /// * `founder` - The founder being matched
    /// * `candidates` - Providers fetched from the profile store
    /// * `exclude_ids` - Provider ids the caller does not want back
    /// * `limit` - Maximum number of matches to return
    ///
    /// # Returns
    /// MatchResult containing scored and ranked matches
    pub fn find_matches(
        &self,
        founder: &FounderProfile,
        candidates: Vec<ProviderProfile>,
        exclude_ids: &[String],
        limit: usize,
    ) -> MatchResult {
        let total_candidates = candidates.len();

        let mut ranked: Vec<RankedMatch> = candidates
            .into_iter()
            // Stage 1: Visibility
            .filter(is_visible_provider)
            // Stage 2: Exclusions
            .filter(|provider| !is_excluded(provider, exclude_ids))
            // Stage 3: Scoring
            .filter_map(|provider| {
                let recommendation = self.score(founder, &provider);
                if recommendation.match_score >= self.min_score {
                    Some(RankedMatch { recommendation, provider })
                } else {
                    None
                }
            })
            .collect();

        // Sort by score (descending) and then by provider id (ascending)
        ranked.sort_by(|a, b| {
            b.recommendation
                .match_score
                .cmp(&a.recommendation.match_score)
                .then_with(|| a.provider.id.cmp(&b.provider.id))
        });

        ranked.truncate(limit);

        MatchResult {
            matches: ranked,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
