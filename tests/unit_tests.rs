// Unit tests for Connect Algo

use connect_algo::core::{
    buckets::{experience_level, revenue_fraction},
    filters::{goal_keywords, is_excluded, is_visible_provider},
    routing::resolve_destination,
    scoring::{score_match, score_match_with},
    application::{score_application, ApplicationScorer},
};
use connect_algo::models::{
    ApplicationStatus, ApplicationThresholds, AuthState, FounderProfile, ImprovementHint,
    MatchWeights, ProviderApplicationSubmission, ProviderProfile, ReasonCode, Role, Route, Tier,
};

fn fashion_founder() -> FounderProfile {
    FounderProfile {
        industry: Some("fashion".to_string()),
        email_platform: Some("klaviyo".to_string()),
        monthly_revenue: Some("500k+".to_string()),
        marketing_goal: Some("increase revenue".to_string()),
        ..FounderProfile::new("founder_1")
    }
}

fn fashion_provider() -> ProviderProfile {
    ProviderProfile {
        industries_served: vec!["fashion".to_string()],
        primary_esp: Some("klaviyo".to_string()),
        years_experience: Some("5+".to_string()),
        approach_description: Some("we focus on increasing revenue through automation".to_string()),
        is_featured: Some(true),
        approved: Some(true),
        onboarding_complete: Some(true),
        ..ProviderProfile::new("provider_1")
    }
}

fn long_text(chars: usize) -> String {
    "a".repeat(chars)
}

#[test]
fn test_experience_levels() {
    assert_eq!(experience_level(Some("5+")), 5);
    assert_eq!(experience_level(Some("3-5 years")), 4);
    assert_eq!(experience_level(Some("1-3")), 2);
    assert_eq!(experience_level(Some("less than 1")), 1);
    assert_eq!(experience_level(Some("  ")), 0);
    assert_eq!(experience_level(None), 0);
}

#[test]
fn test_revenue_fractions() {
    assert_eq!(revenue_fraction(Some("$500K+")), 1.0);
    assert_eq!(revenue_fraction(Some("100k-500k")), 0.8);
    assert_eq!(revenue_fraction(Some("50k-100k")), 0.6);
    assert_eq!(revenue_fraction(Some("10k-50k")), 0.4);
    assert_eq!(revenue_fraction(Some("0-10k")), 0.2);
    assert_eq!(revenue_fraction(Some("a lot")), 0.0);
    assert_eq!(revenue_fraction(None), 0.0);
}

#[test]
fn test_goal_keywords_skip_short_words() {
    assert_eq!(goal_keywords("Grow our VIP list"), vec!["grow", "list"]);
    assert!(goal_keywords("a to b").is_empty());
}

#[test]
fn test_visibility_requires_approval_and_onboarding() {
    let mut provider = fashion_provider();
    assert!(is_visible_provider(&provider));

    provider.onboarding_complete = Some(false);
    assert!(!is_visible_provider(&provider));

    provider.onboarding_complete = Some(true);
    provider.approved = None;
    assert!(!is_visible_provider(&provider));
}

#[test]
fn test_exclusion_by_id() {
    let provider = fashion_provider();
    assert!(is_excluded(&provider, &["provider_1".to_string()]));
    assert!(!is_excluded(&provider, &["provider_2".to_string()]));
    assert!(!is_excluded(&provider, &[]));
}

#[test]
fn test_full_match_scores_100() {
    let rec = score_match(&fashion_founder(), &fashion_provider());

    assert_eq!(rec.match_score, 100);
    assert_eq!(rec.founder_id, "founder_1");
    assert_eq!(rec.provider_id, "provider_1");
    for code in [
        ReasonCode::IndustryMatch,
        ReasonCode::PlatformExpertise,
        ReasonCode::HighExperience,
        ReasonCode::FeaturedProvider,
        ReasonCode::GoalAlignment,
    ] {
        assert!(rec.reason_codes.contains(&code), "missing {}", code);
    }
}

#[test]
fn test_no_overlap_scores_zero() {
    let founder = FounderProfile {
        industry: Some("beauty".to_string()),
        ..FounderProfile::new("founder_2")
    };
    let provider = ProviderProfile {
        industries_served: vec!["fashion".to_string()],
        primary_esp: Some("mailchimp".to_string()),
        ..ProviderProfile::new("provider_2")
    };

    let rec = score_match(&founder, &provider);

    assert_eq!(rec.match_score, 0);
    assert!(rec.reason_codes.is_empty());
}

#[test]
fn test_case_insensitive_industry_and_platform() {
    let founder = FounderProfile {
        industry: Some("Fashion".to_string()),
        email_platform: Some("KLAVIYO".to_string()),
        ..FounderProfile::new("f")
    };
    let provider = ProviderProfile {
        industries_served: vec!["fashion".to_string()],
        primary_esp: Some("Klaviyo".to_string()),
        ..ProviderProfile::new("p")
    };

    let rec = score_match(&founder, &provider);
    assert_eq!(rec.match_score, 60);
    assert_eq!(
        rec.reason_codes,
        vec![ReasonCode::IndustryMatch, ReasonCode::PlatformExpertise]
    );
}

#[test]
fn test_medium_experience_reason() {
    let founder = FounderProfile {
        industry: Some("pets".to_string()),
        ..FounderProfile::new("f")
    };
    let provider = ProviderProfile {
        industries_served: vec!["pets".to_string()],
        years_experience: Some("3-5".to_string()),
        ..ProviderProfile::new("p")
    };

    let rec = score_match(&founder, &provider);
    assert_eq!(rec.match_score, 52);
    assert_eq!(
        rec.reason_codes,
        vec![ReasonCode::IndustryMatch, ReasonCode::MediumExperience]
    );
}

#[test]
fn test_experience_and_revenue_alone_score_zero() {
    let founder = FounderProfile {
        industry: Some("beauty".to_string()),
        monthly_revenue: Some("500k+".to_string()),
        ..FounderProfile::new("f")
    };
    let provider = ProviderProfile {
        industries_served: vec!["fashion".to_string()],
        primary_esp: Some("mailchimp".to_string()),
        years_experience: Some("5+".to_string()),
        ..ProviderProfile::new("p")
    };

    let rec = score_match(&founder, &provider);
    assert_eq!(rec.match_score, 0);
    assert!(rec.reason_codes.is_empty());

    let bare = ProviderProfile {
        years_experience: Some("3-5".to_string()),
        ..ProviderProfile::new("p2")
    };
    assert_eq!(score_match(&FounderProfile::new("f"), &bare).match_score, 0);
}

#[test]
fn test_custom_weights_are_clamped() {
    let weights = MatchWeights {
        industry_match: 90.0,
        platform_match: 90.0,
        ..MatchWeights::default()
    };

    let rec = score_match_with(&fashion_founder(), &fashion_provider(), &weights);
    assert_eq!(rec.match_score, 100);
}

#[test]
fn test_application_at_auto_approve_threshold() {
    let submission = ProviderApplicationSubmission {
        headline: Some("Klaviyo flows for DTC fashion brands".to_string()),
        years_experience: Some("5+".to_string()),
        case_studies: Some(long_text(600)),
        linkedin_url: Some("https://www.linkedin.com/in/someone".to_string()),
        expertise_areas: ["flows", "campaigns", "segmentation", "copywriting", "deliverability"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ..Default::default()
    };

    let result = score_application(&submission);

    assert_eq!(result.score, 85);
    assert_eq!(result.tier, Tier::Premium);
    assert!(result.auto_approved);
    assert!(result.hints.is_empty());
}

#[test]
fn test_application_just_below_threshold() {
    let submission = ProviderApplicationSubmission {
        headline: Some("Klaviyo flows for DTC fashion brands".to_string()),
        years_experience: Some("5+".to_string()),
        case_studies: Some(long_text(600)),
        portfolio_url: Some("portfolio.example.com".to_string()),
        guarantee_offered: Some(true),
        expertise_areas: vec!["flows".into(), "campaigns".into(), "sms".into()],
        ..Default::default()
    };

    let result = score_application(&submission);

    assert_eq!(result.score, 84);
    assert_eq!(result.breakdown.portfolio, 10);
    assert_eq!(result.breakdown.expertise, 9);
    assert_eq!(result.tier, Tier::Verified);
    assert!(!result.auto_approved);
    assert_eq!(
        result.hints,
        vec![ImprovementHint::AddLinkedin, ImprovementHint::BroadenExpertise]
    );
}

#[test]
fn test_empty_application() {
    let result = score_application(&ProviderApplicationSubmission::default());

    assert_eq!(result.score, 0);
    assert_eq!(result.tier, Tier::Standard);
    assert!(!result.auto_approved);
    assert_eq!(result.hints.len(), 5);
}

#[test]
fn test_custom_thresholds() {
    let scorer = ApplicationScorer::new(ApplicationThresholds {
        auto_approve: 95,
        premium: 90,
        verified: 50,
    });

    assert_eq!(scorer.tier_for(89), Tier::Verified);
    assert_eq!(scorer.tier_for(90), Tier::Premium);
    assert_eq!(scorer.tier_for(49), Tier::Standard);
}

#[test]
fn test_resolver_basic_routes() {
    assert_eq!(resolve_destination(&AuthState::default()), Route::Login);

    let signed_in = AuthState {
        authenticated: true,
        ..AuthState::default()
    };
    assert_eq!(resolve_destination(&signed_in), Route::RoleSelection);

    let admin = AuthState {
        role: Some(Role::Admin),
        ..signed_in
    };
    assert_eq!(resolve_destination(&admin), Route::AdminDashboard);
}

#[test]
fn test_resolver_provider_flow() {
    let provider = |status: Option<ApplicationStatus>, onboarded: bool| AuthState {
        authenticated: true,
        role: Some(Role::Provider),
        onboarding_complete: onboarded,
        application_status: status,
    };

    assert_eq!(resolve_destination(&provider(None, false)), Route::ProviderApplication);
    assert_eq!(
        resolve_destination(&provider(Some(ApplicationStatus::Draft), false)),
        Route::ProviderApplication
    );
    assert_eq!(
        resolve_destination(&provider(Some(ApplicationStatus::UnderReview), false)),
        Route::ApplicationPending
    );
    assert_eq!(
        resolve_destination(&provider(Some(ApplicationStatus::Rejected), false)),
        Route::ApplicationRejected
    );
    assert_eq!(
        resolve_destination(&provider(Some(ApplicationStatus::Approved), false)),
        Route::ProviderOnboarding
    );
    assert_eq!(
        resolve_destination(&provider(Some(ApplicationStatus::Approved), true)),
        Route::ProviderDashboard
    );
}
