// Backend client tests against a mocked REST endpoint

use connect_algo::core::resolve_destination;
use connect_algo::models::{ApplicationStatus, Role, Route};
use connect_algo::services::{BackendClient, BackendError, BackendTables};
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn client_for(url: String) -> BackendClient {
    BackendClient::new(url, "test_key".to_string(), BackendTables::default(), Duration::from_secs(5))
        .expect("client should build")
}

#[tokio::test]
async fn test_get_founder_sends_key_and_filters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_header("apikey", "test_key")
        .match_header("authorization", "Bearer test_key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), "eq.founder_1".into()),
            Matcher::UrlEncoded("role".into(), "eq.founder".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "id": "founder_1",
                "role": "founder",
                "industry": "fashion",
                "email_platform": "klaviyo",
                "monthly_revenue": "500k+"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(server.url());
    let founder = client.get_founder("founder_1").await.unwrap();

    assert_eq!(founder.id, "founder_1");
    assert_eq!(founder.industry.as_deref(), Some("fashion"));
    assert!(founder.marketing_goal.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_row_is_not_found() {
    let mut server = Server::new_async().await;
    let _profiles = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.get_provider("ghost").await;

    assert!(matches!(result, Err(BackendError::NotFound(_))));
}

#[tokio::test]
async fn test_rejected_key_is_unauthorized() {
    let mut server = Server::new_async().await;
    let _applications = server
        .mock("GET", "/rest/v1/provider_applications")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message":"Invalid API key"}"#)
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.get_application("app_1").await;

    assert!(matches!(result, Err(BackendError::Unauthorized)));
}

#[tokio::test]
async fn test_non_array_body_is_invalid() {
    let mut server = Server::new_async().await;
    let _profiles = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": "p1"}"#)
        .create_async()
        .await;

    let client = client_for(server.url());
    let result = client.list_visible_providers(10).await;

    assert!(matches!(result, Err(BackendError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_list_visible_providers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("approved".into(), "is.true".into()),
            Matcher::UrlEncoded("onboarding_complete".into(), "is.true".into()),
            Matcher::UrlEncoded("limit".into(), "50".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                {"id": "p1", "industries_served": ["fashion"], "is_featured": true, "approved": true, "onboarding_complete": true},
                {"id": "p2", "primary_esp": "klaviyo", "approved": true, "onboarding_complete": true}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(server.url());
    let providers = client.list_visible_providers(50).await.unwrap();

    assert_eq!(providers.len(), 2);
    assert!(providers[0].featured());
    assert!(providers[1].industries_served.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_provider_auth_state_includes_latest_application() {
    let mut server = Server::new_async().await;
    let _profiles = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.provider_1".into()))
        .with_status(200)
        .with_body(json!([{"role": "provider", "onboarding_complete": false}]).to_string())
        .create_async()
        .await;
    let _applications = server
        .mock("GET", "/rest/v1/provider_applications")
        .match_query(Matcher::UrlEncoded("user_id".into(), "eq.provider_1".into()))
        .with_status(200)
        .with_body(json!([{"status": "under_review"}]).to_string())
        .create_async()
        .await;

    let client = client_for(server.url());
    let state = client.get_auth_state("provider_1").await.unwrap();

    assert!(state.authenticated);
    assert_eq!(state.role, Some(Role::Provider));
    assert_eq!(state.application_status, Some(ApplicationStatus::UnderReview));
    assert_eq!(resolve_destination(&state), Route::ApplicationPending);
}

#[tokio::test]
async fn test_auth_state_without_profile_needs_role() {
    let mut server = Server::new_async().await;
    let _profiles = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(server.url());
    let state = client.get_auth_state("new_user").await.unwrap();

    assert!(state.authenticated);
    assert!(state.role.is_none());
    assert_eq!(resolve_destination(&state), Route::RoleSelection);
}

#[tokio::test]
async fn test_update_application_status_patches_score() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/rest/v1/provider_applications")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.app_1".into()))
        .match_header("prefer", "return=minimal")
        .match_body(Matcher::PartialJson(json!({
            "status": "approved",
            "tier": "premium",
            "auto_approved": true
        })))
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(server.url());
    let score = connect_algo::core::score_application(&connect_algo::models::ProviderApplicationSubmission {
        headline: Some("Klaviyo flows for DTC fashion brands".to_string()),
        years_experience: Some("5+".to_string()),
        case_studies: Some("a".repeat(600)),
        portfolio_url: Some("https://portfolio.example.com".to_string()),
        linkedin_url: Some("https://linkedin.com/in/someone".to_string()),
        guarantee_offered: Some(true),
        expertise_areas: vec!["flows".into(), "campaigns".into(), "sms".into(), "copy".into(), "design".into()],
    });
    assert_eq!(score.score, 100);

    client
        .update_application_status("app_1", ApplicationStatus::Approved, Some(&score))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_set_provider_approved() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/rest/v1/profiles")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.provider_1".into()))
        .match_body(Matcher::Json(json!({"approved": false})))
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(server.url());
    client.set_provider_approved("provider_1", false).await.unwrap();

    mock.assert_async().await;
}

#[test]
fn test_health_check_reports_failure() {
    let mut server = Server::new();
    let _profiles = server
        .mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(500)
        .create();

    let client = client_for(server.url());

    assert!(!tokio_test::block_on(client.health_check()));
}
