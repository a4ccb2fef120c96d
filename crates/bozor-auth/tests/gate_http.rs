//! End-to-end gate evaluations against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use bozor_auth::storage::keys;
use bozor_auth::{
    AuthApi, AuthError, AuthorizationGate, Decision, GateConfig, HttpAuthApi, MemorySessionStore,
    ProtectedView, Redirect, RenderState, Requirement, Role, SessionStore,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use time::OffsetDateTime;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mint_access(sub: &str) -> String {
    let exp = OffsetDateTime::now_utc().unix_timestamp() + 300;
    encode(
        &Header::default(),
        &json!({ "exp": exp, "sub": sub, "token_type": "access" }),
        &EncodingKey::from_secret(b"integration"),
    )
    .unwrap()
}

fn config_for(server: &MockServer) -> GateConfig {
    GateConfig::default()
        .with_api_base_url(format!("{}/api", server.uri()))
        .with_request_timeout(Duration::from_secs(2))
}

fn store_with(access: &str, role: Option<&str>, has_company: Option<&str>) -> MemorySessionStore {
    let mut entries = vec![
        (keys::ACCESS, access.to_string()),
        (keys::REFRESH, "refresh-1".to_string()),
    ];
    if let Some(role) = role {
        entries.push((keys::USER_ROLE, role.to_string()));
    }
    if let Some(flag) = has_company {
        entries.push((keys::HAS_COMPANY, flag.to_string()));
    }
    MemorySessionStore::with_entries(entries)
}

async fn mount_refresh(server: &MockServer, new_access: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .and(body_json(json!({ "refresh": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": new_access })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn seller_with_cached_company_is_allowed_without_status_query() {
    let server = MockServer::start().await;
    let fresh = mint_access("seller");
    mount_refresh(&server, &fresh, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/companies/my_status/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with(&mint_access("seller"), Some("sotuvchi"), Some("1"));
    let gate = AuthorizationGate::from_config(Arc::new(store.clone()), config_for(&server)).unwrap();

    let decision = gate.evaluate(Requirement::new(Role::Seller)).await;
    assert_eq!(decision, Decision::Allow);
    assert_eq!(store.get(keys::ACCESS).await.unwrap(), Some(fresh));
}

#[tokio::test]
async fn buyer_requesting_seller_view_goes_to_onboarding() {
    let server = MockServer::start().await;
    let fresh = mint_access("buyer");
    mount_refresh(&server, &fresh, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/companies/my_status/"))
        .and(header("authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "user_role": "sotib_oluvchi", "has_company": false })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(&mint_access("buyer"), Some("sotib_oluvchi"), Some("1"));
    let gate = AuthorizationGate::from_config(Arc::new(store.clone()), config_for(&server)).unwrap();

    let decision = gate.evaluate(Requirement::new(Role::Seller)).await;
    assert_eq!(decision, Decision::Deny(Redirect::CompanyOnboarding));

    let entries = store.snapshot();
    assert_eq!(entries[keys::USER_ROLE], "sotib_oluvchi");
    assert_eq!(entries[keys::HAS_COMPANY], "0");
}

#[tokio::test]
async fn empty_session_goes_to_login_without_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let gate = AuthorizationGate::from_config(
        Arc::new(MemorySessionStore::new()),
        config_for(&server),
    )
    .unwrap();

    let decision = gate.evaluate(Requirement::new(Role::Seller)).await;
    assert_eq!(decision, Decision::Deny(Redirect::Login));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn rejected_refresh_denies_without_status_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Token is invalid or expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/companies/my_status/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with(&mint_access("seller"), Some("sotuvchi"), Some("1"));
    let gate = AuthorizationGate::from_config(Arc::new(store), config_for(&server)).unwrap();

    let decision = gate.evaluate(Requirement::new(Role::Seller)).await;
    assert_eq!(decision, Decision::Deny(Redirect::CompanyOnboarding));
}

#[tokio::test]
async fn status_query_refreshes_snapshot_once() {
    let server = MockServer::start().await;
    mount_refresh(&server, &mint_access("seller"), 2).await;
    Mock::given(method("GET"))
        .and(path("/api/companies/my_status/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "user_role": "SOTUVCHI", "has_company": "1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with(&mint_access("seller"), None, None);
    let gate = AuthorizationGate::from_config(Arc::new(store.clone()), config_for(&server)).unwrap();

    assert!(gate.evaluate(Requirement::new(Role::Seller)).await.is_allowed());
    assert!(gate.evaluate(Requirement::new(Role::Seller)).await.is_allowed());

    let entries = store.snapshot();
    assert_eq!(entries[keys::USER_ROLE], "SOTUVCHI");
    assert_eq!(entries[keys::HAS_COMPANY], "1");
}

#[tokio::test]
async fn malformed_status_body_denies() {
    let server = MockServer::start().await;
    mount_refresh(&server, &mint_access("seller"), 1).await;
    Mock::given(method("GET"))
        .and(path("/api/companies/my_status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "sotuvchi" })))
        .mount(&server)
        .await;

    let store = store_with(&mint_access("seller"), None, None);
    let gate = AuthorizationGate::from_config(Arc::new(store.clone()), config_for(&server)).unwrap();

    let decision = gate.evaluate(Requirement::new(Role::Seller)).await;
    assert_eq!(decision, Decision::Deny(Redirect::CompanyOnboarding));
    assert!(store.get(keys::USER_ROLE).await.unwrap().is_none());
}

#[tokio::test]
async fn http_api_maps_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/companies/my_status/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(&config_for(&server)).unwrap();

    let err = api.refresh("refresh-1").await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshRejected { .. }));

    let err = api.company_status("access").await.unwrap_err();
    assert!(matches!(err, AuthError::StatusQueryFailed { .. }));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": mint_access("seller") }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server).with_request_timeout(Duration::from_millis(100));
    let store = store_with(&mint_access("seller"), Some("sotuvchi"), Some("1"));
    let gate = AuthorizationGate::from_config(Arc::new(store), config).unwrap();

    let started = std::time::Instant::now();
    let decision = gate.evaluate(Requirement::new(Role::Seller)).await;
    assert_eq!(decision, Decision::Deny(Redirect::CompanyOnboarding));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn protected_view_renders_content() {
    let server = MockServer::start().await;
    mount_refresh(&server, &mint_access("buyer"), 1).await;

    let store = store_with(&mint_access("buyer"), Some("sotib_oluvchi"), Some("1"));
    let gate = AuthorizationGate::from_config(Arc::new(store), config_for(&server)).unwrap();

    let view = ProtectedView::mount(Arc::new(gate), Requirement::default());
    assert_eq!(view.resolved().await, RenderState::Content);
}

#[test]
fn invalid_base_url_is_configuration_error() {
    let config = GateConfig::default().with_api_base_url("::not a url::");
    let err = HttpAuthApi::new(&config).unwrap_err();
    assert!(matches!(err, AuthError::Configuration { .. }));
}
