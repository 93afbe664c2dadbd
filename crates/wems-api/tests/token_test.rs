// Token manager tests using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wems_api::{Error, TokenManager, TransportConfig};

fn manager(server: &MockServer) -> TokenManager {
    TokenManager::new(
        Url::parse(&server.uri()).unwrap(),
        "cid".to_owned(),
        "sekret".to_owned().into(),
        &TransportConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn cached_token_skips_network() {
    let server = MockServer::start().await;

    // expect(1): repeated calls within the validity window must not
    // issue a second token request.
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-1"))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = manager(&server);
    assert_eq!(tokens.ensure_valid_token().await.unwrap(), "tok-1");
    assert_eq!(tokens.ensure_valid_token().await.unwrap(), "tok-1");
    assert_eq!(tokens.ensure_valid_token().await.unwrap(), "tok-1");
}

#[tokio::test]
async fn refresh_sends_fixed_super_token_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .and(body_json(json!({
            "application_components": {},
            "client_id": "cid",
            "client_secret": "sekret",
            "endpoints": {},
            "platform_scopes": [],
            "super_token": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-1"))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = manager(&server);
    assert_eq!(tokens.ensure_valid_token().await.unwrap(), "tok-1");
}

#[tokio::test]
async fn failed_refresh_surfaces_auth_error_and_keeps_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream boom"))
        .mount(&server)
        .await;

    let tokens = manager(&server);

    let err = tokens.ensure_valid_token().await.unwrap_err();
    assert!(err.is_auth(), "expected Authentication, got: {err:?}");
    let message = err.to_string();
    assert!(message.contains("500"), "missing status in: {message}");
    assert!(message.contains("upstream boom"), "missing body in: {message}");

    // Nothing was cached by the failed attempt: once the endpoint
    // recovers, the next call refreshes and succeeds.
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-2"))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(tokens.ensure_valid_token().await.unwrap(), "tok-2");
}

#[tokio::test]
async fn unreachable_token_endpoint_is_auth_error() {
    // Point at a closed port; the connection error must surface as
    // Authentication, not a bare transport error.
    let tokens = TokenManager::new(
        Url::parse("http://127.0.0.1:9").unwrap(),
        "cid".to_owned(),
        "sekret".to_owned().into(),
        &TransportConfig::default(),
    )
    .unwrap();

    let err = tokens.ensure_valid_token().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "got: {err:?}");
}
