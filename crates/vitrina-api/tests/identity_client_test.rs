// Integration tests for `IdentityClient` using wiremock.
#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrina_api::IdentityClient;

async fn setup() -> (MockServer, IdentityClient) {
    let server = MockServer::start().await;
    let client = IdentityClient::from_reqwest(
        &format!("{}/v1", server.uri()),
        SecretString::from("api-key".to_owned()),
        reqwest::Client::new(),
    )
    .unwrap();
    (server, client)
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

#[tokio::test]
async fn test_sign_in_with_password() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "api-key"))
        .and(body_partial_json(json!({ "email": "ana@example.com", "returnSecureToken": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "u1",
            "email": "ana@example.com",
            "idToken": "id-tok",
            "refreshToken": "ref-tok",
            "registered": true
        })))
        .mount(&server)
        .await;

    let session = client
        .sign_in_with_password("ana@example.com", &secret("hunter22"))
        .await
        .unwrap();

    assert_eq!(session.uid, "u1");
    assert_eq!(session.id_token.expose_secret(), "id-tok");
    assert!(session.email_verified.is_none());
}

#[tokio::test]
async fn test_provider_error_code_surfaces() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "INVALID_PASSWORD" }
        })))
        .mount(&server)
        .await;

    let err = client
        .sign_in_with_password("ana@example.com", &secret("nope"))
        .await
        .unwrap_err();
    assert_eq!(err.identity_code(), Some("INVALID_PASSWORD"));
}

#[tokio::test]
async fn test_lookup_reports_verification() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .and(body_partial_json(json!({ "idToken": "id-tok" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "localId": "u1", "email": "ana@example.com", "emailVerified": false }]
        })))
        .mount(&server)
        .await;

    let info = client.lookup(&secret("id-tok")).await.unwrap();
    assert!(!info.email_verified);
}

#[tokio::test]
async fn test_password_reset_roundtrip() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:sendOobCode"))
        .and(body_partial_json(json!({ "requestType": "PASSWORD_RESET" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "ana@example.com" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:resetPassword"))
        .and(body_partial_json(json!({ "oobCode": "code-1", "newPassword": "nueva123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "ana@example.com" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:resetPassword"))
        .and(body_partial_json(json!({ "oobCode": "stale" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "EXPIRED_OOB_CODE" }
        })))
        .mount(&server)
        .await;

    client.send_password_reset("ana@example.com").await.unwrap();
    let email = client
        .confirm_password_reset("code-1", &secret("nueva123"))
        .await
        .unwrap();
    assert_eq!(email, "ana@example.com");

    let err = client.verify_password_reset_code("stale").await.unwrap_err();
    assert_eq!(err.identity_code(), Some("EXPIRED_OOB_CODE"));
}
