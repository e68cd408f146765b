//! End-to-end tests for the credential handoff.
//!
//! Each test runs the full health → unwrap → write → validate → revoke
//! pipeline through the real `VaultClient` against a wiremock server, and
//! relies on `expect(..)` counts to prove which endpoints were (not) called.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vault_handoff::config::{Config, Credentials, VaultConfig};
use vault_handoff::handoff::{
    run_once, ErrorKind, Handoff, HandoffError, HandoffRequest, HandoffState, RevocationOutcome,
    ValidationError,
};
use vault_handoff::vault::VaultClient;

// ============================================================================
// Test Helpers
// ============================================================================

const WRAPPING_TOKEN: &str = "s.wrapping-abc";
const ACCESS_TOKEN: &str = "tok123";
const PASSPHRASE: &str = "correct horse battery staple";

fn client_for(server: &MockServer) -> VaultClient {
    VaultClient::new(&VaultConfig {
        url: server.uri(),
        ..VaultConfig::default()
    })
    .unwrap()
}

fn request() -> HandoffRequest {
    let mut config = Config::default();
    config.secret.path = "hosts/node01".to_string();
    let credentials =
        Credentials::new(Some(WRAPPING_TOKEN.to_string()), Some(PASSPHRASE.to_string())).unwrap();
    HandoffRequest::new(&config.secret, credentials)
}

fn write_response(version: u64) -> serde_json::Value {
    json!({
        "request_id": "c0ffee",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "created_time": "2024-01-01T00:00:00Z",
            "custom_metadata": null,
            "deletion_time": "",
            "destroyed": false,
            "version": version
        },
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

async fn mount_health(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_unwrap(server: &MockServer, body: serde_json::Value, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/sys/wrapping/unwrap"))
        .and(header("x-vault-token", WRAPPING_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_write(server: &MockServer, response: ResponseTemplate, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/secrets/data/hosts/node01"))
        .and(header("x-vault-token", ACCESS_TOKEN))
        .and(body_json(json!({
            "options": { "cas": 0 },
            "data": { "luks": PASSPHRASE }
        })))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_revoke(server: &MockServer, status: u16, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/auth/token/revoke-self"))
        .and(header("x-vault-token", ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn unwrap_body() -> serde_json::Value {
    json!({ "auth": { "client_token": ACCESS_TOKEN, "renewable": false } })
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn scenario_a_fresh_secret_is_written_and_token_revoked() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;
    mount_unwrap(&server, unwrap_body(), 1).await;
    mount_write(
        &server,
        ResponseTemplate::new(200).set_body_json(write_response(1)),
        1,
    )
    .await;
    mount_revoke(&server, 204, 1).await;

    let client = client_for(&server);
    let summary = Handoff::new(&client).run(&request()).await.unwrap();

    assert_eq!(summary.result.version, Some(1));
    assert_eq!(summary.revocation, RevocationOutcome::Revoked);
}

#[tokio::test]
async fn scenario_b_second_version_fails_validation_but_revokes() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;
    mount_unwrap(&server, unwrap_body(), 1).await;
    mount_write(
        &server,
        ResponseTemplate::new(200).set_body_json(write_response(2)),
        1,
    )
    .await;
    mount_revoke(&server, 204, 1).await;

    let client = client_for(&server);
    let failure = Handoff::new(&client).run(&request()).await.unwrap_err();

    assert_eq!(failure.kind(), ErrorKind::Validation);
    assert!(matches!(
        failure.error,
        HandoffError::Validation(ValidationError::UnexpectedVersion { version: Some(2) })
    ));
    assert_eq!(failure.reached, HandoffState::Written);
    assert_eq!(failure.revocation, RevocationOutcome::Revoked);
}

#[tokio::test]
async fn scenario_c_unhealthy_service_consumes_nothing() {
    let server = MockServer::start().await;
    mount_health(&server, 503).await;
    mount_unwrap(&server, unwrap_body(), 0).await;
    mount_write(
        &server,
        ResponseTemplate::new(200).set_body_json(write_response(1)),
        0,
    )
    .await;
    mount_revoke(&server, 204, 0).await;

    let client = client_for(&server);
    let failure = Handoff::new(&client).run(&request()).await.unwrap_err();

    assert_eq!(failure.kind(), ErrorKind::Rejected);
    assert_eq!(failure.reached, HandoffState::Init);
    assert_eq!(failure.revocation, RevocationOutcome::NotAttempted);
}

// ============================================================================
// Failure semantics
// ============================================================================

#[tokio::test]
async fn unwrap_without_client_token_never_writes() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;
    mount_unwrap(&server, json!({ "auth": null, "data": null }), 1).await;
    mount_write(
        &server,
        ResponseTemplate::new(200).set_body_json(write_response(1)),
        0,
    )
    .await;
    mount_revoke(&server, 204, 0).await;

    let client = client_for(&server);
    let failure = Handoff::new(&client).run(&request()).await.unwrap_err();

    assert_eq!(failure.kind(), ErrorKind::Shape);
    assert_eq!(failure.reached, HandoffState::HealthChecked);
}

#[tokio::test]
async fn cas_conflict_aborts_and_revokes() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;
    mount_unwrap(&server, unwrap_body(), 1).await;
    mount_write(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["check-and-set parameter did not match the current version"]
        })),
        1,
    )
    .await;
    mount_revoke(&server, 204, 1).await;

    let client = client_for(&server);
    let failure = Handoff::new(&client).run(&request()).await.unwrap_err();

    assert_eq!(failure.kind(), ErrorKind::Rejected);
    assert_eq!(failure.revocation, RevocationOutcome::Revoked);

    let chain = format!("{:#}", anyhow::Error::new(failure));
    assert!(chain.contains("check-and-set"));
    assert!(!chain.contains(PASSPHRASE));
    assert!(!chain.contains(ACCESS_TOKEN));
    assert!(!chain.contains(WRAPPING_TOKEN));
}

#[tokio::test]
async fn write_without_data_aborts_before_validation() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;
    mount_unwrap(&server, unwrap_body(), 1).await;
    mount_write(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "warnings": ["odd"] })),
        1,
    )
    .await;
    mount_revoke(&server, 204, 1).await;

    let client = client_for(&server);
    let failure = Handoff::new(&client).run(&request()).await.unwrap_err();

    assert_eq!(failure.kind(), ErrorKind::Shape);
    assert_eq!(failure.reached, HandoffState::Unwrapped);
}

#[tokio::test]
async fn failed_revocation_keeps_success() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;
    mount_unwrap(&server, unwrap_body(), 1).await;
    mount_write(
        &server,
        ResponseTemplate::new(200).set_body_json(write_response(1)),
        1,
    )
    .await;
    mount_revoke(&server, 500, 1).await;

    let client = client_for(&server);
    let summary = Handoff::new(&client).run(&request()).await.unwrap();

    assert!(matches!(summary.revocation, RevocationOutcome::Failed(_)));
}

#[tokio::test]
async fn custom_mount_changes_write_path() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;
    mount_unwrap(&server, unwrap_body(), 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/kv/data/hosts/node01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(write_response(1)))
        .expect(1)
        .mount(&server)
        .await;
    mount_revoke(&server, 204, 1).await;

    let client = VaultClient::new(&VaultConfig {
        url: server.uri(),
        mount: "kv".to_string(),
        ..VaultConfig::default()
    })
    .unwrap();
    let request = HandoffRequest {
        wrapping_token: SecretString::new(WRAPPING_TOKEN.to_string()),
        path: "hosts/node01".to_string(),
        key: "luks".to_string(),
        value: SecretString::new(PASSPHRASE.to_string()),
    };

    Handoff::new(&client).run(&request).await.unwrap();
}

// ============================================================================
// run_once
// ============================================================================

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.vault.url = server.uri();
    config.secret.path = "hosts/node01".to_string();
    config
}

fn credentials() -> Credentials {
    Credentials::new(Some(WRAPPING_TOKEN.to_string()), Some(PASSPHRASE.to_string())).unwrap()
}

#[tokio::test]
async fn run_once_succeeds_when_revocation_fails() {
    let server = MockServer::start().await;
    mount_health(&server, 200).await;
    mount_unwrap(&server, unwrap_body(), 1).await;
    mount_write(
        &server,
        ResponseTemplate::new(200).set_body_json(write_response(1)),
        1,
    )
    .await;
    mount_revoke(&server, 403, 1).await;

    let summary = run_once(&config_for(&server), credentials()).await.unwrap();
    assert!(matches!(summary.revocation, RevocationOutcome::Failed(_)));
}

#[tokio::test]
async fn run_once_fails_on_unhealthy_vault() {
    let server = MockServer::start().await;
    mount_health(&server, 503).await;
    mount_unwrap(&server, unwrap_body(), 0).await;

    let err = run_once(&config_for(&server), credentials()).await.unwrap_err();
    let failure = err.downcast_ref::<vault_handoff::handoff::HandoffFailure>().unwrap();
    assert_eq!(failure.kind(), ErrorKind::Rejected);
}

#[tokio::test]
async fn run_once_rejects_invalid_config_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.secret.path = "hosts/../etc".to_string();

    let err = run_once(&config, credentials()).await.unwrap_err();
    assert!(err.to_string().starts_with("Configuration validation failed"));
}
