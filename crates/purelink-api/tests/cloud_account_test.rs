#![allow(clippy::unwrap_used)]
// Integration tests for `CloudAccount` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use purelink_api::{
    AccountCredentials, CloudAccount, CredentialCache, DeviceKind, DiscoveryPolicy, Error,
    TransportConfig, account,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn credentials(country: &str) -> AccountCredentials {
    AccountCredentials::new("a@b.com", SecretString::from("p".to_string()), country)
}

async fn setup() -> (MockServer, tempfile::TempDir, CloudAccount) {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let cache = CredentialCache::with_root(dir.path());
    let account =
        CloudAccount::with_cache(credentials("DE"), &TransportConfig::default(), cache.clone())
            .unwrap()
            .with_base_url(Url::parse(&server.uri()).unwrap());
    (server, dir, account)
}

const VERIFY_BODY: &str =
    r#"{"account":"acct-1","token":"tok-1","tokenType":"Bearer","tokenExpiry":"never"}"#;

// ── Host routing ────────────────────────────────────────────────────

#[test]
fn test_country_selects_regional_host() {
    assert_eq!(credentials("CN").api_host(), account::API_HOST_CN);
    assert_eq!(credentials("DE").api_host(), account::API_HOST);
    assert_eq!(credentials("US").api_host(), account::API_HOST);
    // Case-sensitive: lowercase "cn" is not the China host.
    assert_eq!(credentials("cn").api_host(), account::API_HOST);
}

// ── Unauthenticated endpoints ───────────────────────────────────────

#[tokio::test]
async fn test_api_version_returns_raw_body() {
    let (server, _dir, account) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/provisioningservice/application/Android/version"))
        .and(query_param("country", "DE"))
        .respond_with(ResponseTemplate::new(200).set_body_string("21.04.03"))
        .mount(&server)
        .await;

    assert_eq!(account.get_api_version().await.unwrap(), "21.04.03");
}

#[tokio::test]
async fn test_user_status_parses_fields() {
    let (server, _dir, account) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v3/userregistration/email/userstatus"))
        .and(body_partial_json(json!({ "Email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accountStatus": "ACTIVE",
            "authenticationMethod": "EMAIL_PWD_2FA"
        })))
        .mount(&server)
        .await;

    let status = account.get_user_status().await.unwrap();
    assert_eq!(status.account_status.as_deref(), Some("ACTIVE"));
    assert_eq!(
        status.authentication_method.as_deref(),
        Some("EMAIL_PWD_2FA")
    );
}

// ── Status mapping ──────────────────────────────────────────────────

#[tokio::test]
async fn test_any_2xx_status_is_success() {
    let (server, _dir, account) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(201).set_body_string("21.04.03"))
        .mount(&server)
        .await;

    assert_eq!(account.get_api_version().await.unwrap(), "21.04.03");
}

#[tokio::test]
async fn test_non_200_maps_to_api_error_with_status_and_reason() {
    let (server, _dir, account) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    match account.get_api_version().await {
        Err(Error::Api { status, ref reason }) => {
            assert_eq!(status, 503);
            assert_eq!(reason, "Service Unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_429_maps_to_rate_limited() {
    let (server, _dir, account) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
        .mount(&server)
        .await;

    match account.get_api_version().await {
        Err(Error::RateLimited { retry_after_secs }) => {
            assert_eq!(retry_after_secs, Some(120));
        }
        other => panic!("expected RateLimited, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_401_without_cached_session_is_invalid_credentials() {
    let (server, _dir, account) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = account.begin_login().await;
    assert!(
        matches!(result, Err(Error::InvalidCredentials)),
        "expected InvalidCredentials, got: {result:?}"
    );
}

#[tokio::test]
async fn test_401_with_cached_session_is_stale_credentials() {
    let (server, dir, account) = setup().await;

    let cache = CredentialCache::with_root(dir.path());
    cache
        .store(&CredentialCache::account_key("a@b.com", "DE"), VERIFY_BODY)
        .unwrap();
    assert!(account.restore_session().unwrap());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = account.list_devices().await;
    assert!(
        matches!(result, Err(Error::StaleCredentials)),
        "expected StaleCredentials, got: {result:?}"
    );
}

// ── Login flow ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_fresh_login_flow_writes_cache_byte_for_byte() {
    let (server, dir, account) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v3/userregistration/email/auth"))
        .and(query_param("country", "DE"))
        .and(body_partial_json(json!({ "Email": "a@b.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "challengeId": "ch-42" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v3/userregistration/email/verify"))
        .and(body_partial_json(json!({
            "Email": "a@b.com",
            "Password": "p",
            "challengeId": "ch-42",
            "otpCode": "123456"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(VERIFY_BODY))
        .mount(&server)
        .await;

    let challenge = account.begin_login().await.unwrap();
    assert_eq!(challenge.challenge_id, "ch-42");
    assert!(!account.is_authenticated());

    account.complete_login(&challenge, "123456").await.unwrap();

    let session = account.session().unwrap();
    assert_eq!(session.account, "acct-1");
    assert_eq!(session.token.expose_secret(), "tok-1");
    assert_eq!(session.token_type, "Bearer");
    assert!(!session.from_cache);

    // The cache entry is the verify response body, unmodified.
    let cache = CredentialCache::with_root(dir.path());
    let entry = cache
        .load(&CredentialCache::account_key("a@b.com", "DE"))
        .unwrap()
        .expect("cache entry written");
    assert_eq!(entry.body, VERIFY_BODY);
}

#[tokio::test]
async fn test_restore_session_performs_zero_network_calls() {
    let (server, dir, account) = setup().await;

    let cache = CredentialCache::with_root(dir.path());
    cache
        .store(
            &CredentialCache::account_key("a@b.com", "DE"),
            r#"{"account":"X","token":"T","tokenType":"Bearer"}"#,
        )
        .unwrap();

    assert!(account.restore_session().unwrap());

    let session = account.session().unwrap();
    assert_eq!(session.account, "X");
    assert_eq!(session.token.expose_secret(), "T");
    assert_eq!(session.token_type, "Bearer");
    assert!(session.from_cache);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "restore must not touch the network");
}

#[tokio::test]
async fn test_restore_session_misses_for_other_account() {
    let (_server, dir, account) = setup().await;

    // Entry exists, but for a different account.
    let cache = CredentialCache::with_root(dir.path());
    cache
        .store(&CredentialCache::account_key("c@d.com", "DE"), VERIFY_BODY)
        .unwrap();

    assert!(!account.restore_session().unwrap());
    assert!(!account.is_authenticated());
}

#[tokio::test]
async fn test_logout_drops_session_and_cache_entry() {
    let (_server, dir, account) = setup().await;

    let key = CredentialCache::account_key("a@b.com", "DE");
    let cache = CredentialCache::with_root(dir.path());
    cache.store(&key, VERIFY_BODY).unwrap();
    assert!(account.restore_session().unwrap());

    account.logout().unwrap();
    assert!(!account.is_authenticated());
    assert!(cache.load(&key).unwrap().is_none());
}

// ── Device listing ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_before_login_is_not_authenticated_and_offline() {
    let (server, _dir, account) = setup().await;

    let result = account.list_devices().await;
    assert!(
        matches!(result, Err(Error::NotAuthenticated)),
        "expected NotAuthenticated, got: {result:?}"
    );

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty(), "must fail before any network call");
}

fn manifest_body() -> serde_json::Value {
    json!([
        {
            "Serial": "XX1-EU-AAA0001A",
            "Name": "Living room",
            "Version": "21.04.03",
            "ProductType": "438",
            "AutoUpdate": true,
            "NewVersionAvailable": false,
            "LocalCredentials": "blob-1"
        },
        {
            "Serial": "XX1-EU-BBB0002B",
            "Name": "Hallway",
            "Version": "10.01.01",
            "ProductType": "475",
            "LocalCredentials": "blob-2"
        }
    ])
}

fn authenticated(account: &CloudAccount, dir: &tempfile::TempDir) {
    let cache = CredentialCache::with_root(dir.path());
    cache
        .store(&CredentialCache::account_key("a@b.com", "DE"), VERIFY_BODY)
        .unwrap();
    assert!(account.restore_session().unwrap());
}

#[tokio::test]
async fn test_list_devices_sends_bearer_auth_and_classifies() {
    let (server, dir, account) = setup().await;
    authenticated(&account, &dir);

    Mock::given(method("GET"))
        .and(path("/v2/provisioningservice/manifest"))
        .and(query_param("country", "DE"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest_body()))
        .mount(&server)
        .await;

    let devices = account.list_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].kind, DeviceKind::PureCool);
    assert_eq!(devices[0].record.serial, "XX1-EU-AAA0001A");
    assert_eq!(devices[1].kind, DeviceKind::PureCoolLink);
}

#[tokio::test]
async fn test_legacy_double_pass_lists_pure_cool_twice() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let cache = CredentialCache::with_root(dir.path());
    let account =
        CloudAccount::with_cache(credentials("DE"), &TransportConfig::default(), cache).unwrap()
            .with_base_url(Url::parse(&server.uri()).unwrap())
            .with_discovery_policy(DiscoveryPolicy::LegacyDoublePass);
    authenticated(&account, &dir);

    Mock::given(method("GET"))
        .and(path("/v2/provisioningservice/manifest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest_body()))
        .mount(&server)
        .await;

    let devices = account.list_devices().await.unwrap();
    // First pass files both as link generation, second pass re-lists the 438.
    assert_eq!(devices.len(), 3);
    assert_eq!(devices[0].kind, DeviceKind::PureCoolLink);
    assert_eq!(devices[1].kind, DeviceKind::PureCoolLink);
    assert_eq!(devices[2].kind, DeviceKind::PureCool);
    assert_eq!(devices[2].record.serial, "XX1-EU-AAA0001A");
}

#[tokio::test]
async fn test_list_devices_bad_manifest_is_deserialization_error() {
    let (server, dir, account) = setup().await;
    authenticated(&account, &dir);

    Mock::given(method("GET"))
        .and(path("/v2/provisioningservice/manifest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = account.list_devices().await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
