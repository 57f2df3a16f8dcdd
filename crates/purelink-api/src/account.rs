// Cloud account client
//
// Regional host selection, the two-phase challenge/verify login, credential
// cache restore, and device manifest enumeration. Every response funnels
// through one status-mapping helper so the 429/401 taxonomy is uniform
// across endpoints.

use std::collections::HashMap;
use std::sync::RwLock;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::cache::CredentialCache;
use crate::devices::{Device, DeviceRecord, DiscoveryPolicy, classify_manifest};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Default regional API host.
pub const API_HOST: &str = "https://appapi.cp.dyson.com/";
/// API host for accounts registered in China.
pub const API_HOST_CN: &str = "https://appapi.cp.dyson.cn/";

const VERSION_PATH: &str = "v1/provisioningservice/application/Android/version";
const USERSTATUS_PATH: &str = "v3/userregistration/email/userstatus";
const CHALLENGE_PATH: &str = "v3/userregistration/email/auth";
const VERIFY_PATH: &str = "v3/userregistration/email/verify";
const MANIFEST_PATH: &str = "v2/provisioningservice/manifest";

/// Account credentials. Immutable once constructed; the country code is a
/// case-sensitive two-letter code and selects the regional host (`"CN"`
/// routes to the China host, everything else to the default).
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub email: String,
    pub password: SecretString,
    pub country: String,
}

impl AccountCredentials {
    pub fn new(
        email: impl Into<String>,
        password: SecretString,
        country: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password,
            country: country.into(),
        }
    }

    /// The regional API host for this account's country.
    pub fn api_host(&self) -> &'static str {
        if self.country == "CN" {
            API_HOST_CN
        } else {
            API_HOST
        }
    }
}

/// Transient handle between the challenge and verify steps.
///
/// Obtaining the one-time code is the caller's job (the code arrives by
/// email); the host surfaces its own prompt instead of this crate blocking
/// a worker thread on stdin.
#[derive(Debug, Clone)]
pub struct LoginChallenge {
    pub challenge_id: String,
}

/// Authenticated session state, parsed from the verify response body.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: String,
    pub token: SecretString,
    pub token_type: String,
    /// Whether this session came from the on-disk cache. Drives the
    /// 401 -> stale-vs-invalid distinction.
    pub from_cache: bool,
}

/// Parsed user-status response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    pub account_status: Option<String>,
    pub authentication_method: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChallengeResponse {
    challenge_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyBody {
    account: String,
    token: String,
    token_type: String,
}

/// Client for one Dyson cloud account.
///
/// Lifecycle: construct -> [`restore_session`](Self::restore_session) or
/// [`begin_login`](Self::begin_login) + [`complete_login`](Self::complete_login)
/// -> [`list_devices`](Self::list_devices). The session is established once
/// and read-only afterwards; mid-lifetime token refresh is not implemented.
pub struct CloudAccount {
    http: reqwest::Client,
    base_url: Url,
    credentials: AccountCredentials,
    cache: CredentialCache,
    discovery: DiscoveryPolicy,
    session: RwLock<Option<Session>>,
}

impl CloudAccount {
    /// Create a client for `credentials`, with the platform credential
    /// cache and the default (deduplicated) discovery policy.
    pub fn new(credentials: AccountCredentials, transport: &TransportConfig) -> Result<Self, Error> {
        let cache = CredentialCache::new()?;
        Self::with_cache(credentials, transport, cache)
    }

    /// Create a client with an explicit credential cache.
    pub fn with_cache(
        credentials: AccountCredentials,
        transport: &TransportConfig,
        cache: CredentialCache,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(credentials.api_host())?;
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            credentials,
            cache,
            discovery: DiscoveryPolicy::default(),
            session: RwLock::new(None),
        })
    }

    /// Override the base URL. Test seam for pointing at a mock server.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Select the discovery policy applied by [`list_devices`](Self::list_devices).
    pub fn with_discovery_policy(mut self, policy: DiscoveryPolicy) -> Self {
        self.discovery = policy;
        self
    }

    /// The API base URL in effect.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The account credentials this client was built from.
    pub fn credentials(&self) -> &AccountCredentials {
        &self.credentials
    }

    /// A snapshot of the current session, if authenticated.
    pub fn session(&self) -> Option<Session> {
        self.session.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    // ── Unauthenticated endpoints ────────────────────────────────────

    /// Retrieve the cloud API version string. Raw response body.
    pub async fn get_api_version(&self) -> Result<String, Error> {
        let url = self.endpoint(VERSION_PATH)?;
        debug!(%url, "fetching API version");
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        self.process_response(resp).await
    }

    /// Look up the account's status and authentication method.
    pub async fn get_user_status(&self) -> Result<UserStatus, Error> {
        let url = self.endpoint(USERSTATUS_PATH)?;
        debug!(%url, "fetching user status");
        let resp = self
            .http
            .post(url)
            .json(&json!({ "Email": self.credentials.email }))
            .send()
            .await
            .map_err(Error::Transport)?;
        let body = self.process_response(resp).await?;
        parse_json(&body)
    }

    // ── Login ────────────────────────────────────────────────────────

    /// Try to restore a session from the credential cache.
    ///
    /// Purely local: no network call, and no validation that the cached
    /// token is still accepted -- a stale token surfaces later as
    /// [`Error::StaleCredentials`] on the first authenticated request.
    /// Returns `Ok(false)` when no entry exists for this account.
    pub fn restore_session(&self) -> Result<bool, Error> {
        let Some(entry) = self.cache.load(&self.cache_key())? else {
            return Ok(false);
        };
        let session = parse_verify_body(&entry.body, true)?;
        debug!(account = %session.account, "session restored from credential cache");
        *self.session.write().expect("session lock poisoned") = Some(session);
        Ok(true)
    }

    /// Phase one: request an OTP challenge. The code is emailed to the
    /// account address.
    pub async fn begin_login(&self) -> Result<LoginChallenge, Error> {
        let url = self.endpoint(CHALLENGE_PATH)?;
        debug!(%url, "requesting login challenge");
        let resp = self
            .http
            .post(url)
            .json(&json!({ "Email": self.credentials.email }))
            .send()
            .await
            .map_err(Error::Transport)?;
        let body = self.process_response(resp).await?;
        let challenge: ChallengeResponse = parse_json(&body)?;
        Ok(LoginChallenge {
            challenge_id: challenge.challenge_id,
        })
    }

    /// Phase two: exchange credentials + OTP code for a bearer token.
    ///
    /// On success the raw verify response body is persisted byte-for-byte
    /// into the credential cache under this account's key, then parsed
    /// into the live session.
    pub async fn complete_login(
        &self,
        challenge: &LoginChallenge,
        otp_code: &str,
    ) -> Result<(), Error> {
        let url = self.endpoint(VERIFY_PATH)?;
        debug!(%url, "verifying login challenge");
        let resp = self
            .http
            .post(url)
            .json(&json!({
                "Email": self.credentials.email,
                "Password": self.credentials.password.expose_secret(),
                "challengeId": challenge.challenge_id,
                "otpCode": otp_code,
            }))
            .send()
            .await
            .map_err(Error::Transport)?;
        let body = self.process_response(resp).await?;

        self.cache.store(&self.cache_key(), &body)?;
        let session = parse_verify_body(&body, false)?;
        debug!(account = %session.account, "login successful");
        *self.session.write().expect("session lock poisoned") = Some(session);
        Ok(())
    }

    /// Drop the live session and delete this account's cache entry.
    pub fn logout(&self) -> Result<(), Error> {
        self.cache.remove(&self.cache_key())?;
        *self.session.write().expect("session lock poisoned") = None;
        debug!("logged out");
        Ok(())
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// List all appliances registered to the account, classified per the
    /// active [`DiscoveryPolicy`].
    ///
    /// Fails with [`Error::NotAuthenticated`] before touching the network
    /// when no session is established.
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        let auth_header = {
            let guard = self.session.read().expect("session lock poisoned");
            let session = guard.as_ref().ok_or(Error::NotAuthenticated)?;
            format!("{} {}", session.token_type, session.token.expose_secret())
        };

        let url = self.endpoint(MANIFEST_PATH)?;
        debug!(%url, "fetching device manifest");
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, auth_header)
            .send()
            .await
            .map_err(Error::Transport)?;
        let body = self.process_response(resp).await?;

        let records: Vec<DeviceRecord> = parse_json(&body)?;
        debug!(count = records.len(), "manifest fetched");
        Ok(classify_manifest(records, self.discovery))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn cache_key(&self) -> String {
        CredentialCache::account_key(&self.credentials.email, &self.credentials.country)
    }

    /// Build a full endpoint URL with the mandatory `country` parameter.
    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair("country", &self.credentials.country);
        Ok(url)
    }

    /// The shared status mapping applied to every response:
    /// 429 -> rate limited, 401 -> stale or invalid depending on whether
    /// the session came from cache, other non-2xx -> `Api` with the status
    /// and canonical reason unchanged. Success returns the body text.
    async fn process_response(&self, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(Error::RateLimited { retry_after_secs });
        }

        if status == StatusCode::UNAUTHORIZED {
            let from_cache = self
                .session
                .read()
                .expect("session lock poisoned")
                .as_ref()
                .is_some_and(|s| s.from_cache);
            return Err(if from_cache {
                Error::StaleCredentials
            } else {
                Error::InvalidCredentials
            });
        }

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_owned(),
            });
        }

        resp.text().await.map_err(Error::Transport)
    }
}

impl std::fmt::Debug for CloudAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudAccount")
            .field("base_url", &self.base_url.as_str())
            .field("email", &self.credentials.email)
            .field("country", &self.credentials.country)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

fn parse_verify_body(body: &str, from_cache: bool) -> Result<Session, Error> {
    let parsed: VerifyBody = parse_json(body)?;
    Ok(Session {
        account: parsed.account,
        token: SecretString::from(parsed.token),
        token_type: parsed.token_type,
        from_cache,
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}
