use thiserror::Error;

/// Top-level error type for the `purelink-api` crate.
///
/// Covers every failure mode of the cloud client: authentication, transport,
/// the shared HTTP status mapping, and the credential cache.
/// `purelink-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// HTTP 429 from the cloud API. Back off and retry later — the client
    /// itself never retries.
    #[error("Rate limited by the Dyson API -- try again later")]
    RateLimited {
        /// `Retry-After` header value, when the server sent one.
        retry_after_secs: Option<u64>,
    },

    /// HTTP 401 while a cached session was in use. The cache entry should
    /// be invalidated and a fresh login attempted.
    #[error("Cached credentials rejected (HTTP 401) -- re-login required")]
    StaleCredentials,

    /// HTTP 401 on a fresh login flow. Wrong email/password/OTP, or the
    /// client IP is blocked.
    #[error("Invalid credentials or IP blocked (HTTP 401)")]
    InvalidCredentials,

    /// Device listing attempted before a successful login.
    #[error("Not logged in to Dyson web services")]
    NotAuthenticated,

    // ── API ─────────────────────────────────────────────────────────
    /// Any other non-2xx status. Carries the original status code and
    /// canonical reason text unchanged for diagnosis.
    #[error("API request failure (HTTP {status}: {reason})")]
    Api { status: u16, reason: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Credential cache ────────────────────────────────────────────
    /// Reading or writing the on-disk credential cache failed.
    #[error("Credential cache I/O error: {0}")]
    Cache(#[from] std::io::Error),

    /// No platform cache directory could be resolved.
    #[error("No cache directory available on this platform")]
    NoCacheDir,
}

impl Error {
    /// Returns `true` if this error indicates the session is no longer
    /// usable and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::StaleCredentials | Self::NotAuthenticated)
    }

    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }
}
