// ── Core error types ──
//
// User-facing errors from purelink-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly; the `From` impls below
// translate transport-layer errors into domain-appropriate variants.

use thiserror::Error;

use crate::link::LinkError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    /// Login/session failure. Surfaces as a setup failure with a
    /// human-readable message, never as a process error.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The cloud asked us to back off. The caller retries on a later tick.
    #[error("Rate limited by the cloud API")]
    RateLimited { retry_after_secs: Option<u64> },

    // ── Polling ──────────────────────────────────────────────────────
    /// The device-local connection could not be opened.
    #[error("Device {device} unreachable: {reason}")]
    DeviceUnreachable { device: String, reason: String },

    /// A network call exceeded its bound. Treated as an ordinary fetch
    /// failure: the entity goes unavailable until the next good tick.
    #[error("Operation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// State read (or disconnect) failed mid-poll.
    #[error("State fetch failed: {message}")]
    FetchFailed { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── API (wrapped, not exposed raw) ───────────────────────────────
    #[error("Cloud API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<purelink_api::Error> for CoreError {
    fn from(err: purelink_api::Error) -> Self {
        match err {
            purelink_api::Error::StaleCredentials
            | purelink_api::Error::InvalidCredentials
            | purelink_api::Error::NotAuthenticated => CoreError::AuthenticationFailed {
                message: err.to_string(),
            },
            purelink_api::Error::RateLimited { retry_after_secs } => {
                CoreError::RateLimited { retry_after_secs }
            }
            purelink_api::Error::Api { status, reason } => CoreError::Api {
                message: reason,
                status: Some(status),
            },
            purelink_api::Error::Transport(ref e) if e.is_timeout() => {
                CoreError::Timeout { timeout_secs: 0 }
            }
            purelink_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            other => CoreError::Api {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<LinkError> for CoreError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::Connect { host, reason } => CoreError::DeviceUnreachable {
                device: host,
                reason,
            },
            LinkError::Read(message) | LinkError::Disconnect(message) => {
                CoreError::FetchFailed { message }
            }
        }
    }
}
