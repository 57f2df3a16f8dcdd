//! CLI error types with miette diagnostics.
//!
//! Maps `purelink_api::Error` and `ConfigError` variants into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use purelink_config::ConfigError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const RATE_LIMITED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(
        code(purelink::not_logged_in),
        help("Run: purelink login")
    )]
    NotLoggedIn,

    #[error("Cached session was rejected by the cloud")]
    #[diagnostic(
        code(purelink::stale_session),
        help("The saved token has expired or the password changed.\nRun: purelink login --force")
    )]
    StaleSession,

    #[error("Login rejected")]
    #[diagnostic(
        code(purelink::auth_failed),
        help("Check the email address, password, and one-time code, then retry.")
    )]
    AuthFailed,

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(purelink::no_credentials),
        help(
            "Set PURELINK_PASSWORD, add password_env to the profile,\n\
             or run: purelink login --save-password"
        )
    )]
    NoCredentials { profile: String },

    // ── Cloud API ────────────────────────────────────────────────────
    #[error("Rate limited by the cloud API")]
    #[diagnostic(
        code(purelink::rate_limited),
        help("Too many requests. Wait{wait} and retry.")
    )]
    RateLimited { wait: String },

    #[error("Cloud API error ({status}): {reason}")]
    #[diagnostic(code(purelink::api_error))]
    ApiError { status: u16, reason: String },

    #[error("Could not reach the cloud API")]
    #[diagnostic(
        code(purelink::connection_failed),
        help("Check your network connection. The vendor hosts are regional;\nverify the profile's country code.")
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unexpected response from the cloud API: {message}")]
    #[diagnostic(code(purelink::bad_response))]
    BadResponse { message: String },

    // ── Configuration / input ────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(purelink::validation))]
    Validation { field: String, reason: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(purelink::profile_not_found),
        help("Create it with: purelink login --profile {name}")
    )]
    ProfileNotFound { name: String },

    #[error(transparent)]
    #[diagnostic(code(purelink::config))]
    Config(ConfigError),

    // ── IO / interactive ─────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Prompt failed: {0}")]
    #[diagnostic(code(purelink::prompt))]
    Prompt(#[from] dialoguer::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotLoggedIn
            | Self::StaleSession
            | Self::AuthFailed
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::RateLimited { .. } => exit_code::RATE_LIMITED,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── purelink_api::Error → CliError mapping ───────────────────────────

impl From<purelink_api::Error> for CliError {
    fn from(err: purelink_api::Error) -> Self {
        use purelink_api::Error;
        match err {
            Error::NotAuthenticated => Self::NotLoggedIn,
            Error::StaleCredentials => Self::StaleSession,
            Error::InvalidCredentials => Self::AuthFailed,
            Error::RateLimited { retry_after_secs } => Self::RateLimited {
                wait: retry_after_secs.map_or_else(String::new, |s| format!(" {s}s")),
            },
            Error::Api { status, reason } => Self::ApiError { status, reason },
            Error::Transport(e) => Self::ConnectionFailed { source: e.into() },
            Error::Deserialization { message, .. } => Self::BadResponse { message },
            Error::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
            Error::Cache(e) => Self::Io(e),
            Error::NoCacheDir => Self::Validation {
                field: "cache".into(),
                reason: "no usable cache directory on this platform".into(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { profile } => Self::ProfileNotFound { name: profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
