// Shared transport configuration for building reqwest::Client instances.
//
// The cloud API fingerprints clients on the User-Agent header, so one
// randomized `android_client_<uuid>` value is generated per process and
// reused for every request.

use std::sync::OnceLock;
use std::time::Duration;

use crate::error::Error;

/// The process-lifetime User-Agent the Dyson cloud expects.
pub fn default_user_agent() -> &'static str {
    static UA: OnceLock<String> = OnceLock::new();
    UA.get_or_init(|| format!("android_client_{}", uuid::Uuid::new_v4()))
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Bound applied to every network call. A timeout surfaces as an
    /// ordinary transport error, never a hang inside a host scheduler.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: default_user_agent().to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(Error::Transport)
    }
}
