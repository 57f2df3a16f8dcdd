// ── Runtime polling configuration ──
//
// Built by the CLI/host from its own config sources; core never reads
// config files.

use std::time::Duration;

/// Tuning for the periodic device poll.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Wall-clock period between state fetches. The vendor apps observe
    /// 10-30 seconds; shorter intervals risk rate limiting.
    pub poll_interval: Duration,
    /// Bound applied to each connect/read/disconnect step. A timeout is
    /// an ordinary fetch failure, never a hang.
    pub timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(10),
        }
    }
}
