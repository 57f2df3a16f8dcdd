// ── Single-shot poll ──
//
// One poll = connect, read, disconnect. The disconnect runs on every
// exit path after a successful connect -- a failed read must not leak
// the connection.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::fan::FanState;
use crate::link::{DeviceLink, LinkError};

/// Produce one fresh state sample from `link`.
///
/// Each step is bounded by `timeout`. Connect failures short-circuit
/// (there is nothing to release); once connected, disconnect always runs,
/// and a disconnect failure is logged rather than masking the read result.
pub async fn poll(link: &dyn DeviceLink, timeout: Duration) -> Result<FanState, CoreError> {
    debug!(device = link.name(), "polling device state");

    bounded(timeout, link.connect()).await?;

    let state = bounded(timeout, link.read_state()).await;

    if let Err(e) = bounded(timeout, link.disconnect()).await {
        warn!(device = link.name(), error = %e, "disconnect failed");
    }

    let state = state?;
    debug!(device = link.name(), fan_power = %state.fan_power, "poll complete");
    Ok(state)
}

async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, LinkError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(CoreError::from),
        Err(_) => Err(CoreError::Timeout {
            timeout_secs: timeout.as_secs(),
        }),
    }
}
