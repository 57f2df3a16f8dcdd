// ── Periodic device monitor ──
//
// The schedulable unit the host drives: one poll per interval tick,
// latest sample published over a watch channel. A failed tick publishes
// `None` (entity unavailable) and the next good tick recovers it; poll
// failures are logged, never fatal.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::PollerConfig;
use crate::fan::FanState;
use crate::link::DeviceLink;
use crate::poller;

/// Handle to a spawned polling task.
///
/// Ticks are serial by construction -- one loop, one poll at a time.
/// Dropping the handle without [`shutdown`](Self::shutdown) cancels the
/// task on its next tick boundary.
pub struct Monitor {
    state_rx: watch::Receiver<Option<FanState>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Monitor {
    /// Spawn the poll loop for `link`. The first poll runs immediately,
    /// then one per `config.poll_interval`.
    pub fn spawn(link: Arc<dyn DeviceLink>, config: PollerConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_task(link, config, state_tx, cancel.clone()));
        Self {
            state_rx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Subscribe to state updates. `None` = entity unavailable.
    pub fn subscribe(&self) -> watch::Receiver<Option<FanState>> {
        self.state_rx.clone()
    }

    /// The most recently published sample.
    pub fn latest(&self) -> Option<FanState> {
        *self.state_rx.borrow()
    }

    /// Cancel the poll loop and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        debug!("monitor stopped");
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_task(
    link: Arc<dyn DeviceLink>,
    config: PollerConfig,
    state_tx: watch::Sender<Option<FanState>>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(config.poll_interval);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match poller::poll(link.as_ref(), config.timeout).await {
                    Ok(state) => {
                        let _ = state_tx.send(Some(state));
                    }
                    Err(e) => {
                        warn!(device = link.name(), error = %e, "poll failed -- marking unavailable");
                        let _ = state_tx.send(None);
                    }
                }
            }
        }
    }
}
