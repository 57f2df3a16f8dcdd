// ── Device link abstraction ──
//
// The appliance speaks a local protocol (MQTT over the LAN) that is out
// of scope here. This trait is the opaque connect/read/disconnect surface
// the poller drives: connect must precede state access, disconnect must
// always follow.

use async_trait::async_trait;
use thiserror::Error;

use crate::fan::FanState;

/// Failure modes of a device-local connection.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("connect to {host} failed: {reason}")]
    Connect { host: String, reason: String },

    #[error("state read failed: {0}")]
    Read(String),

    #[error("disconnect failed: {0}")]
    Disconnect(String),
}

/// Opaque connection to one appliance on the local network.
///
/// Implementations are expected to be idempotent about `disconnect`:
/// the poller calls it on every exit path, including after failed reads.
#[async_trait]
pub trait DeviceLink: Send + Sync {
    /// Stable identity for logs (hostname or serial).
    fn name(&self) -> &str;

    /// Open the connection. Must be called before [`read_state`](Self::read_state).
    async fn connect(&self) -> Result<(), LinkError>;

    /// Read one state snapshot from the live connection.
    async fn read_state(&self) -> Result<FanState, LinkError>;

    /// Close the connection.
    async fn disconnect(&self) -> Result<(), LinkError>;
}
