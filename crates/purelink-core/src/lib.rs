//! Domain layer for purelink: fan state model, the opaque device-link
//! trait, the single-shot poll operation, and the periodic [`Monitor`]
//! that publishes samples over a watch channel.
//!
//! The cloud side (login, manifest) lives in `purelink-api`; this crate
//! consumes an already-discovered device handle and produces one fresh
//! [`FanState`] per scheduled tick.

pub mod config;
pub mod error;
pub mod fan;
pub mod link;
pub mod monitor;
pub mod poller;

pub use config::PollerConfig;
pub use error::CoreError;
pub use fan::{FanPower, FanState};
pub use link::{DeviceLink, LinkError};
pub use monitor::Monitor;
pub use poller::poll;
