//! Async client for the Dyson cloud API.
//!
//! Two surfaces:
//! - [`CloudAccount`] — regional-host selection, email-OTP challenge/verify
//!   login, on-disk credential caching, and account device enumeration.
//! - [`devices`] — manifest descriptors and their classification into the
//!   known appliance kinds.
//!
//! The device-local protocol (MQTT over the LAN) is *not* part of this crate;
//! `purelink-core` models it as an opaque connect/read/disconnect trait.

pub mod account;
pub mod cache;
pub mod devices;
pub mod error;
pub mod transport;

pub use account::{AccountCredentials, CloudAccount, LoginChallenge, Session, UserStatus};
pub use cache::{CachedLogin, CredentialCache};
pub use devices::{Device, DeviceKind, DeviceRecord, DiscoveryPolicy};
pub use error::Error;
pub use transport::TransportConfig;
