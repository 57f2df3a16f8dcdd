//! Command handlers: bridge CLI args -> `purelink_api` calls -> output.

pub mod devices;
pub mod login;
pub mod logout;
pub mod status;
pub mod util;
pub mod version;
