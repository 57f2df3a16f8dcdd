//! `purelink logout` -- drop the cached session for the active profile.
//!
//! Purely local: the vendor API has no session-revocation endpoint.

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (account, profile_name) = util::build_account(global, false, false)?;
    account.logout()?;
    if !global.quiet {
        eprintln!("Logged out of profile '{profile_name}'");
    }
    Ok(())
}
