//! `purelink version` -- show the cloud API version string.

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (account, _) = util::build_account(global, false, false)?;
    let version = account.get_api_version().await?;
    output::print_output(version.trim().trim_matches('"'), global.quiet);
    Ok(())
}
