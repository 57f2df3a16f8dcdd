//! `purelink login` -- restore a cached session or run the two-phase
//! challenge/verify flow.

use dialoguer::Input;
use secrecy::ExposeSecret;

use purelink_api::{AccountCredentials, CloudAccount, TransportConfig};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = purelink_config::load_config_or_default();
    let profile_name = util::active_profile_name(global, &cfg);
    let (email, country) = util::resolve_account(global, &cfg, &profile_name, true)?;
    purelink_config::validate_country(&country)?;
    let password = util::resolve_password(&cfg, &profile_name, true, true)?;

    let credentials = AccountCredentials::new(email.clone(), password.clone(), country.clone());
    let account = CloudAccount::new(credentials, &TransportConfig::default())?;

    if !args.force && account.restore_session()? {
        if let Some(session) = account.session() {
            if !global.quiet {
                eprintln!(
                    "Already logged in as {} (cached session; use --force to re-authenticate)",
                    session.account
                );
            }
        }
    } else {
        let status = account.get_user_status().await?;
        if let Some(ref account_status) = status.account_status {
            if account_status != "ACTIVE" {
                tracing::warn!(%account_status, "account is not active");
            }
        }

        let challenge = account.begin_login().await?;
        let otp = if let Some(code) = args.otp {
            code
        } else {
            Input::new()
                .with_prompt(format!("One-time code sent to {email}"))
                .interact_text()?
        };
        account.complete_login(&challenge, otp.trim()).await?;

        if let Some(session) = account.session() {
            if !global.quiet {
                eprintln!("Logged in as {}", session.account);
            }
        }
    }

    // Persist the profile so later commands can run without flags.
    let entry = cfg.profiles.entry(profile_name.clone()).or_default();
    entry.email = email;
    entry.country = country;
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    }
    purelink_config::save_config(&cfg)?;

    if args.save_password {
        purelink_config::store_password(&profile_name, password.expose_secret())?;
        if !global.quiet {
            eprintln!("Password stored in the system keyring");
        }
    }

    Ok(())
}
