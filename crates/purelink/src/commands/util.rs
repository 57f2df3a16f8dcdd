//! Shared helpers for command handlers.

use dialoguer::Input;
use secrecy::SecretString;

use purelink_api::{AccountCredentials, CloudAccount, TransportConfig};
use purelink_config::{Config, ConfigError, Profile};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The profile name in effect: `--profile` flag, then the config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve email and country from flags and the named profile.
///
/// With `allow_prompt` a missing email falls back to an interactive
/// prompt; otherwise it is an error (the command cannot proceed).
pub fn resolve_account(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
    allow_prompt: bool,
) -> Result<(String, String), CliError> {
    let profile = cfg.profiles.get(profile_name);

    let email = global.email.clone().or_else(|| {
        profile
            .map(|p| p.email.clone())
            .filter(|e| !e.is_empty())
    });
    let email = match email {
        Some(e) => e,
        None if allow_prompt => Input::new().with_prompt("Account email").interact_text()?,
        None => {
            return Err(CliError::ProfileNotFound {
                name: profile_name.into(),
            });
        }
    };

    let country = global
        .country
        .clone()
        .or_else(|| profile.map(|p| p.country.clone()))
        .unwrap_or_else(|| "US".into());

    Ok((email, country))
}

/// Resolve the account password. `need_password: false` commands get an
/// empty secret (the unauthenticated endpoints and cache restore never
/// send it).
pub fn resolve_password(
    cfg: &Config,
    profile_name: &str,
    need_password: bool,
    allow_prompt: bool,
) -> Result<SecretString, CliError> {
    if !need_password {
        return Ok(SecretString::from(String::new()));
    }

    let empty = Profile::default();
    let profile = cfg.profiles.get(profile_name).unwrap_or(&empty);
    match purelink_config::resolve_password(profile, profile_name) {
        Ok(secret) => Ok(secret),
        Err(ConfigError::NoCredentials { .. }) if allow_prompt => {
            let pw = rpassword::prompt_password("Account password: ")?;
            Ok(SecretString::from(pw))
        }
        Err(e) => Err(e.into()),
    }
}

/// Build a `CloudAccount` for the active profile with flag overrides.
pub fn build_account(
    global: &GlobalOpts,
    need_password: bool,
    allow_prompt: bool,
) -> Result<(CloudAccount, String), CliError> {
    let cfg = purelink_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let (email, country) = resolve_account(global, &cfg, &profile_name, allow_prompt)?;
    purelink_config::validate_country(&country)?;
    let password = resolve_password(&cfg, &profile_name, need_password, allow_prompt)?;

    let credentials = AccountCredentials::new(email, password, country);
    let account = CloudAccount::new(credentials, &TransportConfig::default())?;
    Ok((account, profile_name))
}
