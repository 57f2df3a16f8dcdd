//! `purelink status` -- account registration status and local session state.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

use purelink_api::CredentialCache;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StatusView {
    email: String,
    country: String,
    account_status: Option<String>,
    authentication_method: Option<String>,
    session_cached: bool,
    cached_at: Option<DateTime<Utc>>,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (account, _) = util::build_account(global, false, false)?;
    let status = account.get_user_status().await?;

    let creds = account.credentials();
    let cache_key = CredentialCache::account_key(&creds.email, &creds.country);
    let cached_at = CredentialCache::new()?
        .load(&cache_key)?
        .map(|entry| entry.saved_at);

    let view = StatusView {
        email: creds.email.clone(),
        country: creds.country.clone(),
        account_status: status.account_status,
        authentication_method: status.authentication_method,
        session_cached: cached_at.is_some(),
        cached_at,
    };

    let color = output::should_color(&global.color);
    let rendered = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| v.email.clone(),
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn detail(view: &StatusView, color: bool) -> String {
    let session = match view.cached_at {
        Some(at) => format!("cached since {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => "none (run 'purelink login')".into(),
    };
    let session = if color && view.session_cached {
        session.green().to_string()
    } else {
        session
    };
    format!(
        "Account:  {} ({})\nStatus:   {}\nAuth:     {}\nSession:  {}",
        view.email,
        view.country,
        view.account_status.as_deref().unwrap_or("-"),
        view.authentication_method.as_deref().unwrap_or("-"),
        session,
    )
}
