//! Clap derive structures for the `purelink` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// purelink -- Dyson cloud account and appliance CLI
#[derive(Debug, Parser)]
#[command(
    name = "purelink",
    version,
    about = "Manage a Dyson cloud account and its Pure Cool appliances",
    long_about = "Log in to the Dyson cloud (email one-time-code flow), cache the\n\
        session locally, and enumerate the appliances registered to the account.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "PURELINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Account email (overrides profile)
    #[arg(long, env = "PURELINK_EMAIL", global = true)]
    pub email: Option<String>,

    /// Two-letter country code, e.g. GB or CN (overrides profile)
    #[arg(long, env = "PURELINK_COUNTRY", global = true)]
    pub country: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PURELINK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to the cloud account (emails a one-time code)
    Login(LoginArgs),

    /// Drop the cached session for the account
    Logout,

    /// Look up the account's registration status
    Status,

    /// Show the cloud API version
    Version,

    /// List appliances registered to the account
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// One-time code from the verification email (prompted if omitted)
    #[arg(long)]
    pub otp: Option<String>,

    /// Re-run the full login even if a cached session exists
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Store the password in the system keyring
    #[arg(long)]
    pub save_password: bool,
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Use the historical double-pass listing (newer appliances appear
    /// twice, once per generation)
    #[arg(long, short = 'a')]
    pub all: bool,
}
