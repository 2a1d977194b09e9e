//! Clap derive structures for the `meon` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// meon -- control panel for a messaging-gateway instance
#[derive(Debug, Parser)]
#[command(
    name = "meon",
    version,
    about = "Check, connect and disconnect a messaging-gateway instance",
    long_about = "Operator control panel for a messaging-gateway instance.\n\n\
        Checks connection status, starts a session (scanning the returned\n\
        QR code), refreshes the QR code, and closes the session. Every\n\
        action is recorded in a timestamped history.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "MEON_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Gateway API base URL (overrides profile)
    #[arg(long, short = 'a', env = "MEON_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Basic-auth username
    #[arg(long, short = 'u', env = "MEON_USERNAME", global = true)]
    pub username: Option<String>,

    /// Basic-auth password
    #[arg(long, env = "MEON_PASSWORD", global = true, hide = true)]
    pub password: Option<String>,

    /// Instance name sent as `id`
    #[arg(long, short = 'i', env = "MEON_INSTANCE", global = true)]
    pub instance: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "MEON_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MEON_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from config, else 30]
    #[arg(long, env = "MEON_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Status line plus a history table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text: status, QR payload, history lines (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Check whether the instance is connected
    #[command(alias = "info")]
    Status,

    /// Start a session; shows the QR code to scan when one is returned
    #[command(alias = "login")]
    Connect(QrArgs),

    /// Close the session
    #[command(alias = "logout")]
    Disconnect,

    /// Request a fresh QR code
    #[command(alias = "qrcode", alias = "refresh-qr")]
    Qr(QrArgs),

    /// Run an action by its panel name or alias (Status, Conectar, qr, ...)
    Run(RunArgs),

    /// Interactive control panel
    Panel,

    /// Manage configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct QrArgs {
    /// Write the decoded QR image to this file
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Action name, case-insensitive
    pub action: String,

    #[command(flatten)]
    pub qr: QrArgs,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile with guided setup
    Init,

    /// Show the current configuration (passwords redacted)
    Show,

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
