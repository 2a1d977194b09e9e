//! CLI error types with miette diagnostics.
//!
//! Maps `ActionError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use meon_config::ConfigError;
use meon_core::{ActionError, ActionKind};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Action failures ──────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(meon::validation),
        help(
            "Pass the missing value with --api-url, --instance, --username / --password,\n\
             or store it in a profile: meon config init"
        )
    )]
    Validation { message: String },

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(meon::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Run: meon config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("Could not reach the gateway at {url}")]
    #[diagnostic(
        code(meon::connection_failed),
        help(
            "{hint}\n\
             {message}\n\
             For self-signed certificates use --insecure (-k) or set ca_cert in the profile."
        )
    )]
    ConnectionFailed {
        url: String,
        message: String,
        hint: &'static str,
    },

    #[error("{action} failed: {message}")]
    #[diagnostic(code(meon::action_failed))]
    ActionFailed { action: ActionKind, message: String },

    // ── QR ───────────────────────────────────────────────────────────
    #[error("QR code cannot be saved: {reason}")]
    #[diagnostic(
        code(meon::qr),
        help("Only base64 data URIs (data:image/png;base64,...) can be written to a file.")
    )]
    QrPayload { reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(meon::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: meon config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(meon::config))]
    Config(ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(meon::invalid_input))]
    InvalidInput { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(meon::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::InvalidInput { .. } => {
                exit_code::USAGE
            }
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate an action failure, with the profile and URL it ran against.
    pub fn from_action(action: ActionKind, err: &ActionError, profile: &str, url: &str) -> Self {
        match err {
            ActionError::Validation(e) => Self::Validation {
                message: e.to_string(),
            },
            ActionError::Http { message, .. } if err.is_auth_failure() => Self::AuthFailed {
                profile: profile.into(),
                message: message.clone(),
            },
            ActionError::Transport { message, timed_out } => Self::ConnectionFailed {
                url: url.into(),
                message: message.clone(),
                hint: if *timed_out {
                    "The gateway did not answer in time. Raise the limit with --timeout <SECONDS>."
                } else {
                    "Check that the gateway is running and reachable."
                },
            },
            ActionError::Busy | ActionError::Http { .. } | ActionError::Decode { .. } => {
                Self::ActionFailed {
                    action,
                    message: err.to_string(),
                }
            }
        }
    }

    /// Map a dialoguer / interactive I/O failure.
    pub fn prompt(e: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            field: "interactive".into(),
            reason: format!("prompt failed: {e}"),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name, available } => Self::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            other => Self::Config(other),
        }
    }
}
