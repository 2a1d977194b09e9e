// ── Core error types ──
//
// What the operator sees when an action fails. These never escape as
// `Err` from the orchestrator: each one becomes a single history entry.
// The `From<meon_api::Error>` impl translates transport-layer errors
// into these variants.

use thiserror::Error;

pub use meon_api::ValidationError;

/// Terminal failure of one action invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    // ── Preconditions ────────────────────────────────────────────────
    /// Missing base URL, credentials or instance. No request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The same action is still in flight and re-entry is rejected.
    #[error("Ação já está em andamento.")]
    Busy,

    // ── Network ──────────────────────────────────────────────────────
    /// Unreachable host, refused connection, DNS failure, timeout, TLS.
    /// `message` carries the full cause chain.
    #[error("{message}")]
    Transport { message: String, timed_out: bool },

    // ── Gateway ──────────────────────────────────────────────────────
    /// Non-2xx response; `message` is what the gateway said.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The gateway announced JSON but sent something else.
    #[error("{message}")]
    Decode { message: String },
}

impl ActionError {
    /// HTTP status code, when the gateway answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The gateway rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<meon_api::Error> for ActionError {
    fn from(err: meon_api::Error) -> Self {
        match err {
            meon_api::Error::Validation(e) => Self::Validation(e),
            meon_api::Error::Transport(e) => Self::Transport {
                message: meon_api::error::describe_transport(&e),
                timed_out: e.is_timeout(),
            },
            meon_api::Error::Tls(message) => Self::Transport {
                message: format!("TLS error: {message}"),
                timed_out: false,
            },
            meon_api::Error::Http { status, message } => Self::Http { status, message },
            meon_api::Error::Deserialization { message, body: _ } => Self::Decode { message },
        }
    }
}
