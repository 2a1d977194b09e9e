use thiserror::Error;

use crate::request::ValidationError;

/// Top-level error type for the `meon-api` crate.
///
/// Covers every way a single gateway call can fail: precondition
/// validation, transport, non-2xx responses, and undecodable bodies.
/// `meon-core` maps these into the history-facing `ActionError`.
#[derive(Debug, Error)]
pub enum Error {
    // ── Validation ──────────────────────────────────────────────────
    /// A required input was missing before any I/O happened.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    ///
    /// Displays the whole cause chain, e.g. `error sending request for url
    /// (...): client error (Connect): tcp connect error: Connection refused`.
    #[error("{}", describe_transport(.0))]
    Transport(#[from] reqwest::Error),

    /// TLS configuration or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-2xx response. `message` is already extracted from the body.
    #[error("{message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The response claimed to be JSON but did not parse, with the raw
    /// body for debugging.
    #[error("{message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status code, if the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the gateway rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

/// A transport error and each of its sources, joined with `": "`.
///
/// reqwest's own `Display` stops at "error sending request", which reads
/// the same for a refused connection, a DNS failure and a timeout. Sources
/// whose text the message already contains are skipped.
pub fn describe_transport(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = std::error::Error::source(cause);
    }
    message
}
