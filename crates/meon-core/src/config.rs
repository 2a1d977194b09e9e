// ── Runtime orchestration configuration ──
//
// These types describe *how* to talk to the gateway. They never touch
// disk: the CLI (via meon-config) builds an `OrchestratorConfig` and
// hands it in.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use meon_api::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// What to do when an action is invoked while the same action is still
/// in flight. Spelled `allow` / `reject` in config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReentryPolicy {
    /// Run both; completions are recorded independently.
    #[default]
    Allow,
    /// Record a `Busy` failure for the newcomer and send nothing.
    Reject,
}

/// Configuration for an [`Orchestrator`](crate::Orchestrator).
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Overlapping invocations of one action.
    pub reentry: ReentryPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            reentry: ReentryPolicy::default(),
        }
    }
}

impl OrchestratorConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
        }
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
