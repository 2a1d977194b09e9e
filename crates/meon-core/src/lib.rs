// meon-core: Action orchestration between meon-api and the operator surfaces.

pub mod actions;
pub mod config;
pub mod error;
pub mod history;
pub mod loading;
pub mod orchestrator;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use actions::{
    ActionKind, ActionSpec, CONNECT, DISCONNECT, Interpretation, QrUpdate, REFRESH_QR, STATUS,
    lookup, registry,
};
pub use config::{OrchestratorConfig, ReentryPolicy, TlsVerification};
pub use error::{ActionError, ValidationError};
pub use history::{EntryKind, HistoryEntry, HistoryLog};
pub use loading::LoadingRegistry;
pub use orchestrator::{ActionOutcome, ActionReport, Orchestrator};
pub use session::{ActionRequest, SessionState, SessionUpdate};

pub use meon_api::{Credentials, GatewayClient};
