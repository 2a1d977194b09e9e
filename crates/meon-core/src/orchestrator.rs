// ── Action orchestrator ──
//
// Runs one action end to end: validate inputs, mark the action as
// loading, send the request, interpret the outcome, append exactly one
// history entry, clear the loading mark. Nothing in here returns `Err`;
// every failure ends up in the history log.

use std::sync::Arc;

use tracing::{info, warn};

use meon_api::{GatewayClient, build_request};

use crate::actions::{ActionKind, ActionSpec};
use crate::config::{OrchestratorConfig, ReentryPolicy};
use crate::error::ActionError;
use crate::history::{EntryKind, HistoryEntry, HistoryLog};
use crate::loading::LoadingRegistry;
use crate::session::{ActionRequest, SessionUpdate};

// ── ActionReport ─────────────────────────────────────────────────────

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Apply this to the session.
    Success(SessionUpdate),
    Failure(ActionError),
}

/// Result of [`Orchestrator::run`]: the outcome plus the history entry
/// that recorded it.
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub action: ActionKind,
    pub outcome: ActionOutcome,
    pub entry: HistoryEntry,
}

impl ActionReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Success(_))
    }

    /// Session changes, if the action succeeded.
    pub fn update(&self) -> Option<&SessionUpdate> {
        match &self.outcome {
            ActionOutcome::Success(update) => Some(update),
            ActionOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match &self.outcome {
            ActionOutcome::Success(_) => None,
            ActionOutcome::Failure(err) => Some(err),
        }
    }
}

// ── Orchestrator ─────────────────────────────────────────────────────

/// Executes actions against the gateway and owns the history log and
/// loading flags.
///
/// Cheaply cloneable; clones share the same log and flags, so several
/// actions can be driven concurrently from different tasks.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    inner: Arc<OrchestratorInner>,
}

#[derive(Debug)]
struct OrchestratorInner {
    client: GatewayClient,
    history: HistoryLog,
    loading: LoadingRegistry,
    reentry: ReentryPolicy,
}

impl Orchestrator {
    /// Build an orchestrator with its own HTTP client.
    pub fn new(config: &OrchestratorConfig) -> Result<Self, ActionError> {
        let client = GatewayClient::new(&config.transport())?;
        Ok(Self::with_client(client, config.reentry))
    }

    /// Build an orchestrator around an existing client.
    pub fn with_client(client: GatewayClient, reentry: ReentryPolicy) -> Self {
        Self {
            inner: Arc::new(OrchestratorInner {
                client,
                history: HistoryLog::new(),
                loading: LoadingRegistry::new(),
                reentry,
            }),
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.inner.history
    }

    pub fn is_loading(&self, kind: ActionKind) -> bool {
        self.inner.loading.is_loading(kind)
    }

    /// Run the action identified by `kind`.
    pub async fn run_kind(&self, kind: ActionKind, request: ActionRequest) -> ActionReport {
        self.run(kind.spec(), request).await
    }

    /// Run one action. Appends exactly one history entry.
    pub async fn run(&self, spec: &ActionSpec, request: ActionRequest) -> ActionReport {
        let kind = spec.kind;
        let inner = &self.inner;

        let body = (spec.body)(&request.instance);
        let prepared = match build_request(
            &request.base_url,
            &request.instance,
            spec.endpoint,
            body.as_ref(),
            &request.credentials,
        ) {
            Ok(prepared) => prepared,
            Err(err) => {
                warn!(action = %kind, error = %err, "action rejected before sending");
                let entry = inner
                    .history
                    .append(EntryKind::Validation, None, err.to_string());
                return ActionReport {
                    action: kind,
                    outcome: ActionOutcome::Failure(err.into()),
                    entry,
                };
            }
        };

        if inner.reentry == ReentryPolicy::Reject && inner.loading.is_loading(kind) {
            warn!(action = %kind, "action already in flight");
            return self.fail(kind, ActionError::Busy);
        }

        let guard = inner.loading.enter(kind);
        info!(action = %kind, instance = %request.instance, "action started");

        let report = match inner.client.send(prepared).await {
            Ok(payload) => {
                let interp = (spec.interpret)(&payload);
                info!(action = %kind, message = %interp.message, "action succeeded");
                let entry = inner
                    .history
                    .append(EntryKind::Success, Some(kind), interp.message.clone());
                ActionReport {
                    action: kind,
                    outcome: ActionOutcome::Success(interp.into()),
                    entry,
                }
            }
            Err(err) => {
                let err = ActionError::from(err);
                warn!(
                    action = %kind,
                    status = ?err.status(),
                    error = %err,
                    "action failed"
                );
                self.fail(kind, err)
            }
        };

        drop(guard);
        report
    }

    fn fail(&self, kind: ActionKind, err: ActionError) -> ActionReport {
        let entry = self
            .inner
            .history
            .append(EntryKind::Failure, Some(kind), err.to_string());
        ActionReport {
            action: kind,
            outcome: ActionOutcome::Failure(err),
            entry,
        }
    }
}
