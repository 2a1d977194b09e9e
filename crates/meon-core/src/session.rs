// ── Session state ──
//
// Owned by the UI. The orchestrator only ever sees an `ActionRequest`
// snapshot going in and hands a `SessionUpdate` back.

use serde::Serialize;

use meon_api::Credentials;

use crate::actions::{ActionSpec, Interpretation, QrUpdate};

/// What the operator is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub api_base_url: String,
    pub instance_name: String,
    /// `None` until some action has reported a status.
    pub status_text: Option<String>,
    /// Image payload (usually a data URI) waiting to be scanned.
    pub qr_payload: Option<String>,
}

impl SessionState {
    pub fn new(api_base_url: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            instance_name: instance_name.into(),
            ..Self::default()
        }
    }

    /// Call right before issuing `spec`. QR refresh drops the old code here
    /// so a slow response never leaves a stale one on screen.
    pub fn begin(&mut self, spec: &ActionSpec) {
        if spec.clears_qr_on_start {
            self.qr_payload = None;
        }
    }

    /// Apply the result of a successful action.
    pub fn apply(&mut self, update: &SessionUpdate) {
        if let Some(ref status) = update.status_text {
            self.status_text = Some(status.clone());
        }
        match &update.qr {
            QrUpdate::Keep => {}
            QrUpdate::Set(payload) => self.qr_payload = Some(payload.clone()),
            QrUpdate::Clear => self.qr_payload = None,
        }
    }

    /// Snapshot of the inputs one invocation needs.
    pub fn request(&self, credentials: Credentials) -> ActionRequest {
        ActionRequest {
            base_url: self.api_base_url.clone(),
            instance: self.instance_name.clone(),
            credentials,
        }
    }
}

/// Inputs for one orchestrator invocation.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub base_url: String,
    pub instance: String,
    pub credentials: Credentials,
}

/// Changes a successful action makes to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub status_text: Option<String>,
    pub qr: QrUpdate,
}

impl From<Interpretation> for SessionUpdate {
    fn from(interp: Interpretation) -> Self {
        Self {
            status_text: interp.status,
            qr: interp.qr,
        }
    }
}
