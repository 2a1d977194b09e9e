// ── Action registry ──
//
// The four gateway actions as plain data: endpoint, method, body builder
// and success interpreter. One generic orchestrator consumes them.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use meon_api::{Endpoint, HttpMethod, INFO_PATH, LOGIN_PATH, LOGOUT_PATH, Payload};

/// Status label for a connected instance.
pub const CONNECTED: &str = "CONECTADO";
/// Status label for a disconnected instance.
pub const DISCONNECTED: &str = "DESCONECTADO";
/// Status shown while a QR code waits to be scanned.
pub const AWAITING_QR_SCAN: &str = "AGUARDANDO LEITURA DO QR CODE";
/// Generic message for a 2xx body with none of the expected fields.
pub const UNEXPECTED_RESPONSE: &str = "Resposta inesperada do servidor.";

const QR_GENERATED: &str = "QR Code gerado. Faça a leitura com seu WhatsApp para conectar.";
const QR_REFRESHED: &str = "QR Code gerado/atualizado. Faça a leitura com seu WhatsApp.";
const SESSION_CLOSED: &str = "Sessão encerrada com sucesso.";

// ── ActionKind ───────────────────────────────────────────────────────

/// The unique key of an action. Displays as the operator-facing name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ActionKind {
    #[strum(to_string = "Status", serialize = "info")]
    Status,
    #[strum(to_string = "Conectar", serialize = "connect")]
    Connect,
    #[strum(to_string = "Desconectar", serialize = "disconnect")]
    Disconnect,
    #[strum(to_string = "QRCode", serialize = "qr", serialize = "refresh-qr")]
    RefreshQr,
}

impl ActionKind {
    /// The immutable spec for this action.
    pub fn spec(self) -> &'static ActionSpec {
        match self {
            Self::Status => &STATUS,
            Self::Connect => &CONNECT,
            Self::Disconnect => &DISCONNECT,
            Self::RefreshQr => &REFRESH_QR,
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ── Interpretation ───────────────────────────────────────────────────

/// What happens to the stored QR payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QrUpdate {
    #[default]
    Keep,
    Set(String),
    Clear,
}

/// Result of reading a success payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// New status text, if the action determines one.
    pub status: Option<String>,
    /// Line recorded in the history.
    pub message: String,
    pub qr: QrUpdate,
}

// ── ActionSpec ───────────────────────────────────────────────────────

/// Declarative description of one action.
pub struct ActionSpec {
    pub kind: ActionKind,
    pub endpoint: Endpoint,
    /// Request body for a given instance id.
    pub body: fn(&str) -> Option<Map<String, Value>>,
    /// Maps a success payload to status / history / QR changes.
    pub interpret: fn(&Payload) -> Interpretation,
    /// The UI drops any stored QR before issuing this action.
    pub clears_qr_on_start: bool,
}

impl ActionSpec {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSpec")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("clears_qr_on_start", &self.clears_qr_on_start)
            .finish_non_exhaustive()
    }
}

pub static STATUS: ActionSpec = ActionSpec {
    kind: ActionKind::Status,
    endpoint: Endpoint::new(INFO_PATH, HttpMethod::Get),
    body: no_body,
    interpret: interpret_status,
    clears_qr_on_start: false,
};

pub static CONNECT: ActionSpec = ActionSpec {
    kind: ActionKind::Connect,
    endpoint: Endpoint::new(LOGIN_PATH, HttpMethod::Post),
    body: instance_body,
    interpret: interpret_connect,
    clears_qr_on_start: false,
};

pub static DISCONNECT: ActionSpec = ActionSpec {
    kind: ActionKind::Disconnect,
    endpoint: Endpoint::new(LOGOUT_PATH, HttpMethod::Post),
    body: instance_body,
    interpret: interpret_logout,
    clears_qr_on_start: false,
};

pub static REFRESH_QR: ActionSpec = ActionSpec {
    kind: ActionKind::RefreshQr,
    endpoint: Endpoint::new(LOGIN_PATH, HttpMethod::Post),
    body: instance_body,
    interpret: interpret_refresh_qr,
    clears_qr_on_start: true,
};

/// All specs, in display order.
pub fn registry() -> impl Iterator<Item = &'static ActionSpec> {
    ActionKind::iter().map(ActionKind::spec)
}

/// Look up a spec by operator name or alias, case-insensitively.
pub fn lookup(name: &str) -> Option<&'static ActionSpec> {
    name.trim().parse::<ActionKind>().ok().map(ActionKind::spec)
}

// ── Bodies ───────────────────────────────────────────────────────────

fn no_body(_instance: &str) -> Option<Map<String, Value>> {
    None
}

fn instance_body(instance: &str) -> Option<Map<String, Value>> {
    let mut map = Map::new();
    map.insert("id".into(), Value::String(instance.to_owned()));
    Some(map)
}

// ── Interpreters ─────────────────────────────────────────────────────

fn interpret_status(payload: &Payload) -> Interpretation {
    let connected = payload
        .field("connected")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let state = if connected { CONNECTED } else { DISCONNECTED };
    let message = format!("Instância está {state}.");

    Interpretation {
        status: Some(format!("Status da instância: {message}")),
        message,
        qr: QrUpdate::Keep,
    }
}

fn interpret_connect(payload: &Payload) -> Interpretation {
    interpret_login(payload, QR_GENERATED)
}

fn interpret_refresh_qr(payload: &Payload) -> Interpretation {
    interpret_login(payload, QR_REFRESHED)
}

/// Shared by connect and QR refresh; only the line recorded for a new QR
/// differs.
fn interpret_login(payload: &Payload, qr_message: &str) -> Interpretation {
    if let Some(qr) = payload.str_field("qr") {
        return Interpretation {
            status: Some(AWAITING_QR_SCAN.to_owned()),
            message: qr_message.to_owned(),
            qr: QrUpdate::Set(qr.to_owned()),
        };
    }

    if let Some(message) = payload.str_field("message") {
        return Interpretation {
            status: Some(message.to_uppercase()),
            message: message.to_owned(),
            qr: QrUpdate::Keep,
        };
    }

    Interpretation {
        status: None,
        message: UNEXPECTED_RESPONSE.to_owned(),
        qr: QrUpdate::Keep,
    }
}

fn interpret_logout(_payload: &Payload) -> Interpretation {
    Interpretation {
        status: Some(DISCONNECTED.to_owned()),
        message: SESSION_CLOSED.to_owned(),
        qr: QrUpdate::Clear,
    }
}
