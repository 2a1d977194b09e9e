// ── History log ──
//
// Append-only, ordered audit trail of action outcomes. Entries are never
// edited or removed; each append is also broadcast to subscribers.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Local, SubsecRound};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::actions::ActionKind;

const BROADCAST_CAPACITY: usize = 256;

/// How an entry came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Success,
    Failure,
    /// Precondition check failed before any request was sent.
    Validation,
}

/// One timestamped line in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Wall-clock time, truncated to whole seconds.
    pub timestamp: DateTime<Local>,
    pub kind: EntryKind,
    /// `None` for validation failures.
    pub action: Option<ActionKind>,
    pub message: String,
}

impl HistoryEntry {
    pub fn new(kind: EntryKind, action: Option<ActionKind>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().trunc_subsecs(0),
            kind,
            action,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self.kind, EntryKind::Success)
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.timestamp.format("%H:%M:%S");
        let label = if self.is_error() { "ERRO" } else { "SUCESSO" };
        match self.action {
            Some(action) => write!(f, "[{time}] {label} [{action}]: {}", self.message),
            None => write!(f, "[{time}] {label}: {}", self.message),
        }
    }
}

/// The session's history log.
#[derive(Debug)]
pub struct HistoryLog {
    entries: RwLock<Vec<HistoryEntry>>,
    tx: broadcast::Sender<HistoryEntry>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            entries: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Append an entry and notify subscribers. Returns the stored entry.
    pub fn append(
        &self,
        kind: EntryKind,
        action: Option<ActionKind>,
        message: impl Into<String>,
    ) -> HistoryEntry {
        let entry = HistoryEntry::new(kind, action, message);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        // No subscribers is fine.
        let _ = self.tx.send(entry.clone());
        entry
    }

    /// Copy of all entries, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rendered lines, the way a text area would show them.
    pub fn lines(&self) -> Vec<String> {
        self.snapshot().iter().map(ToString::to_string).collect()
    }

    /// Receive every entry appended from now on. The panel drains this
    /// after each action to print what was recorded.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEntry> {
        self.tx.subscribe()
    }
}
