// ── Per-action loading flags ──
//
// One independent in-flight counter per action. Nothing here serializes
// calls: two overlapping invocations of the same action both count, and
// the flag only drops once the last of them has finished.

use dashmap::DashMap;

use crate::actions::ActionKind;

/// Tracks which actions currently have a request in flight.
#[derive(Debug, Default)]
pub struct LoadingRegistry {
    in_flight: DashMap<ActionKind, usize>,
}

impl LoadingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while at least one invocation of `kind` is in flight.
    pub fn is_loading(&self, kind: ActionKind) -> bool {
        self.in_flight.get(&kind).is_some_and(|n| *n > 0)
    }

    /// Mark `kind` as in flight until the returned guard is dropped.
    pub(crate) fn enter(&self, kind: ActionKind) -> InFlightGuard<'_> {
        *self.in_flight.entry(kind).or_insert(0) += 1;
        InFlightGuard {
            registry: self,
            kind,
        }
    }
}

/// Clears one in-flight mark on drop, whichever way the call ended.
#[derive(Debug)]
pub(crate) struct InFlightGuard<'a> {
    registry: &'a LoadingRegistry,
    kind: ActionKind,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Some(mut count) = self.registry.in_flight.get_mut(&self.kind) {
            *count = count.saturating_sub(1);
        }
    }
}
