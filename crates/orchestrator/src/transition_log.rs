use std::collections::VecDeque;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use phasekeeper_core::PhaseTransitionLog;
use uuid::Uuid;

/// In-process transition history, most recent entry first.
#[derive(Debug, Default)]
pub struct TransitionLogStore {
    entries: RwLock<VecDeque<PhaseTransitionLog>>,
}

impl TransitionLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, log: PhaseTransitionLog) {
        self.write().push_front(log);
    }

    /// Replaces the history, e.g. with entries loaded from the store.
    /// `logs` must already be most recent first.
    pub fn replace(&self, logs: Vec<PhaseTransitionLog>) {
        *self.write() = logs.into();
    }

    pub fn entries(&self) -> Vec<PhaseTransitionLog> {
        self.read().iter().cloned().collect()
    }

    pub fn for_unit(&self, unit_id: Uuid) -> Vec<PhaseTransitionLog> {
        self.read()
            .iter()
            .filter(|log| log.unit_id == unit_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the deque half-written, so
    // poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<PhaseTransitionLog>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<PhaseTransitionLog>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
