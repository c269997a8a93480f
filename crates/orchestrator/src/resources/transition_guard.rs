//! Per-unit exclusion for phase transitions.
//!
//! At most one transition may run for a unit at a time. The slot is released
//! when the guard is dropped, including when the transition future is
//! cancelled or panics.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};
use uuid::Uuid;

use events::{Event, EventBus};

use crate::error::{OrchestratorError, Result};

/// Set of units with a transition in flight. Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct TransitionRegistry {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl TransitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the unit's slot, or fails with `TransitionInProgress` if another
    /// caller holds it.
    pub fn acquire(
        &self,
        unit_id: Uuid,
        to_phase_id: Uuid,
        event_bus: Option<EventBus>,
    ) -> Result<TransitionGuard> {
        if !self.lock().insert(unit_id) {
            return Err(OrchestratorError::TransitionInProgress(unit_id));
        }

        debug!(unit_id = %unit_id, to_phase_id = %to_phase_id, "Transition guard acquired");

        Ok(TransitionGuard {
            unit_id,
            to_phase_id,
            registry: self.clone(),
            event_bus,
            completed: false,
        })
    }

    pub fn is_in_flight(&self, unit_id: Uuid) -> bool {
        self.lock().contains(&unit_id)
    }

    fn release(&self, unit_id: Uuid) {
        self.lock().remove(&unit_id);
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// RAII handle on a unit's transition slot.
///
/// A guard dropped without [`mark_completed`](Self::mark_completed) means the
/// transition was abandoned mid-way; a `transition.failed` event is emitted so
/// listeners do not wait on it.
pub struct TransitionGuard {
    unit_id: Uuid,
    to_phase_id: Uuid,
    registry: TransitionRegistry,
    event_bus: Option<EventBus>,
    completed: bool,
}

impl TransitionGuard {
    /// Call once the transition has reached an outcome, success or failure.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}

impl Drop for TransitionGuard {
    fn drop(&mut self) {
        self.registry.release(self.unit_id);

        if !self.completed {
            warn!(
                unit_id = %self.unit_id,
                to_phase_id = %self.to_phase_id,
                "Transition guard dropped without completion"
            );

            if let Some(ref bus) = self.event_bus {
                bus.emit(Event::TransitionFailed {
                    unit_id: self.unit_id,
                    to_phase_id: self.to_phase_id,
                    error: "Transition aborted".to_string(),
                });
            }
        }
    }
}
