use phasekeeper_core::{Phase, PhaseCatalog, Unit, UnitStatus};
use uuid::Uuid;

use crate::error::{OrchestratorError, Result};

/// Rules for moving a unit along the fixed phase chain.
pub struct PhaseLifecycle;

impl PhaseLifecycle {
    /// Statuses tried, in order, when a transition fails after the unit was
    /// touched.
    pub const FAILURE_STATUSES: [UnitStatus; 2] = [UnitStatus::Error, UnitStatus::Inactive];

    pub fn next_phase(catalog: &PhaseCatalog, current: Uuid) -> Result<&Phase> {
        let phase = catalog
            .find(current)
            .ok_or_else(|| OrchestratorError::phase_not_found(current))?;

        if phase.is_terminal() {
            return Err(OrchestratorError::InvalidTransition(format!(
                "{} is a terminal phase",
                phase.name
            )));
        }

        catalog.successor(current).ok_or_else(|| {
            OrchestratorError::Configuration(format!(
                "successor of {} is missing from the catalog",
                phase.name
            ))
        })
    }

    /// A unit left `transitioning` with nobody driving it was interrupted.
    pub fn is_interrupted(unit: &Unit, in_flight: bool) -> bool {
        unit.is_transitioning() && !in_flight
    }
}
