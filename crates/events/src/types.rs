//! Event types published while units move through their lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: Event,
}

impl EventEnvelope {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A unit was created in the initial phase
    #[serde(rename = "unit.registered")]
    UnitRegistered {
        unit_id: Uuid,
        code: String,
        phase_id: Uuid,
    },

    #[serde(rename = "unit.status_changed")]
    UnitStatusChanged {
        unit_id: Uuid,
        from_status: String,
        to_status: String,
    },

    /// A transition completed and the unit is active in its new phase
    #[serde(rename = "unit.phase_changed")]
    UnitPhaseChanged {
        unit_id: Uuid,
        from_phase_id: Option<Uuid>,
        to_phase_id: Uuid,
        triggered_by: String,
    },

    #[serde(rename = "transition.failed")]
    TransitionFailed {
        unit_id: Uuid,
        to_phase_id: Uuid,
        error: String,
    },

    /// Editable catalog fields of a phase changed
    #[serde(rename = "phase.updated")]
    PhaseUpdated { phase_id: Uuid },

    #[serde(rename = "error")]
    Error {
        message: String,
        context: Option<String>,
    },
}

impl Event {
    pub fn unit_id(&self) -> Option<Uuid> {
        match self {
            Event::UnitRegistered { unit_id, .. } => Some(*unit_id),
            Event::UnitStatusChanged { unit_id, .. } => Some(*unit_id),
            Event::UnitPhaseChanged { unit_id, .. } => Some(*unit_id),
            Event::TransitionFailed { unit_id, .. } => Some(*unit_id),
            Event::PhaseUpdated { .. } => None,
            Event::Error { .. } => None,
        }
    }

    /// Wire name, matching the serde tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::UnitRegistered { .. } => "unit.registered",
            Event::UnitStatusChanged { .. } => "unit.status_changed",
            Event::UnitPhaseChanged { .. } => "unit.phase_changed",
            Event::TransitionFailed { .. } => "transition.failed",
            Event::PhaseUpdated { .. } => "phase.updated",
            Event::Error { .. } => "error",
        }
    }
}
