use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const SYSTEM_INITIATOR: &str = "system";
pub const REGISTRATION_REASON: &str = "Unit registration";
pub const MANUAL_TRANSITION_REASON: &str = "Manual transition";

/// Immutable record of one transition attempt.
///
/// `from_phase_id` is `None` for an initial assignment at registration and for
/// attempts that failed before the unit's phase was read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PhaseTransitionLog {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub from_phase_id: Option<Uuid>,
    pub to_phase_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub triggered_by: String,
    pub reason: String,
    pub success: bool,
    pub error_message: Option<String>,
}

impl PhaseTransitionLog {
    pub fn succeeded(
        unit_id: Uuid,
        from_phase_id: Option<Uuid>,
        to_phase_id: Uuid,
        triggered_by: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_id,
            from_phase_id,
            to_phase_id,
            timestamp: Utc::now(),
            triggered_by: triggered_by.into(),
            reason: reason.into(),
            success: true,
            error_message: None,
        }
    }

    pub fn failed(
        unit_id: Uuid,
        from_phase_id: Option<Uuid>,
        to_phase_id: Uuid,
        triggered_by: impl Into<String>,
        reason: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_id,
            from_phase_id,
            to_phase_id,
            timestamp: Utc::now(),
            triggered_by: triggered_by.into(),
            reason: reason.into(),
            success: false,
            error_message: Some(error_message.into()),
        }
    }
}
