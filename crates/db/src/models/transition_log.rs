use phasekeeper_core::PhaseTransitionLog;
use uuid::Uuid;

use super::{millis_to_datetime, parse_optional_id};
use crate::error::DbError;

/// `timestamp` is stored in milliseconds so entries recorded within the same
/// second keep their order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransitionLogRow {
    pub id: String,
    pub unit_id: String,
    pub from_phase_id: Option<String>,
    pub to_phase_id: String,
    pub timestamp: i64,
    pub triggered_by: String,
    pub reason: String,
    pub success: bool,
    pub error_message: Option<String>,
}

impl TransitionLogRow {
    pub fn into_domain(self) -> Result<PhaseTransitionLog, DbError> {
        let parse = |value: &str, field: &str| {
            Uuid::parse_str(value).map_err(|e| {
                DbError::invalid_row(
                    "phase_transition_logs",
                    format!("bad {} {}: {}", field, value, e),
                )
            })
        };

        Ok(PhaseTransitionLog {
            id: parse(&self.id, "id")?,
            unit_id: parse(&self.unit_id, "unit_id")?,
            from_phase_id: parse_optional_id("phase_transition_logs", "from_phase_id", self.from_phase_id)?,
            to_phase_id: parse(&self.to_phase_id, "to_phase_id")?,
            timestamp: millis_to_datetime(self.timestamp),
            triggered_by: self.triggered_by,
            reason: self.reason,
            success: self.success,
            error_message: self.error_message,
        })
    }
}

impl From<&PhaseTransitionLog> for TransitionLogRow {
    fn from(log: &PhaseTransitionLog) -> Self {
        Self {
            id: log.id.to_string(),
            unit_id: log.unit_id.to_string(),
            from_phase_id: log.from_phase_id.map(|id| id.to_string()),
            to_phase_id: log.to_phase_id.to_string(),
            timestamp: log.timestamp.timestamp_millis(),
            triggered_by: log.triggered_by.clone(),
            reason: log.reason.clone(),
            success: log.success,
            error_message: log.error_message.clone(),
        }
    }
}
