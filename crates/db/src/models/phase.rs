use phasekeeper_core::{Phase, PhaseName};
use uuid::Uuid;

use super::{datetime_to_timestamp, parse_optional_id, timestamp_to_datetime};
use crate::error::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PhaseRow {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    pub min_duration_days: Option<i64>,
    pub max_duration_days: Option<i64>,
    pub description: String,
    pub notes: Option<String>,
    pub next_phase_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PhaseRow {
    pub fn into_domain(self) -> Result<Phase, DbError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| DbError::invalid_row("phases", format!("bad id {}: {}", self.id, e)))?;
        let name = PhaseName::parse(&self.name)
            .ok_or_else(|| DbError::invalid_row("phases", format!("unknown phase {}", self.name)))?;

        Ok(Phase {
            id,
            name,
            order: u32::try_from(self.sort_order).unwrap_or_default(),
            min_duration_days: self.min_duration_days.and_then(|d| u32::try_from(d).ok()),
            max_duration_days: self.max_duration_days.and_then(|d| u32::try_from(d).ok()),
            description: self.description,
            notes: self.notes,
            next_phase_id: parse_optional_id("phases", "next_phase_id", self.next_phase_id)?,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        })
    }
}

impl From<&Phase> for PhaseRow {
    fn from(phase: &Phase) -> Self {
        Self {
            id: phase.id.to_string(),
            name: phase.name.as_str().to_string(),
            sort_order: i64::from(phase.order),
            min_duration_days: phase.min_duration_days.map(i64::from),
            max_duration_days: phase.max_duration_days.map(i64::from),
            description: phase.description.clone(),
            notes: phase.notes.clone(),
            next_phase_id: phase.next_phase_id.map(|id| id.to_string()),
            created_at: datetime_to_timestamp(phase.created_at),
            updated_at: datetime_to_timestamp(phase.updated_at),
        }
    }
}
