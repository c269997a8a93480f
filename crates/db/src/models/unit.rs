use phasekeeper_core::{Unit, UnitStatus};
use uuid::Uuid;

use super::{datetime_to_timestamp, parse_optional_id, timestamp_to_datetime};
use crate::error::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnitRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub location: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub current_phase_id: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl UnitRow {
    pub fn into_domain(self) -> Result<Unit, DbError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| DbError::invalid_row("units", format!("bad id {}: {}", self.id, e)))?;
        let status = UnitStatus::parse(&self.status)
            .ok_or_else(|| DbError::invalid_row("units", format!("unknown status {}", self.status)))?;

        Ok(Unit {
            id,
            name: self.name,
            code: self.code,
            location: self.location,
            address: self.address,
            city: self.city,
            state: self.state,
            current_phase_id: parse_optional_id("units", "current_phase_id", self.current_phase_id)?,
            status,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        })
    }
}

impl From<&Unit> for UnitRow {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id.to_string(),
            name: unit.name.clone(),
            code: unit.code.clone(),
            location: unit.location.clone(),
            address: unit.address.clone(),
            city: unit.city.clone(),
            state: unit.state.clone(),
            current_phase_id: unit.current_phase_id.map(|id| id.to_string()),
            status: unit.status.as_str().to_string(),
            created_at: datetime_to_timestamp(unit.created_at),
            updated_at: datetime_to_timestamp(unit.updated_at),
        }
    }
}
