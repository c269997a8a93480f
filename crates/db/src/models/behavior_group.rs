use phasekeeper_core::{BehaviorGroup, BehaviorScope};
use uuid::Uuid;

use crate::error::DbError;

/// Lists and scope are stored as JSON text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BehaviorGroupRow {
    pub id: String,
    pub phase_id: String,
    pub name: String,
    pub description: String,
    pub allowed_to_respond: bool,
    pub permissions: String,
    pub restrictions: String,
    pub scope: String,
}

impl BehaviorGroupRow {
    pub fn into_domain(self) -> Result<BehaviorGroup, DbError> {
        let id = Uuid::parse_str(&self.id).map_err(|e| {
            DbError::invalid_row("behavior_groups", format!("bad id {}: {}", self.id, e))
        })?;
        let phase_id = Uuid::parse_str(&self.phase_id).map_err(|e| {
            DbError::invalid_row("behavior_groups", format!("bad phase id {}: {}", self.phase_id, e))
        })?;
        let permissions: Vec<String> = serde_json::from_str(&self.permissions)?;
        let restrictions: Vec<String> = serde_json::from_str(&self.restrictions)?;
        let scope: BehaviorScope = serde_json::from_str(&self.scope)?;

        Ok(BehaviorGroup {
            id,
            phase_id,
            name: self.name,
            description: self.description,
            allowed_to_respond: self.allowed_to_respond,
            permissions,
            restrictions,
            scope,
        })
    }

    pub fn try_from_domain(group: &BehaviorGroup) -> Result<Self, DbError> {
        Ok(Self {
            id: group.id.to_string(),
            phase_id: group.phase_id.to_string(),
            name: group.name.clone(),
            description: group.description.clone(),
            allowed_to_respond: group.allowed_to_respond,
            permissions: serde_json::to_string(&group.permissions)?,
            restrictions: serde_json::to_string(&group.restrictions)?,
            scope: serde_json::to_string(&group.scope)?,
        })
    }
}
