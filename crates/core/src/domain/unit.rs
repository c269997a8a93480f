use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema, Hash)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    #[default]
    Active,
    /// Only set while a phase change is in flight.
    Transitioning,
    Error,
    Inactive,
}

impl UnitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Transitioning => "transitioning",
            Self::Error => "error",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "transitioning" => Some(Self::Transitioning),
            "error" => Some(Self::Error),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn all() -> [UnitStatus; 4] {
        [Self::Active, Self::Transitioning, Self::Error, Self::Inactive]
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retail-franchise location tracked through the operational lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Unit {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub location: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub current_phase_id: Option<Uuid>,
    pub status: UnitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            code: code.into(),
            location: location.into(),
            address: None,
            city: None,
            state: None,
            current_phase_id: None,
            status: UnitStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.status == UnitStatus::Transitioning
    }
}

/// Fields accepted by the data store when creating a unit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CreateUnitRequest {
    pub name: String,
    pub code: String,
    pub location: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub current_phase_id: Option<Uuid>,
    pub status: UnitStatus,
}

/// Input for registering a new unit. Only name, code and location are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct RegisterUnitRequest {
    pub name: String,
    pub code: String,
    pub location: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl RegisterUnitRequest {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            location: location.into(),
            ..Default::default()
        }
    }
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UpdateUnitRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub current_phase_id: Option<Uuid>,
    pub status: Option<UnitStatus>,
}

impl UpdateUnitRequest {
    pub fn status(status: UnitStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn phase(phase_id: Uuid, status: UnitStatus) -> Self {
        Self {
            current_phase_id: Some(phase_id),
            status: Some(status),
            ..Default::default()
        }
    }
}
