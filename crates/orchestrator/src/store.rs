//! Data access seam between the lifecycle engine and persistence.

use async_trait::async_trait;
use db::{
    BehaviorGroupRepository, DbError, PhaseRepository, TransitionLogRepository, UnitRepository,
};
use phasekeeper_core::{
    BehaviorGroup, CreateUnitRequest, Phase, PhaseTransitionLog, Unit, UnitBehaviorConfig,
    UpdatePhaseRequest, UpdateUnitRequest,
};
use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_unique_violation())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait UnitStore: Send + Sync {
    async fn fetch_units(&self) -> StoreResult<Vec<Unit>>;

    /// Catalog order is not guaranteed; callers sort through `PhaseCatalog`.
    async fn fetch_phases(&self) -> StoreResult<Vec<Phase>>;

    async fn fetch_behavior_groups(&self) -> StoreResult<Vec<BehaviorGroup>>;

    async fn fetch_behavior_group(&self, phase_id: Uuid) -> StoreResult<Option<BehaviorGroup>> {
        Ok(self
            .fetch_behavior_groups()
            .await?
            .into_iter()
            .find(|g| g.phase_id == phase_id))
    }

    async fn fetch_unit_behavior_config(
        &self,
        _unit_id: Uuid,
    ) -> StoreResult<Option<UnitBehaviorConfig>> {
        Ok(None)
    }

    async fn update_unit(&self, id: Uuid, update: &UpdateUnitRequest) -> StoreResult<Unit>;

    async fn create_unit(&self, request: &CreateUnitRequest) -> StoreResult<Unit>;

    async fn update_phase(&self, id: Uuid, update: &UpdatePhaseRequest) -> StoreResult<Phase>;

    async fn append_transition_log(&self, log: &PhaseTransitionLog) -> StoreResult<()>;

    /// Most recent first.
    async fn fetch_transition_logs(&self) -> StoreResult<Vec<PhaseTransitionLog>>;
}

/// [`UnitStore`] backed by the SQLite repositories.
#[derive(Clone)]
pub struct SqliteStore {
    units: UnitRepository,
    phases: PhaseRepository,
    groups: BehaviorGroupRepository,
    logs: TransitionLogRepository,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            units: UnitRepository::new(pool.clone()),
            phases: PhaseRepository::new(pool.clone()),
            groups: BehaviorGroupRepository::new(pool.clone()),
            logs: TransitionLogRepository::new(pool),
        }
    }
}

#[async_trait]
impl UnitStore for SqliteStore {
    async fn fetch_units(&self) -> StoreResult<Vec<Unit>> {
        Ok(self.units.find_all().await?)
    }

    async fn fetch_phases(&self) -> StoreResult<Vec<Phase>> {
        Ok(self.phases.find_all().await?)
    }

    async fn fetch_behavior_groups(&self) -> StoreResult<Vec<BehaviorGroup>> {
        Ok(self.groups.find_all().await?)
    }

    async fn fetch_behavior_group(&self, phase_id: Uuid) -> StoreResult<Option<BehaviorGroup>> {
        Ok(self.groups.find_by_phase_id(phase_id).await?)
    }

    async fn update_unit(&self, id: Uuid, update: &UpdateUnitRequest) -> StoreResult<Unit> {
        self.units
            .update(id, update)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("unit {}", id)))
    }

    async fn create_unit(&self, request: &CreateUnitRequest) -> StoreResult<Unit> {
        let mut unit = Unit::new(&request.name, &request.code, &request.location);
        unit.address = request.address.clone();
        unit.city = request.city.clone();
        unit.state = request.state.clone();
        unit.current_phase_id = request.current_phase_id;
        unit.status = request.status;

        Ok(self.units.create(&unit).await?)
    }

    async fn update_phase(&self, id: Uuid, update: &UpdatePhaseRequest) -> StoreResult<Phase> {
        self.phases
            .update(id, update)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("phase {}", id)))
    }

    async fn append_transition_log(&self, log: &PhaseTransitionLog) -> StoreResult<()> {
        Ok(self.logs.create(log).await?)
    }

    async fn fetch_transition_logs(&self) -> StoreResult<Vec<PhaseTransitionLog>> {
        Ok(self.logs.find_all().await?)
    }
}
