//! Phase lifecycle engine: transitions, registration and the response gate.

use std::sync::Arc;

use events::{Event, EventBus};
use phasekeeper_core::{
    BehaviorGroup, CreateUnitRequest, Phase, PhaseCatalog, PhaseName, PhaseTransitionLog,
    RegisterUnitRequest, Unit, UnitStatus, UpdatePhaseRequest, UpdateUnitRequest,
    REGISTRATION_REASON, SYSTEM_INITIATOR,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::behavior::BehaviorResolver;
use crate::config::PhaseManagerConfig;
use crate::documentation::{DocumentationActivator, NoopDocumentation};
use crate::error::{OrchestratorError, Result};
use crate::resources::{TransitionGuard, TransitionRegistry};
use crate::state_machine::PhaseLifecycle;
use crate::store::UnitStore;
use crate::transition_log::TransitionLogStore;

pub const RECOVERY_REASON: &str = "Startup recovery";
const INTERRUPTED_MESSAGE: &str = "Transition interrupted before completion";

struct Snapshot {
    units: Vec<Unit>,
    catalog: PhaseCatalog,
    behavior: BehaviorResolver,
}

impl Snapshot {
    fn unit(&self, unit_id: Uuid) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == unit_id)
    }
}

/// Clones share the store, the log and the transition registry.
#[derive(Clone)]
pub struct PhaseManager {
    store: Arc<dyn UnitStore>,
    documentation: Arc<dyn DocumentationActivator>,
    event_bus: Option<EventBus>,
    logs: Arc<TransitionLogStore>,
    registry: TransitionRegistry,
    config: PhaseManagerConfig,
}

impl PhaseManager {
    pub fn new(store: Arc<dyn UnitStore>, config: PhaseManagerConfig) -> Self {
        Self {
            store,
            documentation: Arc::new(NoopDocumentation),
            event_bus: None,
            logs: Arc::new(TransitionLogStore::new()),
            registry: TransitionRegistry::new(),
            config,
        }
    }

    pub fn with_documentation(mut self, documentation: Arc<dyn DocumentationActivator>) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn config(&self) -> &PhaseManagerConfig {
        &self.config
    }

    pub fn transition_logs(&self) -> Vec<PhaseTransitionLog> {
        self.logs.entries()
    }

    pub fn transition_logs_for(&self, unit_id: Uuid) -> Vec<PhaseTransitionLog> {
        self.logs.for_unit(unit_id)
    }

    /// Moves a unit to `new_phase_id` and returns the updated unit.
    ///
    /// Every outcome, including rejections, leaves one entry in the transition
    /// log. Once the unit's slot is claimed the work runs on its own task and
    /// finishes even if the caller stops waiting.
    pub async fn transition(
        &self,
        unit_id: Uuid,
        new_phase_id: Uuid,
        triggered_by: &str,
        reason: &str,
    ) -> Result<Unit> {
        info!(
            unit_id = %unit_id,
            to_phase_id = %new_phase_id,
            triggered_by = %triggered_by,
            "Starting phase transition"
        );

        let guard = match self
            .registry
            .acquire(unit_id, new_phase_id, self.event_bus.clone())
        {
            Ok(guard) => guard,
            Err(err) => {
                warn!(unit_id = %unit_id, "Rejected concurrent transition");
                self.record_failure(unit_id, new_phase_id, triggered_by, reason, &err)
                    .await;
                return Err(err);
            }
        };

        let manager = self.clone();
        let triggered_by = triggered_by.to_string();
        let reason = reason.to_string();
        let task = tokio::spawn(async move {
            manager
                .drive_transition(guard, unit_id, new_phase_id, &triggered_by, &reason)
                .await
        });

        task.await.unwrap_or_else(|err| {
            error!(unit_id = %unit_id, error = %err, "Transition task aborted");
            Err(OrchestratorError::UpdateFailed(format!(
                "transition task failed: {}",
                err
            )))
        })
    }

    async fn drive_transition(
        &self,
        mut guard: TransitionGuard,
        unit_id: Uuid,
        new_phase_id: Uuid,
        triggered_by: &str,
        reason: &str,
    ) -> Result<Unit> {
        let outcome = self.run_transition(unit_id, new_phase_id).await;
        let result = match outcome {
            Ok((unit, from_phase_id)) => {
                let log = PhaseTransitionLog::succeeded(
                    unit_id,
                    from_phase_id,
                    new_phase_id,
                    triggered_by,
                    reason,
                );
                self.record(log).await;
                self.emit(Event::UnitPhaseChanged {
                    unit_id,
                    from_phase_id,
                    to_phase_id: new_phase_id,
                    triggered_by: triggered_by.to_string(),
                });
                info!(unit_id = %unit_id, to_phase_id = %new_phase_id, "Phase transition completed");
                Ok(unit)
            }
            Err(err) => {
                error!(unit_id = %unit_id, to_phase_id = %new_phase_id, error = %err, "Phase transition failed");
                self.record_failure(unit_id, new_phase_id, triggered_by, reason, &err)
                    .await;
                Err(err)
            }
        };

        guard.mark_completed();
        result
    }

    /// Checks the stored catalog's structural invariants.
    pub async fn validate_catalog(&self) -> Result<()> {
        let phases = self.store.fetch_phases().await?;
        PhaseCatalog::new(phases).validate()?;
        Ok(())
    }

    /// Moves a unit to the successor of its current phase.
    pub async fn advance(&self, unit_id: Uuid, triggered_by: &str, reason: &str) -> Result<Unit> {
        let snapshot = self.snapshot().await?;
        let unit = snapshot
            .unit(unit_id)
            .ok_or_else(|| OrchestratorError::unit_not_found(unit_id))?;
        let current = unit.current_phase_id.ok_or_else(|| {
            OrchestratorError::NotFound(format!("unit {} has no current phase", unit_id))
        })?;
        let next = PhaseLifecycle::next_phase(&snapshot.catalog, current)?;

        self.transition(unit_id, next.id, triggered_by, reason).await
    }

    /// Marks units left `transitioning` by an earlier process as failed.
    /// Returns the ids of the units that were reset.
    pub async fn recover_interrupted_transitions(&self) -> Result<Vec<Uuid>> {
        let units = self.store.fetch_units().await?;
        let mut recovered = Vec::new();

        for unit in units {
            if !PhaseLifecycle::is_interrupted(&unit, self.registry.is_in_flight(unit.id)) {
                continue;
            }

            warn!(unit_id = %unit.id, code = %unit.code, "Recovering interrupted transition");
            self.mark_failed(unit.id, UnitStatus::Transitioning).await;

            match unit.current_phase_id {
                Some(phase_id) => {
                    let log = PhaseTransitionLog::failed(
                        unit.id,
                        Some(phase_id),
                        phase_id,
                        SYSTEM_INITIATOR,
                        RECOVERY_REASON,
                        INTERRUPTED_MESSAGE,
                    );
                    self.record(log).await;
                    self.emit(Event::TransitionFailed {
                        unit_id: unit.id,
                        to_phase_id: phase_id,
                        error: INTERRUPTED_MESSAGE.to_string(),
                    });
                }
                None => warn!(unit_id = %unit.id, "Interrupted unit has no phase; no log entry written"),
            }

            recovered.push(unit.id);
        }

        if !recovered.is_empty() {
            info!(count = recovered.len(), "Recovered interrupted transitions");
        }
        Ok(recovered)
    }

    /// Whether the moderation assistant may auto-respond for this unit.
    /// Any missing record or store failure answers `false`.
    pub async fn can_unit_respond(&self, unit_id: Uuid) -> bool {
        match self.resolve_response_permission(unit_id).await {
            Ok(allowed) => allowed,
            Err(err) => {
                error!(unit_id = %unit_id, error = %err, "Failed to check response permission");
                false
            }
        }
    }

    pub async fn register(&self, name: &str, code: &str, location: &str) -> Result<Unit> {
        self.register_unit(RegisterUnitRequest::new(name, code, location))
            .await
    }

    /// Creates a unit in the initial phase.
    pub async fn register_unit(&self, request: RegisterUnitRequest) -> Result<Unit> {
        let name = request.name.trim();
        let code = request.code.trim();
        let location = request.location.trim();

        if name.is_empty() || code.is_empty() || location.is_empty() {
            return Err(OrchestratorError::Validation(
                "name, code and location are required".to_string(),
            ));
        }

        let snapshot = self.snapshot().await?;

        if snapshot.units.iter().any(|u| u.code == code) {
            return Err(OrchestratorError::DuplicateCode(code.to_string()));
        }

        let initial = snapshot.catalog.initial().ok_or_else(|| {
            OrchestratorError::Configuration(format!(
                "initial phase {} is missing",
                PhaseName::INITIAL
            ))
        })?;

        if snapshot.behavior.resolve(initial.id).is_none() {
            warn!(phase = %initial.name, "No behavior group for initial phase");
        }

        let create = CreateUnitRequest {
            name: name.to_string(),
            code: code.to_string(),
            location: location.to_string(),
            address: non_empty(request.address),
            city: non_empty(request.city),
            state: non_empty(request.state),
            current_phase_id: Some(initial.id),
            status: UnitStatus::Active,
        };

        let unit = self.store.create_unit(&create).await.map_err(|err| {
            if err.is_unique_violation() {
                OrchestratorError::DuplicateCode(code.to_string())
            } else {
                OrchestratorError::CreateFailed(err.to_string())
            }
        })?;

        let log = PhaseTransitionLog::succeeded(
            unit.id,
            None,
            initial.id,
            SYSTEM_INITIATOR,
            REGISTRATION_REASON,
        );
        self.record(log).await;
        self.emit(Event::UnitRegistered {
            unit_id: unit.id,
            code: unit.code.clone(),
            phase_id: initial.id,
        });

        info!(unit_id = %unit.id, code = %unit.code, "Unit registered");
        Ok(unit)
    }

    /// Edits the maintainable fields of a phase.
    pub async fn update_phase(&self, phase_id: Uuid, update: UpdatePhaseRequest) -> Result<Phase> {
        let phases = self.store.fetch_phases().await?;
        let existing = phases
            .iter()
            .find(|p| p.id == phase_id)
            .ok_or_else(|| OrchestratorError::phase_not_found(phase_id))?;

        let min = update.min_duration_days.or(existing.min_duration_days);
        let max = update.max_duration_days.or(existing.max_duration_days);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(OrchestratorError::Validation(format!(
                    "minimum duration {} exceeds maximum {}",
                    min, max
                )));
            }
        }

        let phase = self
            .store
            .update_phase(phase_id, &update)
            .await
            .map_err(|err| OrchestratorError::UpdateFailed(err.to_string()))?;

        self.emit(Event::PhaseUpdated { phase_id });
        info!(phase = %phase.name, "Phase updated");
        Ok(phase)
    }

    /// Catalog sorted by order.
    pub async fn phases(&self) -> Result<Vec<Phase>> {
        let phases = self.store.fetch_phases().await?;
        Ok(PhaseCatalog::new(phases).into_phases())
    }

    pub async fn units(&self) -> Result<Vec<Unit>> {
        Ok(self.store.fetch_units().await?)
    }

    pub async fn unit(&self, unit_id: Uuid) -> Result<Unit> {
        self.store
            .fetch_units()
            .await?
            .into_iter()
            .find(|u| u.id == unit_id)
            .ok_or_else(|| OrchestratorError::unit_not_found(unit_id))
    }

    pub async fn behavior_for_phase(&self, phase_id: Uuid) -> Result<BehaviorGroup> {
        self.store
            .fetch_behavior_group(phase_id)
            .await?
            .ok_or_else(|| {
                OrchestratorError::NotFound(format!("behavior group for phase {}", phase_id))
            })
    }

    /// Replaces the in-memory history with what the store has persisted.
    pub async fn hydrate_logs(&self) -> Result<usize> {
        let logs = self.store.fetch_transition_logs().await?;
        let count = logs.len();
        self.logs.replace(logs);
        debug!(count, "Transition log hydrated");
        Ok(count)
    }

    async fn run_transition(
        &self,
        unit_id: Uuid,
        new_phase_id: Uuid,
    ) -> Result<(Unit, Option<Uuid>)> {
        let snapshot = self.snapshot().await?;
        let unit = snapshot
            .unit(unit_id)
            .ok_or_else(|| OrchestratorError::unit_not_found(unit_id))?;
        let phase = snapshot
            .catalog
            .find(new_phase_id)
            .ok_or_else(|| OrchestratorError::phase_not_found(new_phase_id))?;

        if snapshot.behavior.resolve(phase.id).is_none() {
            warn!(phase = %phase.name, "No behavior group for target phase");
        }

        let from_phase_id = unit.current_phase_id;
        if let Err(err) = self
            .set_status(unit_id, unit.status, UnitStatus::Transitioning)
            .await
        {
            self.mark_failed(unit_id, unit.status).await;
            return Err(err);
        }

        match self.apply_transition(unit, phase).await {
            Ok(updated) => Ok((updated, from_phase_id)),
            Err(err) => {
                self.mark_failed(unit_id, UnitStatus::Transitioning).await;
                Err(err)
            }
        }
    }

    /// Runs with the unit already persisted as `transitioning`.
    async fn apply_transition(&self, unit: &Unit, phase: &Phase) -> Result<Unit> {
        tokio::time::sleep(self.config.settle_delay).await;

        let updated = self
            .store
            .update_unit(unit.id, &UpdateUnitRequest::phase(phase.id, UnitStatus::Active))
            .await
            .map_err(|err| OrchestratorError::UpdateFailed(err.to_string()))?;
        self.emit_status_change(unit.id, UnitStatus::Transitioning, UnitStatus::Active);

        match self.documentation.activate(unit.id, phase).await {
            Ok(docs) => {
                info!(unit_id = %unit.id, phase = %phase.name, count = docs.len(), "Documentation activated")
            }
            Err(err) => {
                warn!(unit_id = %unit.id, phase = %phase.name, error = %err, "Documentation activation failed")
            }
        }

        Ok(updated)
    }

    async fn set_status(&self, unit_id: Uuid, from: UnitStatus, to: UnitStatus) -> Result<Unit> {
        let unit = self
            .store
            .update_unit(unit_id, &UpdateUnitRequest::status(to))
            .await
            .map_err(|err| OrchestratorError::UpdateFailed(err.to_string()))?;
        self.emit_status_change(unit_id, from, to);
        Ok(unit)
    }

    /// Best effort: `error`, then `inactive` if that write fails too. `from`
    /// is the status the unit holds in the store.
    async fn mark_failed(&self, unit_id: Uuid, from: UnitStatus) {
        for status in PhaseLifecycle::FAILURE_STATUSES {
            match self.set_status(unit_id, from, status).await
            {
                Ok(_) => return,
                Err(err) => {
                    warn!(unit_id = %unit_id, status = %status, error = %err, "Failed to reset unit status")
                }
            }
        }
        error!(unit_id = %unit_id, "Unit status could not be reset after failed transition");
    }

    async fn resolve_response_permission(&self, unit_id: Uuid) -> Result<bool> {
        let (units, groups) = futures::try_join!(
            self.store.fetch_units(),
            self.store.fetch_behavior_groups()
        )?;

        let Some(unit) = units.iter().find(|u| u.id == unit_id) else {
            debug!(unit_id = %unit_id, "Unit not found for response check");
            return Ok(false);
        };
        let Some(phase_id) = unit.current_phase_id else {
            return Ok(false);
        };

        let behavior = BehaviorResolver::new(groups);
        if behavior.resolve(phase_id).is_none() {
            warn!(unit_id = %unit_id, phase_id = %phase_id, "No behavior group for unit phase");
            return Ok(false);
        }

        let config = self.store.fetch_unit_behavior_config(unit_id).await?;
        Ok(behavior.allows_response(phase_id, config.as_ref()))
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let (units, phases, groups) = futures::try_join!(
            self.store.fetch_units(),
            self.store.fetch_phases(),
            self.store.fetch_behavior_groups()
        )?;

        let catalog = PhaseCatalog::new(phases);
        catalog.validate()?;

        Ok(Snapshot {
            units,
            catalog,
            behavior: BehaviorResolver::new(groups),
        })
    }

    async fn record_failure(
        &self,
        unit_id: Uuid,
        to_phase_id: Uuid,
        triggered_by: &str,
        reason: &str,
        err: &OrchestratorError,
    ) {
        let message = err.to_string();
        let log = PhaseTransitionLog::failed(
            unit_id,
            None,
            to_phase_id,
            triggered_by,
            reason,
            message.as_str(),
        );
        self.record(log).await;
        self.emit(Event::TransitionFailed {
            unit_id,
            to_phase_id,
            error: message,
        });
    }

    /// Keeps the entry in memory even when persisting it fails.
    async fn record(&self, log: PhaseTransitionLog) {
        info!(
            unit_id = %log.unit_id,
            from_phase_id = ?log.from_phase_id,
            to_phase_id = %log.to_phase_id,
            success = log.success,
            reason = %log.reason,
            error = ?log.error_message,
            "Phase transition logged"
        );

        if let Err(err) = self.store.append_transition_log(&log).await {
            warn!(log_id = %log.id, error = %err, "Failed to persist transition log");
        }
        self.logs.record(log);
    }

    fn emit_status_change(&self, unit_id: Uuid, from: UnitStatus, to: UnitStatus) {
        self.emit(Event::UnitStatusChanged {
            unit_id,
            from_status: from.as_str().to_string(),
            to_status: to.as_str().to_string(),
        });
    }

    fn emit(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(event);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
