use axum::extract::{Path, State};
use axum::Json;
use phasekeeper_core::{BehaviorGroup, Phase, PhaseDuration, UpdatePhaseRequest};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/phases",
    responses(
        (status = 200, description = "Phase catalog in lifecycle order", body = Vec<Phase>)
    ),
    tag = "phases"
)]
pub async fn list_phases(State(state): State<AppState>) -> Result<Json<Vec<Phase>>, AppError> {
    let phases = state.manager.phases().await?;
    Ok(Json(phases))
}

/// Body of `PATCH /api/phases/{id}`. `duration` takes the editor's
/// `"7-14 dias"` text and wins over the numeric bounds.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct PhaseEditRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub min_duration_days: Option<u32>,
    #[serde(default)]
    pub max_duration_days: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl PhaseEditRequest {
    fn into_update(self) -> Result<UpdatePhaseRequest, AppError> {
        let (min_duration_days, max_duration_days) = match self.duration.as_deref() {
            Some(text) => {
                let duration = PhaseDuration::parse(text).ok_or_else(|| {
                    AppError::BadRequest(format!("invalid duration '{}', expected e.g. 7-14 dias", text))
                })?;
                (Some(duration.min_days), Some(duration.max_days))
            }
            None => (self.min_duration_days, self.max_duration_days),
        };

        Ok(UpdatePhaseRequest {
            description: self.description,
            min_duration_days,
            max_duration_days,
            notes: self.notes,
        })
    }
}

#[utoipa::path(
    patch,
    path = "/api/phases/{id}",
    params(("id" = Uuid, Path, description = "Phase ID")),
    request_body = PhaseEditRequest,
    responses(
        (status = 200, description = "Updated phase", body = Phase),
        (status = 400, description = "Unreadable duration or minimum exceeds maximum"),
        (status = 404, description = "Phase not found")
    ),
    tag = "phases"
)]
pub async fn update_phase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PhaseEditRequest>,
) -> Result<Json<Phase>, AppError> {
    let phase = state.manager.update_phase(id, payload.into_update()?).await?;
    Ok(Json(phase))
}

#[utoipa::path(
    get,
    path = "/api/phases/{id}/behavior",
    params(("id" = Uuid, Path, description = "Phase ID")),
    responses(
        (status = 200, description = "Behavior group governing the phase", body = BehaviorGroup),
        (status = 404, description = "No behavior group for this phase")
    ),
    tag = "phases"
)]
pub async fn get_phase_behavior(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BehaviorGroup>, AppError> {
    let group = state.manager.behavior_for_phase(id).await?;
    Ok(Json(group))
}
