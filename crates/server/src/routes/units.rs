use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use phasekeeper_core::{
    PhaseTransitionLog, RegisterUnitRequest, Unit, MANUAL_TRANSITION_REASON, SYSTEM_INITIATOR,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct TransitionRequest {
    pub phase_id: Uuid,
    #[serde(default)]
    pub triggered_by: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct AdvanceRequest {
    #[serde(default)]
    pub triggered_by: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CanRespondResponse {
    pub unit_id: Uuid,
    pub can_respond: bool,
}

fn initiator(triggered_by: Option<String>) -> String {
    triggered_by
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| SYSTEM_INITIATOR.to_string())
}

fn reason(reason: Option<String>) -> String {
    reason
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| MANUAL_TRANSITION_REASON.to_string())
}

#[utoipa::path(
    get,
    path = "/api/units",
    responses(
        (status = 200, description = "All units", body = Vec<Unit>)
    ),
    tag = "units"
)]
pub async fn list_units(State(state): State<AppState>) -> Result<Json<Vec<Unit>>, AppError> {
    let units = state.manager.units().await?;
    Ok(Json(units))
}

#[utoipa::path(
    post,
    path = "/api/units",
    request_body = RegisterUnitRequest,
    responses(
        (status = 201, description = "Unit registered in the initial phase", body = Unit),
        (status = 400, description = "Missing name, code or location"),
        (status = 409, description = "Unit code already in use")
    ),
    tag = "units"
)]
pub async fn register_unit(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUnitRequest>,
) -> Result<(StatusCode, Json<Unit>), AppError> {
    let unit = state.manager.register_unit(payload).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    get,
    path = "/api/units/{id}",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit", body = Unit),
        (status = 404, description = "Unit not found")
    ),
    tag = "units"
)]
pub async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Unit>, AppError> {
    let unit = state.manager.unit(id).await?;
    Ok(Json(unit))
}

#[utoipa::path(
    get,
    path = "/api/units/{id}/can-respond",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Whether auto-responses are allowed", body = CanRespondResponse)
    ),
    tag = "units"
)]
pub async fn can_respond(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<CanRespondResponse> {
    let can_respond = state.manager.can_unit_respond(id).await;
    Json(CanRespondResponse {
        unit_id: id,
        can_respond,
    })
}

#[utoipa::path(
    post,
    path = "/api/units/{id}/transition",
    params(("id" = Uuid, Path, description = "Unit ID")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Unit after the transition", body = Unit),
        (status = 404, description = "Unit or phase not found"),
        (status = 409, description = "Another transition is running for this unit")
    ),
    tag = "units"
)]
pub async fn transition_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionRequest>,
) -> Result<Json<Unit>, AppError> {
    let unit = state
        .manager
        .transition(
            id,
            payload.phase_id,
            &initiator(payload.triggered_by),
            &reason(payload.reason),
        )
        .await?;
    Ok(Json(unit))
}

#[utoipa::path(
    post,
    path = "/api/units/{id}/advance",
    params(("id" = Uuid, Path, description = "Unit ID")),
    request_body = AdvanceRequest,
    responses(
        (status = 200, description = "Unit after moving to the next phase", body = Unit),
        (status = 400, description = "Unit is in the terminal phase"),
        (status = 404, description = "Unit not found")
    ),
    tag = "units"
)]
pub async fn advance_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceRequest>,
) -> Result<Json<Unit>, AppError> {
    let unit = state
        .manager
        .advance(id, &initiator(payload.triggered_by), &reason(payload.reason))
        .await?;
    Ok(Json(unit))
}

#[utoipa::path(
    get,
    path = "/api/units/{id}/transitions",
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Transition history, most recent first", body = Vec<PhaseTransitionLog>)
    ),
    tag = "units"
)]
pub async fn list_unit_transitions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<Vec<PhaseTransitionLog>> {
    Json(state.manager.transition_logs_for(id))
}
