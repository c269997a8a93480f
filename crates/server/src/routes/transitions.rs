use axum::extract::{Query, State};
use axum::Json;
use phasekeeper_core::PhaseTransitionLog;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TransitionsQuery {
    /// Return at most this many entries.
    pub limit: Option<usize>,
    /// Only failed (`false`) or only successful (`true`) attempts.
    pub success: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/transitions",
    params(TransitionsQuery),
    responses(
        (status = 200, description = "Transition log, most recent first", body = Vec<PhaseTransitionLog>)
    ),
    tag = "transitions"
)]
pub async fn list_transitions(
    State(state): State<AppState>,
    Query(query): Query<TransitionsQuery>,
) -> Json<Vec<PhaseTransitionLog>> {
    let logs = state
        .manager
        .transition_logs()
        .into_iter()
        .filter(|log| query.success.map_or(true, |s| log.success == s))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();
    Json(logs)
}
