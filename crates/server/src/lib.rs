pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Phasekeeper API",
        version = "0.1.0",
        description = "Operational lifecycle of franchise units: phases, transitions and response gating"
    ),
    paths(
        routes::health_check,
        routes::units::list_units,
        routes::units::register_unit,
        routes::units::get_unit,
        routes::units::can_respond,
        routes::units::transition_unit,
        routes::units::advance_unit,
        routes::units::list_unit_transitions,
        routes::phases::list_phases,
        routes::phases::update_phase,
        routes::phases::get_phase_behavior,
        routes::transitions::list_transitions,
        routes::sse::events_stream,
    ),
    components(schemas(
        routes::HealthResponse,
        routes::units::TransitionRequest,
        routes::units::AdvanceRequest,
        routes::units::CanRespondResponse,
        phasekeeper_core::Unit,
        phasekeeper_core::UnitStatus,
        phasekeeper_core::RegisterUnitRequest,
        phasekeeper_core::Phase,
        phasekeeper_core::PhaseName,
        routes::phases::PhaseEditRequest,
        phasekeeper_core::BehaviorGroup,
        phasekeeper_core::BehaviorScope,
        phasekeeper_core::PhaseTransitionLog,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "units", description = "Unit registration, transitions and response gating"),
        (name = "phases", description = "Phase catalog endpoints"),
        (name = "transitions", description = "Transition audit log"),
        (name = "events", description = "Real-time event streaming (SSE)"),
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .route("/health", get(routes::health_check))
        .route(
            "/api/units",
            get(routes::units::list_units).post(routes::units::register_unit),
        )
        .route("/api/units/{id}", get(routes::units::get_unit))
        .route(
            "/api/units/{id}/can-respond",
            get(routes::units::can_respond),
        )
        .route(
            "/api/units/{id}/transition",
            post(routes::units::transition_unit),
        )
        .route("/api/units/{id}/advance", post(routes::units::advance_unit))
        .route(
            "/api/units/{id}/transitions",
            get(routes::units::list_unit_transitions),
        )
        .route("/api/phases", get(routes::phases::list_phases))
        .route(
            "/api/phases/{id}",
            axum::routing::patch(routes::phases::update_phase),
        )
        .route(
            "/api/phases/{id}/behavior",
            get(routes::phases::get_phase_behavior),
        )
        .route(
            "/api/transitions",
            get(routes::transitions::list_transitions),
        )
        .route("/api/events", get(routes::sse::events_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
