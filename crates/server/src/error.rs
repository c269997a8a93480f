use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::OrchestratorError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Lifecycle(OrchestratorError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Lifecycle(err) => {
                let status = match &err {
                    OrchestratorError::NotFound(_) => StatusCode::NOT_FOUND,
                    OrchestratorError::Validation(_) | OrchestratorError::InvalidTransition(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    OrchestratorError::DuplicateCode(_)
                    | OrchestratorError::TransitionInProgress(_) => StatusCode::CONFLICT,
                    OrchestratorError::UpdateFailed(_)
                    | OrchestratorError::CreateFailed(_)
                    | OrchestratorError::Configuration(_)
                    | OrchestratorError::Store(_) => {
                        tracing::error!("Lifecycle error: {:?}", err);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.kind(), err.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        AppError::Lifecycle(err)
    }
}
