use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to update unit: {0}")]
    UpdateFailed(String),

    #[error("Failed to create unit: {0}")]
    CreateFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unit code already exists: {0}")]
    DuplicateCode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transition already in progress for unit {0}")]
    TransitionInProgress(Uuid),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl OrchestratorError {
    pub fn unit_not_found(unit_id: Uuid) -> Self {
        Self::NotFound(format!("unit {}", unit_id))
    }

    pub fn phase_not_found(phase_id: Uuid) -> Self {
        Self::NotFound(format!("phase {}", phase_id))
    }

    /// Stable tag used by API clients to branch on the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::UpdateFailed(_) => "update_failed",
            Self::CreateFailed(_) => "create_failed",
            Self::Validation(_) => "validation",
            Self::DuplicateCode(_) => "duplicate_code",
            Self::Configuration(_) => "configuration",
            Self::TransitionInProgress(_) => "transition_in_progress",
            Self::InvalidTransition(_) => "invalid_transition",
            Self::Store(_) => "store",
        }
    }
}

impl From<phasekeeper_core::CoreError> for OrchestratorError {
    fn from(err: phasekeeper_core::CoreError) -> Self {
        match err {
            phasekeeper_core::CoreError::Validation(msg) => Self::Validation(msg),
            phasekeeper_core::CoreError::InvalidCatalog(msg) => Self::Configuration(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(OrchestratorError::unit_not_found(Uuid::nil()).kind(), "not_found");
        assert_eq!(
            OrchestratorError::TransitionInProgress(Uuid::nil()).kind(),
            "transition_in_progress"
        );
        assert_eq!(
            OrchestratorError::DuplicateCode("CENTRAL".to_string()).kind(),
            "duplicate_code"
        );
    }

    #[test]
    fn test_messages_name_the_missing_record() {
        let id = Uuid::new_v4();
        let err = OrchestratorError::phase_not_found(id);
        assert_eq!(err.to_string(), format!("Not found: phase {}", id));
    }

    #[test]
    fn test_core_validation_maps_to_validation() {
        let err: OrchestratorError =
            phasekeeper_core::CoreError::Validation("min > max".to_string()).into();
        assert_eq!(err.kind(), "validation");
    }
}
