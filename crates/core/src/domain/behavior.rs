use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::CoreError;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// What the moderation assistant may talk about while a phase is active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BehaviorScope {
    #[serde(default)]
    pub allowed_questions: Vec<String>,
    #[serde(default)]
    pub automated_responses: bool,
    #[serde(default)]
    pub response_delay_secs: u32,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

impl Default for BehaviorScope {
    fn default() -> Self {
        Self {
            allowed_questions: Vec::new(),
            automated_responses: false,
            response_delay_secs: 0,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl BehaviorScope {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(CoreError::Validation(format!(
                "confidence threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }
}

/// Response policy bound one-to-one to a phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BehaviorGroup {
    pub id: Uuid,
    pub phase_id: Uuid,
    pub name: String,
    pub description: String,
    pub allowed_to_respond: bool,
    pub permissions: Vec<String>,
    pub restrictions: Vec<String>,
    pub scope: BehaviorScope,
}

impl BehaviorGroup {
    pub fn new(phase_id: Uuid, description: impl Into<String>, allowed_to_respond: bool) -> Self {
        let description = description.into();
        Self {
            id: Uuid::new_v4(),
            phase_id,
            name: format!("Grupo {}", description),
            description,
            allowed_to_respond,
            permissions: Vec::new(),
            restrictions: Vec::new(),
            scope: BehaviorScope::default(),
        }
    }

    pub fn with_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_restrictions(mut self, restrictions: Vec<String>) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn with_scope(mut self, scope: BehaviorScope) -> Self {
        self.scope = scope;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BehaviorOverrides {
    pub allowed_to_respond: Option<bool>,
}

/// Per-unit override of the phase's behavior group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct UnitBehaviorConfig {
    pub unit_id: Uuid,
    pub overrides: BehaviorOverrides,
}

impl UnitBehaviorConfig {
    pub fn allow_responses(unit_id: Uuid, allowed: bool) -> Self {
        Self {
            unit_id,
            overrides: BehaviorOverrides {
                allowed_to_respond: Some(allowed),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_name_derived_from_description() {
        let group = BehaviorGroup::new(Uuid::new_v4(), "Interação", true);
        assert_eq!(group.name, "Grupo Interação");
        assert!(group.allowed_to_respond);
        assert_eq!(group.scope.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn test_scope_threshold_bounds() {
        let mut scope = BehaviorScope::default();
        assert!(scope.validate().is_ok());

        scope.confidence_threshold = 1.0;
        assert!(scope.validate().is_ok());

        scope.confidence_threshold = 1.2;
        assert!(scope.validate().is_err());

        scope.confidence_threshold = -0.1;
        assert!(scope.validate().is_err());
    }

    #[test]
    fn test_scope_defaults_when_fields_missing() {
        let scope: BehaviorScope = serde_json::from_str("{}").unwrap();
        assert!(scope.allowed_questions.is_empty());
        assert!(!scope.automated_responses);
        assert_eq!(scope.confidence_threshold, 0.8);
    }

    #[test]
    fn test_override_constructor() {
        let unit_id = Uuid::new_v4();
        let config = UnitBehaviorConfig::allow_responses(unit_id, false);
        assert_eq!(config.overrides.allowed_to_respond, Some(false));
    }
}
