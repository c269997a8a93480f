use std::collections::HashMap;

use phasekeeper_core::{BehaviorGroup, UnitBehaviorConfig};
use uuid::Uuid;

/// Lookup of behavior groups by the phase they govern.
///
/// Built from a fresh store snapshot per operation; nothing is cached across
/// calls.
#[derive(Debug, Default)]
pub struct BehaviorResolver {
    by_phase: HashMap<Uuid, BehaviorGroup>,
}

impl BehaviorResolver {
    pub fn new(groups: Vec<BehaviorGroup>) -> Self {
        Self {
            by_phase: groups.into_iter().map(|g| (g.phase_id, g)).collect(),
        }
    }

    pub fn resolve(&self, phase_id: Uuid) -> Option<&BehaviorGroup> {
        self.by_phase.get(&phase_id)
    }

    /// Whether a unit in `phase_id` may auto-respond. A unit override wins over
    /// the group; a missing group means no.
    pub fn allows_response(&self, phase_id: Uuid, config: Option<&UnitBehaviorConfig>) -> bool {
        let Some(group) = self.resolve(phase_id) else {
            return false;
        };
        config
            .and_then(|c| c.overrides.allowed_to_respond)
            .unwrap_or(group.allowed_to_respond)
    }
}
