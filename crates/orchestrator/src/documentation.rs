use async_trait::async_trait;
use phasekeeper_core::Phase;
use uuid::Uuid;

use crate::error::Result;

/// Enables the phase-specific documentation for a unit after it enters a
/// phase. Returns the identifiers of the documents that were activated.
#[async_trait]
pub trait DocumentationActivator: Send + Sync {
    async fn activate(&self, unit_id: Uuid, phase: &Phase) -> Result<Vec<String>>;
}

/// Activates nothing. Used until a documentation backend is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDocumentation;

#[async_trait]
impl DocumentationActivator for NoopDocumentation {
    async fn activate(&self, _unit_id: Uuid, _phase: &Phase) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
