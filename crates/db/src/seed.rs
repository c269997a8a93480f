use phasekeeper_core::catalog::seed_catalog;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbError;
use crate::repositories::{BehaviorGroupRepository, PhaseRepository};

/// Writes the fixed lifecycle catalog into an empty database.
///
/// Returns `false` without touching anything when phases already exist; the
/// stored catalog is authoritative from then on.
pub async fn seed_phase_catalog(pool: &SqlitePool) -> Result<bool, DbError> {
    let existing = PhaseRepository::new(pool.clone()).count().await?;
    if existing > 0 {
        debug!(phases = existing, "Phase catalog already present, skipping seed");
        return Ok(false);
    }

    let (phases, groups) = seed_catalog();
    let mut tx = pool.begin().await?;

    for phase in &phases {
        PhaseRepository::insert(&mut *tx, phase).await?;
    }
    for group in &groups {
        BehaviorGroupRepository::insert(&mut *tx, group).await?;
    }

    tx.commit().await?;

    info!(
        phases = phases.len(),
        behavior_groups = groups.len(),
        "Seeded phase catalog"
    );
    Ok(true)
}
