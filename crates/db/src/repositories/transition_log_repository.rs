use crate::error::DbError;
use crate::models::TransitionLogRow;
use phasekeeper_core::PhaseTransitionLog;
use sqlx::SqlitePool;
use uuid::Uuid;

const LOG_COLUMNS: &str =
    "id, unit_id, from_phase_id, to_phase_id, timestamp, triggered_by, reason, success, error_message";

/// Append-only store for transition audit entries. There is no update or
/// delete.
#[derive(Clone)]
pub struct TransitionLogRepository {
    pool: SqlitePool,
}

impl TransitionLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, log: &PhaseTransitionLog) -> Result<(), DbError> {
        let row = TransitionLogRow::from(log);

        sqlx::query(
            r#"
            INSERT INTO phase_transition_logs (id, unit_id, from_phase_id, to_phase_id, timestamp, triggered_by, reason, success, error_message)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.unit_id)
        .bind(&row.from_phase_id)
        .bind(&row.to_phase_id)
        .bind(row.timestamp)
        .bind(&row.triggered_by)
        .bind(&row.reason)
        .bind(row.success)
        .bind(&row.error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent first.
    pub async fn find_all(&self) -> Result<Vec<PhaseTransitionLog>, DbError> {
        let rows: Vec<TransitionLogRow> = sqlx::query_as(&format!(
            "SELECT {} FROM phase_transition_logs ORDER BY timestamp DESC, rowid DESC",
            LOG_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_append_and_list_most_recent_first() {
        let pool = setup_test_db().await;
        let repo = TransitionLogRepository::new(pool);
        let unit_id = Uuid::new_v4();

        let first = PhaseTransitionLog::succeeded(unit_id, None, Uuid::new_v4(), "system", "Unit registration");
        let second = PhaseTransitionLog::failed(
            unit_id,
            None,
            Uuid::new_v4(),
            "operator",
            "Manual transition",
            "Phase not found",
        );
        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        assert_eq!(all[0].error_message.as_deref(), Some("Phase not found"));
        assert!(all[1].from_phase_id.is_none());
    }
}
