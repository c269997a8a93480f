use crate::error::DbError;
use crate::models::PhaseRow;
use chrono::Utc;
use phasekeeper_core::{Phase, UpdatePhaseRequest};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

const PHASE_COLUMNS: &str = "id, name, sort_order, min_duration_days, max_duration_days, description, notes, next_phase_id, created_at, updated_at";

#[derive(Clone)]
pub struct PhaseRepository {
    pool: SqlitePool,
}

impl PhaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, phase: &Phase) -> Result<Phase, DbError> {
        Self::insert(&self.pool, phase).await?;
        Ok(phase.clone())
    }

    pub(crate) async fn insert<'e, E>(executor: E, phase: &Phase) -> Result<(), DbError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = PhaseRow::from(phase);

        sqlx::query(
            r#"
            INSERT INTO phases (id, name, sort_order, min_duration_days, max_duration_days, description, notes, next_phase_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(row.sort_order)
        .bind(row.min_duration_days)
        .bind(row.max_duration_days)
        .bind(&row.description)
        .bind(&row.notes)
        .bind(&row.next_phase_id)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Phase>, DbError> {
        let row: Option<PhaseRow> =
            sqlx::query_as(&format!("SELECT {} FROM phases WHERE id = ?", PHASE_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    /// All phases in lifecycle order.
    pub async fn find_all(&self) -> Result<Vec<Phase>, DbError> {
        let rows: Vec<PhaseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM phases ORDER BY sort_order ASC",
            PHASE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM phases")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: &UpdatePhaseRequest,
    ) -> Result<Option<Phase>, DbError> {
        let existing = self.find_by_id(id).await?;
        let Some(mut phase) = existing else {
            return Ok(None);
        };

        if let Some(description) = &update.description {
            phase.description = description.clone();
        }
        if let Some(min) = update.min_duration_days {
            phase.min_duration_days = Some(min);
        }
        if let Some(max) = update.max_duration_days {
            phase.max_duration_days = Some(max);
        }
        if let Some(notes) = &update.notes {
            phase.notes = Some(notes.clone());
        }

        phase.updated_at = Utc::now();
        let row = PhaseRow::from(&phase);

        sqlx::query(
            r#"
            UPDATE phases
            SET description = ?, min_duration_days = ?, max_duration_days = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&row.description)
        .bind(row.min_duration_days)
        .bind(row.max_duration_days)
        .bind(&row.notes)
        .bind(row.updated_at)
        .bind(&row.id)
        .execute(&self.pool)
        .await?;

        Ok(Some(phase))
    }
}
