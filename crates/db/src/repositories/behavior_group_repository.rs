use crate::error::DbError;
use crate::models::BehaviorGroupRow;
use phasekeeper_core::BehaviorGroup;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

const GROUP_COLUMNS: &str =
    "id, phase_id, name, description, allowed_to_respond, permissions, restrictions, scope";

#[derive(Clone)]
pub struct BehaviorGroupRepository {
    pool: SqlitePool,
}

impl BehaviorGroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, group: &BehaviorGroup) -> Result<BehaviorGroup, DbError> {
        Self::insert(&self.pool, group).await?;
        Ok(group.clone())
    }

    pub(crate) async fn insert<'e, E>(executor: E, group: &BehaviorGroup) -> Result<(), DbError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = BehaviorGroupRow::try_from_domain(group)?;

        sqlx::query(
            r#"
            INSERT INTO behavior_groups (id, phase_id, name, description, allowed_to_respond, permissions, restrictions, scope)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.phase_id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(row.allowed_to_respond)
        .bind(&row.permissions)
        .bind(&row.restrictions)
        .bind(&row.scope)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_all(&self) -> Result<Vec<BehaviorGroup>, DbError> {
        let rows: Vec<BehaviorGroupRow> =
            sqlx::query_as(&format!("SELECT {} FROM behavior_groups", GROUP_COLUMNS))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    pub async fn find_by_phase_id(&self, phase_id: Uuid) -> Result<Option<BehaviorGroup>, DbError> {
        let row: Option<BehaviorGroupRow> = sqlx::query_as(&format!(
            "SELECT {} FROM behavior_groups WHERE phase_id = ?",
            GROUP_COLUMNS
        ))
        .bind(phase_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_domain()).transpose()
    }
}
