use crate::error::DbError;
use crate::models::UnitRow;
use chrono::Utc;
use phasekeeper_core::{Unit, UnitStatus, UpdateUnitRequest};
use sqlx::SqlitePool;
use uuid::Uuid;

const UNIT_COLUMNS: &str = "id, name, code, location, address, city, state, current_phase_id, status, created_at, updated_at";

#[derive(Clone)]
pub struct UnitRepository {
    pool: SqlitePool,
}

impl UnitRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, unit: &Unit) -> Result<Unit, DbError> {
        let row = UnitRow::from(unit);

        sqlx::query(
            r#"
            INSERT INTO units (id, name, code, location, address, city, state, current_phase_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.code)
        .bind(&row.location)
        .bind(&row.address)
        .bind(&row.city)
        .bind(&row.state)
        .bind(&row.current_phase_id)
        .bind(&row.status)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(unit.clone())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Unit>, DbError> {
        let row: Option<UnitRow> =
            sqlx::query_as(&format!("SELECT {} FROM units WHERE id = ?", UNIT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    pub async fn find_all(&self) -> Result<Vec<Unit>, DbError> {
        let rows: Vec<UnitRow> = sqlx::query_as(&format!(
            "SELECT {} FROM units ORDER BY created_at ASC, name ASC",
            UNIT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: &UpdateUnitRequest,
    ) -> Result<Option<Unit>, DbError> {
        let existing = self.find_by_id(id).await?;
        let Some(mut unit) = existing else {
            return Ok(None);
        };

        if let Some(name) = &update.name {
            unit.name = name.clone();
        }
        if let Some(location) = &update.location {
            unit.location = location.clone();
        }
        if let Some(address) = &update.address {
            unit.address = Some(address.clone());
        }
        if let Some(city) = &update.city {
            unit.city = Some(city.clone());
        }
        if let Some(state) = &update.state {
            unit.state = Some(state.clone());
        }
        if let Some(phase_id) = update.current_phase_id {
            unit.current_phase_id = Some(phase_id);
        }
        if let Some(status) = update.status {
            unit.status = status;
        }

        unit.updated_at = Utc::now();
        let row = UnitRow::from(&unit);

        sqlx::query(
            r#"
            UPDATE units
            SET name = ?, location = ?, address = ?, city = ?, state = ?, current_phase_id = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&row.name)
        .bind(&row.location)
        .bind(&row.address)
        .bind(&row.city)
        .bind(&row.state)
        .bind(&row.current_phase_id)
        .bind(&row.status)
        .bind(row.updated_at)
        .bind(&row.id)
        .execute(&self.pool)
        .await?;

        Ok(Some(unit))
    }

    pub async fn count_by_status(&self) -> Result<Vec<(UnitStatus, i64)>, DbError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM units GROUP BY status ORDER BY status")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(status, count)| {
                UnitStatus::parse(&status)
                    .map(|s| (s, count))
                    .ok_or_else(|| DbError::invalid_row("units", format!("unknown status {}", status)))
            })
            .collect()
    }
}
