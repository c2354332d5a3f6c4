use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::status::StatusCheck;
use crate::models::tryon::{Measurements, TryOnRecord, TryOnStatus, TryOnUpdate};

/// PostgreSQL-backed record store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = init_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

/// Initialize PostgreSQL connection pool
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

fn tryon_from_row(row: &PgRow) -> Result<TryOnRecord, StoreError> {
    let id: Uuid = row.try_get("id")?;
    let status_str: String = row.try_get("status")?;
    let status = TryOnStatus::from_str(&status_str).map_err(|_| StoreError::Corrupt {
        id,
        reason: format!("unknown status '{status_str}'"),
    })?;
    let Json(measurements): Json<Measurements> = row.try_get("measurements")?;

    Ok(TryOnRecord {
        id,
        name: row.try_get("name")?,
        measurements,
        style: row.try_get("style")?,
        tryon_image: row.try_get("tryon_image")?,
        feedback: row.try_get("feedback")?,
        status,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert_tryon(&self, record: &TryOnRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tryon_results (id, name, measurements, style, tryon_image, feedback, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(Json(&record.measurements))
        .bind(&record.style)
        .bind(&record.tryon_image)
        .bind(&record.feedback)
        .bind(record.status.as_ref())
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_tryon(&self, id: Uuid, update: &TryOnUpdate) -> Result<bool, StoreError> {
        let result = match update {
            TryOnUpdate::Completed {
                tryon_image,
                feedback,
            } => {
                sqlx::query(
                    r#"
                    UPDATE tryon_results
                    SET status = $1, tryon_image = $2, feedback = $3
                    WHERE id = $4 AND status = 'processing'
                    "#,
                )
                .bind(update.status().as_ref())
                .bind(tryon_image)
                .bind(feedback)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
            TryOnUpdate::Failed => {
                sqlx::query(
                    r#"
                    UPDATE tryon_results
                    SET status = $1
                    WHERE id = $2 AND status = 'processing'
                    "#,
                )
                .bind(update.status().as_ref())
                .bind(id)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected() > 0)
    }

    async fn find_tryon(&self, id: Uuid) -> Result<Option<TryOnRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, measurements, style, tryon_image, feedback, status, created_at
            FROM tryon_results
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(tryon_from_row).transpose()
    }

    async fn list_tryons(&self, limit: i64) -> Result<Vec<TryOnRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, measurements, style, tryon_image, feedback, status, created_at
            FROM tryon_results
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(tryon_from_row).collect()
    }

    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StoreError> {
        sqlx::query(r#"INSERT INTO status_checks (id, client_name, "timestamp") VALUES ($1, $2, $3)"#)
            .bind(check.id)
            .bind(&check.client_name)
            .bind(check.timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>, StoreError> {
        let rows = sqlx::query(r#"SELECT id, client_name, "timestamp" FROM status_checks LIMIT $1"#)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|r| {
                Ok(StatusCheck {
                    id: r.try_get("id")?,
                    client_name: r.try_get("client_name")?,
                    timestamp: r.try_get("timestamp")?,
                })
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
