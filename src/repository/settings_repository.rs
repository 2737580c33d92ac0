use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::{
    domain::AdminSettings,
    error::{AppError, Result},
    repository::SettingsRepository,
};

#[derive(FromRow)]
struct SettingsRow {
    rate_per_km: f64,
    payment_info: String,
    admin_password_hash: String,
    updated_at: NaiveDateTime,
}

impl From<SettingsRow> for AdminSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            rate_per_km: row.rate_per_km,
            payment_info: row.payment_info,
            admin_password_hash: row.admin_password_hash,
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        }
    }
}

/// The settings table holds a single row with `id = 1`.
pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    async fn get(&self) -> Result<Option<AdminSettings>> {
        let row = sqlx::query_as::<_, SettingsRow>(
            r#"
            SELECT rate_per_km, payment_info, admin_password_hash, updated_at
            FROM settings
            WHERE id = 1
            "#
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_if_missing(&self, settings: &AdminSettings) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO settings (id, rate_per_km, payment_info, admin_password_hash, updated_at)
            VALUES (1, ?, ?, ?, ?)
            "#
        )
        .bind(settings.rate_per_km)
        .bind(&settings.payment_info)
        .bind(&settings.admin_password_hash)
        .bind(settings.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(
        &self,
        rate_per_km: f64,
        payment_info: &str,
        admin_password_hash: Option<&str>,
    ) -> Result<AdminSettings> {
        let result = sqlx::query(
            r#"
            UPDATE settings
            SET rate_per_km = ?,
                payment_info = ?,
                admin_password_hash = COALESCE(?, admin_password_hash),
                updated_at = ?
            WHERE id = 1
            "#
        )
        .bind(rate_per_km)
        .bind(payment_info)
        .bind(admin_password_hash)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Settings not found".to_string()));
        }

        self.get().await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated settings".to_string())
        })
    }
}
