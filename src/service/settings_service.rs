use std::sync::Arc;
use chrono::Utc;
use validator::Validate;

use crate::{
    auth::AuthService,
    config::LedgerConfig,
    domain::{AdminSettings, PublicSettings, UpdateSettingsRequest, MAX_RATE_PER_KM},
    error::{AppError, Result},
    repository::SettingsRepository,
};

pub const MIN_ADMIN_PASSWORD_LEN: usize = 8;

pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
    auth_service: Arc<AuthService>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>, auth_service: Arc<AuthService>) -> Self {
        Self { repo, auth_service }
    }

    /// Seeds the settings row from configuration on first start. An existing
    /// row is left as it is.
    pub async fn ensure_initialized(
        &self,
        ledger: &LedgerConfig,
        admin_password: &str,
    ) -> Result<AdminSettings> {
        if let Some(existing) = self.repo.get().await? {
            return Ok(existing);
        }

        if !(0.0..=MAX_RATE_PER_KM).contains(&ledger.default_rate_per_km) {
            return Err(AppError::Internal(format!(
                "Invalid default rate per km: {}",
                ledger.default_rate_per_km
            )));
        }

        if admin_password == "admin123" {
            tracing::warn!("Seeding settings with the default admin password, change it from the admin page");
        }

        let settings = AdminSettings {
            rate_per_km: ledger.default_rate_per_km,
            payment_info: ledger.default_payment_info.clone(),
            admin_password_hash: AuthService::hash_password(admin_password).await?,
            updated_at: Utc::now(),
        };
        self.repo.insert_if_missing(&settings).await?;
        tracing::info!(rate_per_km = settings.rate_per_km, "Settings initialized");

        self.get_settings().await
    }

    pub async fn get_settings(&self) -> Result<AdminSettings> {
        self.repo
            .get()
            .await?
            .ok_or_else(|| AppError::NotFound("Settings not found".to_string()))
    }

    pub async fn get_public_settings(&self) -> Result<PublicSettings> {
        let settings = self.get_settings().await?;
        Ok(PublicSettings::from(&settings))
    }

    pub async fn verify_admin_password(&self, password: &str) -> Result<bool> {
        let settings = self.get_settings().await?;
        AuthService::verify_password(password, &settings.admin_password_hash).await
    }

    /// Existing trips keep the costs they were created with.
    pub async fn update_settings(&self, request: UpdateSettingsRequest) -> Result<PublicSettings> {
        request.validate()?;
        if !request.rate_per_km.is_finite() {
            return Err(AppError::Validation("rate_per_km: must be a finite number".to_string()));
        }

        let new_hash = match request.new_password() {
            Some(password) if password.chars().count() < MIN_ADMIN_PASSWORD_LEN => {
                return Err(AppError::Validation(format!(
                    "admin_password: must be at least {} characters",
                    MIN_ADMIN_PASSWORD_LEN
                )));
            }
            Some(password) => Some(AuthService::hash_password(password).await?),
            None => None,
        };

        let updated = self
            .repo
            .update(
                request.rate_per_km,
                request.payment_info.trim(),
                new_hash.as_deref(),
            )
            .await?;

        if new_hash.is_some() {
            let dropped = self.auth_service.invalidate_all_sessions().await?;
            tracing::info!(sessions = dropped, "Admin password changed, sessions invalidated");
        }

        tracing::info!(rate_per_km = updated.rate_per_km, "Settings updated");

        Ok(PublicSettings::from(&updated))
    }
}
