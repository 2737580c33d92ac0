use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on the per-km rate so trip costs stay finite.
pub const MAX_RATE_PER_KM: f64 = 1_000_000.0;

/// The admin-owned singleton. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSettings {
    pub rate_per_km: f64,
    pub payment_info: String,
    #[serde(skip_serializing)]
    pub admin_password_hash: String,
    pub updated_at: DateTime<Utc>,
}

/// What passengers (and the admin settings page) get to see.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicSettings {
    pub rate_per_km: f64,
    pub payment_info: String,
}

impl From<&AdminSettings> for PublicSettings {
    fn from(settings: &AdminSettings) -> Self {
        Self {
            rate_per_km: settings.rate_per_km,
            payment_info: settings.payment_info.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 0.0, max = MAX_RATE_PER_KM, message = "must be between 0 and 1000000"))]
    pub rate_per_km: f64,
    pub payment_info: String,
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl UpdateSettingsRequest {
    /// `None` when the password field was omitted or left blank, meaning the
    /// current password stays.
    pub fn new_password(&self) -> Option<&str> {
        self.admin_password
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}
