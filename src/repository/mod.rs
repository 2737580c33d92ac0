use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod trip_repository;
pub mod settings_repository;

pub use trip_repository::SqliteTripRepository;
pub use settings_repository::SqliteSettingsRepository;

#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create(&self, trip: Trip) -> Result<Trip>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Trip>>;
    /// Newest first, regardless of scope.
    async fn list(&self, scope: TripScope) -> Result<Vec<Trip>>;
    /// Fails with `NotFound` when no trip has `id`.
    async fn set_paid(&self, id: Uuid, paid: bool) -> Result<Trip>;
    /// Fails with `NotFound` when no trip has `id`.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<Option<AdminSettings>>;
    /// Writes `settings` only if no settings row exists yet.
    async fn insert_if_missing(&self, settings: &AdminSettings) -> Result<()>;
    /// A `None` password hash keeps the stored one.
    async fn update(
        &self,
        rate_per_km: f64,
        payment_info: &str,
        admin_password_hash: Option<&str>,
    ) -> Result<AdminSettings>;
}
