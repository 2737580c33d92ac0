pub mod ledger_service;
pub mod settings_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use crate::auth::AuthService;
use ledger_service::LedgerService;
use settings_service::SettingsService;

pub struct ServiceContext {
    pub trip_repo: Arc<dyn TripRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub auth_service: Arc<AuthService>,
    pub ledger_service: Arc<LedgerService>,
    pub settings_service: Arc<SettingsService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        trip_repo: Arc<dyn TripRepository>,
        settings_repo: Arc<dyn SettingsRepository>,
        auth_service: Arc<AuthService>,
        db_pool: SqlitePool,
    ) -> Self {
        let ledger_service = Arc::new(LedgerService::new(trip_repo.clone()));
        let settings_service = Arc::new(SettingsService::new(
            settings_repo.clone(),
            auth_service.clone(),
        ));

        Self {
            trip_repo,
            settings_repo,
            auth_service,
            ledger_service,
            settings_service,
            db_pool,
        }
    }

    /// Wires the SQLite repositories onto `db_pool`.
    pub fn from_pool(db_pool: SqlitePool) -> Self {
        let trip_repo = Arc::new(SqliteTripRepository::new(db_pool.clone()));
        let settings_repo = Arc::new(SqliteSettingsRepository::new(db_pool.clone()));
        let auth_service = Arc::new(AuthService::new(db_pool.clone()));

        Self::new(trip_repo, settings_repo, auth_service, db_pool)
    }
}
