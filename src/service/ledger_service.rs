use std::sync::Arc;
use uuid::Uuid;
use crate::{
    domain::*,
    error::{AppError, Result},
    repository::TripRepository,
};

/// Trip bookkeeping and the per-friend cost rollup.
pub struct LedgerService {
    repo: Arc<dyn TripRepository>,
}

impl LedgerService {
    pub fn new(repo: Arc<dyn TripRepository>) -> Self {
        Self { repo }
    }

    /// Prices the trip with the rate from `settings` as it is right now.
    pub async fn create_trip(
        &self,
        settings: &AdminSettings,
        request: CreateTripRequest,
    ) -> Result<Trip> {
        let new_trip = request.into_new_trip()?;
        let trip = Trip::priced(new_trip, settings.rate_per_km);
        if !trip.total_cost.is_finite() || !trip.cost_per_person.is_finite() {
            return Err(AppError::Validation(
                "total_cost: trip cost is out of range for the current rate".to_string(),
            ));
        }
        let trip = self.repo.create(trip).await?;

        tracing::info!(
            trip_id = %trip.id,
            distance_km = trip.distance_km,
            passengers = trip.passengers.len(),
            total_cost = trip.total_cost,
            "Trip created"
        );

        Ok(trip)
    }

    pub async fn list_trips(&self, scope: TripScope) -> Result<Vec<Trip>> {
        self.repo.list(scope).await
    }

    pub async fn set_paid(&self, id: Uuid, paid: bool) -> Result<Trip> {
        let trip = self.repo.set_paid(id, paid).await?;
        tracing::info!(trip_id = %id, paid, "Trip payment status updated");
        Ok(trip)
    }

    pub async fn delete_trip(&self, id: Uuid) -> Result<()> {
        self.repo.delete(id).await?;
        tracing::info!(trip_id = %id, "Trip deleted");
        Ok(())
    }

    /// Recomputed from the live trip set on every call.
    pub async fn summarize_passengers(&self) -> Result<PassengerSummary> {
        let trips = self.repo.list(TripScope::All).await?;
        Ok(summarize_passengers(&trips))
    }
}
