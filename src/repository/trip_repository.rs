use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Location, PaymentMethod, Trip, TripScope},
    error::{AppError, Result},
    repository::TripRepository,
};

#[derive(FromRow)]
struct TripRow {
    id: String,
    start_address: String,
    start_lat: f64,
    start_lng: f64,
    end_address: String,
    end_lat: f64,
    end_lng: f64,
    distance_km: f64,
    passengers: String,
    payment_method: String,
    total_cost: f64,
    cost_per_person: f64,
    paid: bool,
    created_at: NaiveDateTime,
}

const TRIP_COLUMNS: &str = r#"
    id, start_address, start_lat, start_lng,
    end_address, end_lat, end_lng,
    distance_km, passengers, payment_method,
    total_cost, cost_per_person, paid, created_at
"#;

pub struct SqliteTripRepository {
    pool: SqlitePool,
}

impl SqliteTripRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_trip(row: TripRow) -> Result<Trip> {
        Ok(Trip {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            start_location: Location {
                address: row.start_address,
                lat: row.start_lat,
                lng: row.start_lng,
            },
            end_location: Location {
                address: row.end_address,
                lat: row.end_lat,
                lng: row.end_lng,
            },
            distance_km: row.distance_km,
            passengers: serde_json::from_str(&row.passengers)
                .map_err(|e| AppError::Database(format!("Invalid passengers column: {}", e)))?,
            payment_method: PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
                AppError::Database(format!("Invalid payment method: {}", row.payment_method))
            })?,
            total_cost: row.total_cost,
            cost_per_person: row.cost_per_person,
            paid: row.paid,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl TripRepository for SqliteTripRepository {
    async fn create(&self, trip: Trip) -> Result<Trip> {
        let passengers_json = serde_json::to_string(&trip.passengers)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO trips (
                id, start_address, start_lat, start_lng,
                end_address, end_lat, end_lng,
                distance_km, passengers, payment_method,
                total_cost, cost_per_person, paid, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(trip.id.to_string())
        .bind(&trip.start_location.address)
        .bind(trip.start_location.lat)
        .bind(trip.start_location.lng)
        .bind(&trip.end_location.address)
        .bind(trip.end_location.lat)
        .bind(trip.end_location.lng)
        .bind(trip.distance_km)
        .bind(&passengers_json)
        .bind(trip.payment_method.as_str())
        .bind(trip.total_cost)
        .bind(trip.cost_per_person)
        .bind(trip.paid)
        .bind(trip.created_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(trip.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created trip".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Trip>> {
        let row = sqlx::query_as::<_, TripRow>(&format!(
            "SELECT {} FROM trips WHERE id = ?",
            TRIP_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_trip).transpose()
    }

    async fn list(&self, scope: TripScope) -> Result<Vec<Trip>> {
        // rowid breaks ties between trips created within the same instant
        let rows = match scope {
            TripScope::Recent(limit) => {
                sqlx::query_as::<_, TripRow>(&format!(
                    "SELECT {} FROM trips ORDER BY created_at DESC, rowid DESC LIMIT ?",
                    TRIP_COLUMNS
                ))
                .bind(limit.max(0))
                .fetch_all(&self.pool)
                .await?
            }
            TripScope::All => {
                sqlx::query_as::<_, TripRow>(&format!(
                    "SELECT {} FROM trips ORDER BY created_at DESC, rowid DESC",
                    TRIP_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter()
            .map(Self::row_to_trip)
            .collect()
    }

    async fn set_paid(&self, id: Uuid, paid: bool) -> Result<Trip> {
        // SQLite counts matched rows, so re-applying the same value is not a miss
        let result = sqlx::query("UPDATE trips SET paid = ? WHERE id = ?")
            .bind(paid)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Trip not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound("Trip not found".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Trip not found".to_string()));
        }

        Ok(())
    }
}
