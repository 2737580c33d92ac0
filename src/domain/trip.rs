use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};

/// Mean earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const MAX_PASSENGERS: usize = 50;
pub const MAX_PASSENGER_NAME_LEN: usize = 100;
/// Roughly the length of the equator; anything above is a typo.
pub const MAX_DISTANCE_KM: f64 = 40_075.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, Validate)]
pub struct Location {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub lat: f64,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub lng: f64,
}

impl Location {
    /// Manually entered locations carry 0,0 instead of real coordinates.
    pub fn has_coordinates(&self) -> bool {
        self.lat != 0.0 || self.lng != 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub id: Uuid,
    pub start_location: Location,
    pub end_location: Location,
    pub distance_km: f64,
    pub passengers: Vec<String>,
    pub payment_method: PaymentMethod,
    pub total_cost: f64,
    pub cost_per_person: f64,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Prices a validated trip at `rate_per_km`. The resulting costs are a
    /// snapshot and are never recomputed afterwards.
    pub fn priced(new_trip: NewTrip, rate_per_km: f64) -> Self {
        let cost = allocate_cost(new_trip.distance_km, rate_per_km, new_trip.passengers.len());

        Self {
            id: Uuid::new_v4(),
            start_location: new_trip.start_location,
            end_location: new_trip.end_location,
            distance_km: new_trip.distance_km,
            passengers: new_trip.passengers,
            payment_method: new_trip.payment_method,
            total_cost: cost.total_cost,
            cost_per_person: cost.cost_per_person,
            paid: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripCost {
    pub total_cost: f64,
    pub cost_per_person: f64,
}

/// Splits `distance_km * rate_per_km` evenly. A trip without passengers is
/// charged as a single share.
pub fn allocate_cost(distance_km: f64, rate_per_km: f64, passenger_count: usize) -> TripCost {
    let total_cost = distance_km * rate_per_km;
    let shares = passenger_count.max(1) as f64;

    TripCost {
        total_cost,
        cost_per_person: total_cost / shares,
    }
}

/// Great-circle distance between two coordinates in kilometers.
pub fn haversine_km(from: &Location, to: &Location) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Trims names and drops empty entries. Duplicates are kept.
pub fn normalize_passengers(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTripRequest {
    #[validate(nested)]
    pub start_location: Location,
    #[validate(nested)]
    pub end_location: Location,
    #[validate(range(exclusive_min = 0.0, max = MAX_DISTANCE_KM, message = "must be a positive number up to 40075"))]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub passengers: Vec<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// A trip request that passed validation and is ready to be priced.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub start_location: Location,
    pub end_location: Location,
    pub distance_km: f64,
    pub passengers: Vec<String>,
    pub payment_method: PaymentMethod,
}

impl CreateTripRequest {
    pub fn into_new_trip(self) -> Result<NewTrip> {
        self.validate()?;

        for (label, location) in [("start_location", &self.start_location), ("end_location", &self.end_location)] {
            if !location.lat.is_finite() || !location.lng.is_finite() {
                return Err(AppError::Validation(format!("{}: coordinates must be finite", label)));
            }
            if !location.has_coordinates() && location.address.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "{}: address is required when no coordinates are given",
                    label
                )));
            }
        }

        let distance_km = match self.distance_km {
            Some(distance) if distance.is_finite() => distance,
            Some(_) => {
                return Err(AppError::Validation("distance_km: must be a positive number".to_string()));
            }
            None if self.start_location.has_coordinates() && self.end_location.has_coordinates() => {
                haversine_km(&self.start_location, &self.end_location)
            }
            None => {
                return Err(AppError::Validation(
                    "distance_km: required unless both locations have coordinates".to_string(),
                ));
            }
        };

        if distance_km <= 0.0 || distance_km > MAX_DISTANCE_KM {
            return Err(AppError::Validation("distance_km: must be a positive number up to 40075".to_string()));
        }

        let passengers = normalize_passengers(self.passengers);
        if passengers.len() > MAX_PASSENGERS {
            return Err(AppError::Validation(format!(
                "passengers: at most {} passengers per trip",
                MAX_PASSENGERS
            )));
        }
        if let Some(name) = passengers.iter().find(|name| name.chars().count() > MAX_PASSENGER_NAME_LEN) {
            return Err(AppError::Validation(format!(
                "passengers: name too long ({}...)",
                name.chars().take(20).collect::<String>()
            )));
        }

        Ok(NewTrip {
            start_location: Location {
                address: self.start_location.address.trim().to_string(),
                ..self.start_location
            },
            end_location: Location {
                address: self.end_location.address.trim().to_string(),
                ..self.end_location
            },
            distance_km,
            passengers,
            payment_method: self.payment_method,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripScope {
    /// The newest `n` trips.
    Recent(i64),
    All,
}
