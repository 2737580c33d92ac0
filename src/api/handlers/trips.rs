use axum::{
    extract::{Path, Query, State, Extension},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::AdminSession, state::AppState},
    domain::{CreateTripRequest, Trip, TripScope},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SetPaidRequest {
    paid: bool,
}

/// Most recent trips, newest first.
pub async fn list_recent(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Trip>>> {
    let ledger = &state.settings.ledger;
    let limit = params.limit.unwrap_or(ledger.recent_trip_limit);
    if limit <= 0 {
        return Err(AppError::BadRequest("limit must be positive".to_string()));
    }

    let trips = state.service_context.ledger_service
        .list_trips(TripScope::Recent(limit.min(ledger.max_trip_limit)))
        .await?;

    Ok(Json(trips))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<Trip>)> {
    let settings = state.service_context.settings_service
        .get_settings()
        .await?;

    let trip = state.service_context.ledger_service
        .create_trip(&settings, request)
        .await?;

    Ok((StatusCode::CREATED, Json(trip)))
}

pub async fn list_all(
    State(state): State<AppState>,
    Extension(_admin): Extension<AdminSession>,
) -> Result<Json<Vec<Trip>>> {
    let trips = state.service_context.ledger_service
        .list_trips(TripScope::All)
        .await?;

    Ok(Json(trips))
}

pub async fn set_paid(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetPaidRequest>,
) -> Result<Json<Trip>> {
    let trip = state.service_context.ledger_service
        .set_paid(id, request.paid)
        .await?;
    tracing::info!(session_id = %admin.session_id, trip_id = %id, "Payment status set by admin");

    Ok(Json(trip))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.ledger_service
        .delete_trip(id)
        .await?;
    tracing::info!(session_id = %admin.session_id, trip_id = %id, "Trip removed by admin");

    Ok(StatusCode::NO_CONTENT)
}
