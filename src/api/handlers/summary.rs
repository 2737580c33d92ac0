use axum::{extract::State, Json};

use crate::{
    api::state::AppState,
    domain::PassengerSummary,
    error::Result,
};

pub async fn passenger_summary(State(state): State<AppState>) -> Result<Json<PassengerSummary>> {
    let summary = state.service_context.ledger_service
        .summarize_passengers()
        .await?;

    Ok(Json(summary))
}
