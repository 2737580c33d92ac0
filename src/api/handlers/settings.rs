use axum::{
    extract::State,
    Extension,
    Json,
};

use crate::{
    api::{middleware::auth::AdminSession, state::AppState},
    domain::{PublicSettings, UpdateSettingsRequest},
    error::Result,
};

pub async fn get_public(State(state): State<AppState>) -> Result<Json<PublicSettings>> {
    let settings = state.service_context.settings_service
        .get_public_settings()
        .await?;

    Ok(Json(settings))
}

// Same payload as the public view; the password hash is never returned
pub async fn get_admin(
    State(state): State<AppState>,
    Extension(_admin): Extension<AdminSession>,
) -> Result<Json<PublicSettings>> {
    let settings = state.service_context.settings_service
        .get_public_settings()
        .await?;

    Ok(Json(settings))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<PublicSettings>> {
    let updated = state.service_context.settings_service
        .update_settings(request)
        .await?;
    tracing::info!(session_id = %admin.session_id, rate_per_km = updated.rate_per_km, "Settings changed by admin");

    Ok(Json(updated))
}
