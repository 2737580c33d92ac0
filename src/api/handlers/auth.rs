use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    auth::{AuthService, SESSION_COOKIE},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let ctx = &state.service_context;

    if !ctx.settings_service.verify_admin_password(&req.password).await? {
        tracing::warn!("Rejected admin login attempt");
        return Err(AppError::Unauthorized);
    }

    let duration_hours = state.settings.auth.session_duration_hours;
    let (session, token) = ctx.auth_service
        .create_session(duration_hours)
        .await?;
    tracing::info!(session_id = %session.id, expires_at = %session.expires_at, "Admin logged in");

    let cookie = AuthService::create_session_cookie(
        &token,
        state.settings.auth.secure_cookies,
        duration_hours,
    );

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Admin authenticated".to_string(),
            expires_at: session.expires_at,
        }),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode)> {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        state.service_context.auth_service
            .invalidate_session(session_cookie.value())
            .await?;
    }

    let jar = jar.add(AuthService::create_logout_cookie());

    Ok((jar, StatusCode::NO_CONTENT))
}
