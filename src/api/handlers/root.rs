use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Carpool API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Trip log and cost splitting for carpools",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "settings": "/api/settings",
            "trips": "/api/trips",
            "summary": "/api/passengers/summary",
            "admin": "/api/admin"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
