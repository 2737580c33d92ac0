pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        .nest("/api", api_routes(app_state.clone()))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/settings", get(handlers::settings::get_public))
        .route("/trips", get(handlers::trips::list_recent).post(handlers::trips::create))
        .route("/passengers/summary", get(handlers::summary::passenger_summary))
        .nest("/admin", admin_routes(state))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/settings", get(handlers::settings::get_admin))
        .route("/settings", put(handlers::settings::update))
        .route("/trips", get(handlers::trips::list_all))
        .route("/trip/:id/paid", put(handlers::trips::set_paid))
        .route("/trip/:id", delete(handlers::trips::delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
        // Added after the layer so they stay reachable without a session
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
}
