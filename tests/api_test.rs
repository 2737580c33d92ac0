use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use carpool::{
    api,
    config::Settings,
    service::ServiceContext,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

const ADMIN_PASSWORD: &str = "admin123";

async fn test_app() -> anyhow::Result<Router> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    let settings = Settings::default();
    let ctx = Arc::new(ServiceContext::from_pool(pool));
    ctx.settings_service
        .ensure_initialized(&settings.ledger, ADMIN_PASSWORD)
        .await?;

    Ok(api::create_app(ctx, Arc::new(settings)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> anyhow::Result<(StatusCode, Option<String>, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, set_cookie, value))
}

async fn login(app: &Router) -> anyhow::Result<String> {
    let (status, cookie, body) = send(
        app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": ADMIN_PASSWORD })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    Ok(cookie.expect("login sets a session cookie"))
}

fn trip_body(distance_km: f64, passengers: &[&str]) -> Value {
    json!({
        "start_location": { "address": "Tata", "lat": 0, "lng": 0 },
        "end_location": { "address": "Komárom", "lat": 0, "lng": 0 },
        "distance_km": distance_km,
        "passengers": passengers,
        "payment_method": "card"
    })
}

#[tokio::test]
async fn test_public_settings_hide_password() -> anyhow::Result<()> {
    let app = test_app().await?;

    let (status, _, body) = send(&app, "GET", "/api/settings", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rate_per_km"], json!(150.0));
    assert!(body.get("admin_password").is_none());
    assert!(body.get("admin_password_hash").is_none());

    Ok(())
}

#[tokio::test]
async fn test_create_and_list_trips() -> anyhow::Result<()> {
    let app = test_app().await?;

    let (status, _, created) = send(
        &app,
        "POST",
        "/api/trips",
        Some(trip_body(10.0, &[" Anna ", "", "Bela"])),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["passengers"], json!(["Anna", "Bela"]));
    assert_eq!(created["total_cost"], json!(1500.0));
    assert_eq!(created["cost_per_person"], json!(750.0));
    assert_eq!(created["payment_method"], json!("card"));
    assert_eq!(created["paid"], json!(false));

    let (status, _, trips) = send(&app, "GET", "/api/trips?limit=5", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trips.as_array().map(Vec::len), Some(1));
    assert_eq!(trips[0]["id"], created["id"]);

    let (status, _, _) = send(&app, "GET", "/api/trips?limit=0", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_invalid_trip_is_rejected() -> anyhow::Result<()> {
    let app = test_app().await?;

    let (status, _, body) = send(&app, "POST", "/api/trips", Some(trip_body(0.0, &["Anna"])), None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().is_some());

    let (_, _, trips) = send(&app, "GET", "/api/trips", None, None).await?;
    assert_eq!(trips, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_oversized_trip_and_rate_are_rejected() -> anyhow::Result<()> {
    let app = test_app().await?;
    let cookie = login(&app).await?;

    let (status, _, _) = send(&app, "POST", "/api/trips", Some(trip_body(1e307, &["Anna"])), None).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, _) = send(
        &app,
        "PUT",
        "/api/admin/settings",
        Some(json!({ "rate_per_km": 1e308, "payment_info": "IBAN" })),
        Some(&cookie),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, _, settings) = send(&app, "GET", "/api/settings", None, None).await?;
    assert_eq!(settings["rate_per_km"], json!(150.0));

    let (status, _, trip) = send(&app, "POST", "/api/trips", Some(trip_body(10.0, &["Anna"])), None).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trip["total_cost"], json!(1500.0));

    let (_, _, trips) = send(&app, "GET", "/api/trips", None, None).await?;
    assert_eq!(trips.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_settings_update_requires_payment_info() -> anyhow::Result<()> {
    let app = test_app().await?;
    let cookie = login(&app).await?;

    let (_, _, before) = send(&app, "GET", "/api/settings", None, None).await?;

    let (status, _, _) = send(
        &app,
        "PUT",
        "/api/admin/settings",
        Some(json!({ "rate_per_km": 120.0 })),
        Some(&cookie),
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, _, after) = send(&app, "GET", "/api/settings", None, None).await?;
    assert_eq!(after, before);
    assert_ne!(after["payment_info"], json!(""));

    Ok(())
}

#[tokio::test]
async fn test_login_reports_session_expiry() -> anyhow::Result<()> {
    let app = test_app().await?;

    let (status, _, body) = send(
        &app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": ADMIN_PASSWORD })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let expires_at: DateTime<Utc> = serde_json::from_value(body["expires_at"].clone())?;
    let remaining = expires_at - Utc::now();
    assert!(remaining > Duration::hours(23) && remaining <= Duration::hours(24));

    Ok(())
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() -> anyhow::Result<()> {
    let app = test_app().await?;

    let (status, cookie, _) = send(
        &app,
        "POST",
        "/api/admin/login",
        Some(json!({ "password": "nope" })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());

    Ok(())
}

#[tokio::test]
async fn test_admin_routes_require_session() -> anyhow::Result<()> {
    let app = test_app().await?;

    let (_, _, trip) = send(&app, "POST", "/api/trips", Some(trip_body(4.0, &["Anna"])), None).await?;
    let trip_id = trip["id"].as_str().expect("trip id").to_string();

    let (status, _, _) = send(
        &app,
        "PUT",
        "/api/admin/settings",
        Some(json!({ "rate_per_km": 1.0, "payment_info": "hijacked" })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, "DELETE", &format!("/api/admin/trip/{}", trip_id), None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(&app, "GET", "/api/admin/trips", None, Some("session=forged")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, _, settings) = send(&app, "GET", "/api/settings", None, None).await?;
    assert_eq!(settings["rate_per_km"], json!(150.0));
    assert_ne!(settings["payment_info"], json!("hijacked"));

    let (_, _, trips) = send(&app, "GET", "/api/trips", None, None).await?;
    assert_eq!(trips.as_array().map(Vec::len), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_admin_manages_trips() -> anyhow::Result<()> {
    let app = test_app().await?;
    let cookie = login(&app).await?;

    let (_, _, first) = send(&app, "POST", "/api/trips", Some(trip_body(2.0, &["Anna"])), None).await?;
    let (_, _, second) = send(&app, "POST", "/api/trips", Some(trip_body(4.0, &["Anna", "Bela"])), None).await?;
    let first_id = first["id"].as_str().expect("trip id").to_string();
    let second_id = second["id"].as_str().expect("trip id").to_string();

    let (status, _, all) = send(&app, "GET", "/api/admin/trips", None, Some(&cookie)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all[0]["id"], json!(second_id));
    assert_eq!(all[1]["id"], json!(first_id));

    let paid_uri = format!("/api/admin/trip/{}/paid", first_id);
    for _ in 0..2 {
        let (status, _, trip) = send(&app, "PUT", &paid_uri, Some(json!({ "paid": true })), Some(&cookie)).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(trip["paid"], json!(true));
    }

    let (_, _, summary) = send(&app, "GET", "/api/passengers/summary", None, None).await?;
    assert_eq!(summary["Anna"]["trip_count"], json!(2));
    assert_eq!(summary["Anna"]["total_cost"], json!(600.0));
    assert_eq!(summary["Anna"]["unpaid_cost"], json!(300.0));
    assert_eq!(summary["Bela"]["total_distance"], json!(4.0));

    let (status, _, _) = send(&app, "DELETE", &format!("/api/admin/trip/{}", second_id), None, Some(&cookie)).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, _, summary) = send(&app, "GET", "/api/passengers/summary", None, None).await?;
    assert!(summary.get("Bela").is_none());
    assert_eq!(summary["Anna"]["unpaid_cost"], json!(0.0));

    let (status, _, _) = send(&app, "DELETE", &format!("/api/admin/trip/{}", second_id), None, Some(&cookie)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_admin_updates_settings() -> anyhow::Result<()> {
    let app = test_app().await?;
    let cookie = login(&app).await?;

    let (status, _, updated) = send(
        &app,
        "PUT",
        "/api/admin/settings",
        Some(json!({ "rate_per_km": 90.0, "payment_info": "Revolut @driver", "admin_password": "" })),
        Some(&cookie),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["rate_per_km"], json!(90.0));

    let (status, _, admin_view) = send(&app, "GET", "/api/admin/settings", None, Some(&cookie)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admin_view["payment_info"], json!("Revolut @driver"));

    // Blank password field kept the old one
    login(&app).await?;

    let (status, _, _) = send(&app, "POST", "/api/admin/logout", None, Some(&cookie)).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, "GET", "/api/admin/settings", None, Some(&cookie)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}
