use carpool::{
    config::Settings,
    domain::{CreateTripRequest, Location, PaymentMethod, TripScope},
    service::ServiceContext,
};
use sqlx::sqlite::SqlitePoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🌱 Starting database seeding...");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://carpool.db?mode=rwc".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let ctx = ServiceContext::from_pool(db_pool);
    let defaults = Settings::default();

    let settings = ctx.settings_service
        .ensure_initialized(&defaults.ledger, &defaults.auth.admin_password)
        .await?;
    println!("  ✅ Settings ready ({} per km)", settings.rate_per_km);

    if !ctx.ledger_service.list_trips(TripScope::Recent(1)).await?.is_empty() {
        println!("⚠️  Trips already exist, skipping demo trips");
        return Ok(());
    }

    println!("🚗 Creating trips...");

    let trips = [
        (place("Tata, Ady Endre utca", 47.6467, 18.3300), place("Tatabánya, Fő tér", 47.5692, 18.4048), None, vec!["Anna", "Bela"], PaymentMethod::Cash),
        (place("Tata", 0.0, 0.0), place("Budapest, Keleti pályaudvar", 0.0, 0.0), Some(68.5), vec!["Anna", "Csilla", "Dani"], PaymentMethod::Card),
        (place("Tata", 0.0, 0.0), place("Komárom", 0.0, 0.0), Some(19.0), vec!["Bela"], PaymentMethod::Cash),
        (place("Tata", 0.0, 0.0), place("Győr", 0.0, 0.0), Some(55.2), vec![], PaymentMethod::Card),
    ];

    for (start_location, end_location, distance_km, passengers, payment_method) in trips {
        let trip = ctx.ledger_service
            .create_trip(&settings, CreateTripRequest {
                start_location,
                end_location,
                distance_km,
                passengers: passengers.into_iter().map(String::from).collect(),
                payment_method,
            })
            .await?;
        println!(
            "  ✅ {} → {}: {:.1} km, {:.2} total",
            trip.start_location.address, trip.end_location.address, trip.distance_km, trip.total_cost
        );
    }

    println!("🎉 Seeding complete! Admin password: {}", defaults.auth.admin_password);

    Ok(())
}

fn place(address: &str, lat: f64, lng: f64) -> Location {
    Location {
        address: address.to_string(),
        lat,
        lng,
    }
}
