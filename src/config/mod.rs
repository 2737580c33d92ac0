use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Only used to seed the settings row on first start.
    pub admin_password: String,
    pub session_duration_hours: i64,
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    pub default_rate_per_km: f64,
    pub default_payment_info: String,
    pub recent_trip_limit: i64,
    pub max_trip_limit: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_rate_per_km: 150.0,
            default_payment_info: "Card: 1234-5678-9012-3456 | Bank: Your Name".to_string(),
            recent_trip_limit: 20,
            max_trip_limit: 500,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let ledger = LedgerConfig::default();

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8001)?
            .set_default("database.url", "sqlite://carpool.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.admin_password", "admin123")?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("auth.secure_cookies", false)?
            .set_default("ledger.default_rate_per_km", ledger.default_rate_per_km)?
            .set_default("ledger.default_payment_info", ledger.default_payment_info)?
            .set_default("ledger.recent_trip_limit", ledger.recent_trip_limit)?
            .set_default("ledger.max_trip_limit", ledger.max_trip_limit)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with CARPOOL__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("CARPOOL").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8001,
            },
            database: DatabaseConfig {
                url: "sqlite://carpool.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                admin_password: "admin123".to_string(),
                session_duration_hours: 24,
                secure_cookies: false,
            },
            ledger: LedgerConfig::default(),
        }
    }
}
