use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::inventory::ValidationPolicy;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub inventory: InventoryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            inventory: InventoryConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Scoring policy, catalog source, and result store.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub policy: ValidationPolicy,
    pub catalog_path: Option<PathBuf>,
    pub store: StoreConfig,
}

impl InventoryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let policy = parse_policy(
            &env::var("INVENTORY_POLICY").unwrap_or_else(|_| "permutation".to_string()),
        )?;
        let catalog_path = non_empty_var("INVENTORY_CATALOG_PATH").map(PathBuf::from);

        let max_attempts = env::var("INVENTORY_STORE_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u32>()
            .ok()
            .filter(|attempts| *attempts > 0)
            .ok_or(ConfigError::InvalidAttempts)?;

        let backend = match env::var("INVENTORY_STORE")
            .unwrap_or_else(|_| "memory".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "csv" => StoreBackend::Csv {
                path: non_empty_var("INVENTORY_CSV_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("inventory-results.csv")),
            },
            "google_sheets" | "sheets" => StoreBackend::GoogleSheets(SheetsConfig {
                spreadsheet_id: non_empty_var("INVENTORY_SHEET_ID")
                    .ok_or(ConfigError::MissingSetting("INVENTORY_SHEET_ID"))?,
                range: non_empty_var("INVENTORY_SHEET_RANGE")
                    .unwrap_or_else(|| "Sheet1".to_string()),
                credentials_path: non_empty_var("GOOGLE_APPLICATION_CREDENTIALS")
                    .map(PathBuf::from)
                    .ok_or(ConfigError::MissingSetting("GOOGLE_APPLICATION_CREDENTIALS"))?,
            }),
            other => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        Ok(Self {
            policy,
            catalog_path,
            store: StoreConfig {
                backend,
                max_attempts,
            },
        })
    }
}

fn parse_policy(value: &str) -> Result<ValidationPolicy, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::UnknownPolicy(value.trim().to_string()))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Csv { path: PathBuf },
    GoogleSheets(SheetsConfig),
}

/// Spreadsheet target and service-account key location. Both stay out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub range: String,
    pub credentials_path: PathBuf,
}

impl fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &"<redacted>")
            .field("range", &self.range)
            .field("credentials_path", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownPolicy(String),
    UnknownStore(String),
    MissingSetting(&'static str),
    InvalidAttempts,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::UnknownPolicy(value) => write!(
                f,
                "INVENTORY_POLICY '{value}' must be 'free_scale' or 'permutation'"
            ),
            ConfigError::UnknownStore(value) => write!(
                f,
                "INVENTORY_STORE '{value}' must be 'memory', 'csv', or 'google_sheets'"
            ),
            ConfigError::MissingSetting(key) => {
                write!(f, "{key} is required for the google_sheets store")
            }
            ConfigError::InvalidAttempts => {
                write!(f, "INVENTORY_STORE_ATTEMPTS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
