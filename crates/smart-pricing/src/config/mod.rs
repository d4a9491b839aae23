use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_NARRATIVE_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_NARRATIVE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

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
    pub pricing: PricingConfig,
    pub narrative: NarrativeConfig,
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

        let base_price = env::var("PRICING_BASE_PRICE")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price > 0.0)
            .ok_or(ConfigError::InvalidBasePrice)?;
        let tick_ms = env::var("PRICING_TICK_MS")
            .unwrap_or_else(|_| "150".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTick)?;

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_NARRATIVE_MODEL.to_string());
        let endpoint =
            env::var("GEMINI_ENDPOINT").unwrap_or_else(|_| DEFAULT_NARRATIVE_ENDPOINT.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pricing: PricingConfig {
                base_price,
                tick: Duration::from_millis(tick_ms),
            },
            narrative: NarrativeConfig {
                api_key,
                model,
                endpoint,
            },
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Revenue and pacing knobs for batch simulations.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    pub base_price: f64,
    pub tick: Duration,
}

/// Generative-language backend used for optional narratives.
#[derive(Clone)]
pub struct NarrativeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl fmt::Debug for NarrativeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrativeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBasePrice,
    InvalidTick,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBasePrice => {
                write!(f, "PRICING_BASE_PRICE must be a positive number")
            }
            ConfigError::InvalidTick => {
                write!(f, "PRICING_TICK_MS must be a whole number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBasePrice
            | ConfigError::InvalidTick => None,
        }
    }
}
