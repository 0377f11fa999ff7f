use crate::crisis::{Strategy, DEFAULT_NEIGHBOURS};
use crate::indicators::LevelType;
use crate::telemetry::LogFormat;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

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
    pub data: DataConfig,
    pub weather: WeatherConfig,
    pub scoring: ScoringSettings,
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
        let log_format = match non_empty("APP_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            data: DataConfig::from_env()?,
            weather: WeatherConfig::from_env()?,
            scoring: ScoringSettings::from_env()?,
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
    pub log_format: LogFormat,
}

/// Where indicator tables are loaded from at start-up.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub snapshot_csv: Option<PathBuf>,
    pub snapshot_level: LevelType,
}

impl DataConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let snapshot_csv = non_empty("GROUNDWATER_SNAPSHOT_CSV").map(PathBuf::from);
        let snapshot_level = match non_empty("GROUNDWATER_SNAPSHOT_LEVEL") {
            Some(raw) => LevelType::parse(&raw).ok_or(ConfigError::InvalidLevelType(raw))?,
            None => LevelType::State,
        };

        Ok(Self {
            snapshot_csv,
            snapshot_level,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherMode {
    Live,
    Seasonal,
    Disabled,
}

impl WeatherMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "live" | "openweather" => Some(Self::Live),
            "seasonal" => Some(Self::Seasonal),
            "disabled" | "off" | "none" => Some(Self::Disabled),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct WeatherConfig {
    pub mode: WeatherMode,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("mode", &self.mode)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl WeatherConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = non_empty("OPENWEATHER_API_KEY");
        let base_url = non_empty("OPENWEATHER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string());

        let mode = match non_empty("WEATHER_SOURCE") {
            Some(raw) => WeatherMode::parse(&raw).ok_or(ConfigError::InvalidWeatherMode(raw))?,
            None if api_key.is_some() => WeatherMode::Live,
            None => WeatherMode::Disabled,
        };

        if mode == WeatherMode::Live && api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            mode,
            api_key,
            base_url,
        })
    }
}

/// Engine tuning read from the environment.
#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub level_threshold_m: f64,
    pub default_strategy: Strategy,
    pub jitter: bool,
    pub jitter_seed: Option<u64>,
    pub model_neighbours: usize,
}

impl ScoringSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let level_threshold_m = match non_empty("CRISIS_LEVEL_THRESHOLD_M") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => value,
                _ => return Err(invalid_number("CRISIS_LEVEL_THRESHOLD_M", raw)),
            },
            None => 15.0,
        };

        let default_strategy = match non_empty("CRISIS_DEFAULT_STRATEGY") {
            Some(raw) => Strategy::parse(&raw).ok_or(ConfigError::InvalidStrategy(raw))?,
            None => Strategy::default(),
        };

        let jitter = match non_empty("CRISIS_JITTER") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                key: "CRISIS_JITTER",
                value: raw,
            })?,
            None => false,
        };

        let jitter_seed = match non_empty("CRISIS_JITTER_SEED") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| invalid_number("CRISIS_JITTER_SEED", raw))?,
            ),
            None => None,
        };

        let model_neighbours = match non_empty("CRISIS_MODEL_NEIGHBOURS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => return Err(invalid_number("CRISIS_MODEL_NEIGHBOURS", raw)),
            },
            None => DEFAULT_NEIGHBOURS,
        };

        Ok(Self {
            level_threshold_m,
            default_strategy,
            jitter,
            jitter_seed,
            model_neighbours,
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid_number(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidNumber { key, value }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidFlag { key: &'static str, value: String },
    InvalidStrategy(String),
    InvalidLevelType(String),
    InvalidWeatherMode(String),
    InvalidLogFormat(String),
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive number, got '{value}'")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true or false, got '{value}'")
            }
            ConfigError::InvalidStrategy(value) => write!(
                f,
                "CRISIS_DEFAULT_STRATEGY '{value}' is not one of weather_weighted, hydrological, ratio_threshold, trained_model"
            ),
            ConfigError::InvalidLevelType(value) => write!(
                f,
                "GROUNDWATER_SNAPSHOT_LEVEL '{value}' is not one of state, city, district"
            ),
            ConfigError::InvalidWeatherMode(value) => write!(
                f,
                "WEATHER_SOURCE '{value}' is not one of live, seasonal, disabled"
            ),
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT '{value}' is not one of compact, full")
            }
            ConfigError::MissingApiKey => {
                write!(f, "WEATHER_SOURCE=live requires OPENWEATHER_API_KEY")
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
