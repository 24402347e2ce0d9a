use crate::generator::{history_start, GenerationParams};
use chrono::NaiveDate;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

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
    pub generation: GenerationDefaults,
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
            generation: GenerationDefaults::from_env()?,
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

/// Generation parameters used when a caller does not supply their own.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationDefaults {
    pub n_employees: usize,
    pub years_of_history: u32,
    pub seed: Option<u64>,
    pub include_attrition: bool,
    pub attrition_rate: f64,
    pub noise_std: f64,
    pub include_hiring: bool,
    pub growth_rate: f64,
    pub backfill_rate: f64,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            n_employees: 100,
            years_of_history: 5,
            seed: None,
            include_attrition: true,
            attrition_rate: 0.12,
            noise_std: 0.2,
            include_hiring: false,
            growth_rate: 0.05,
            backfill_rate: 0.85,
        }
    }
}

impl GenerationDefaults {
    fn from_env() -> Result<Self, ConfigError> {
        let fallback = Self::default();
        Ok(Self {
            n_employees: parse_var("HR_EMPLOYEES", fallback.n_employees)?,
            years_of_history: parse_var("HR_YEARS_OF_HISTORY", fallback.years_of_history)?,
            seed: match env::var("HR_SEED") {
                Ok(value) if !value.trim().is_empty() => Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::invalid("HR_SEED", &value))?,
                ),
                _ => None,
            },
            include_attrition: parse_flag("HR_ATTRITION", fallback.include_attrition)?,
            attrition_rate: parse_var("HR_ATTRITION_RATE", fallback.attrition_rate)?,
            noise_std: parse_var("HR_NOISE_STD", fallback.noise_std)?,
            include_hiring: parse_flag("HR_HIRING", fallback.include_hiring)?,
            growth_rate: parse_var("HR_GROWTH_RATE", fallback.growth_rate)?,
            backfill_rate: parse_var("HR_BACKFILL_RATE", fallback.backfill_rate)?,
        })
    }

    /// Parameters for a history window ending on `today`.
    pub fn params(&self, today: NaiveDate) -> GenerationParams {
        GenerationParams {
            n_employees: self.n_employees,
            seed: self.seed,
            include_attrition: self.include_attrition,
            attrition_rate: self.attrition_rate,
            noise_std: self.noise_std,
            start_date: history_start(today, self.years_of_history),
            end_date: today,
            include_hiring: self.include_hiring,
            growth_rate: self.growth_rate,
            backfill_rate: self.backfill_rate,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid(name, &value)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::invalid(name, &value)),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { name: &'static str, value: String },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str) -> Self {
        ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { name, value } => {
                write!(f, "{name} has an unusable value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
