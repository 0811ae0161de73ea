use reqwest::Url;
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Distinguishes runtime behavior for different stages of the client.
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
    pub client: ClientConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("LOAN_SERVICE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_SERVICE_BASE_URL.to_string());
        let timeout_ms = env::var("LOAN_HTTP_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            client: ClientConfig::new(&base_url)?.with_timeout(Duration::from_millis(timeout_ms))?,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where and how the contract client reaches the scoring service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    service_base_url: Url,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(service_base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = service_base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
            value: service_base_url.to_string(),
            reason: err.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }

        Ok(Self {
            service_base_url: url,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn service_base_url(&self) -> &Url {
        &self.service_base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL of an API route, e.g. `endpoint("predict")` -> `{base}/api/predict`.
    pub fn endpoint(&self, route: &str) -> String {
        let base = self.service_base_url.as_str().trim_end_matches('/');
        format!("{base}/api/{}", route.trim_start_matches('/'))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl {
        value: String,
        reason: String,
    },
    UnsupportedScheme(String),
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl { value, reason } => {
                write!(f, "LOAN_SERVICE_BASE_URL '{value}' is not a valid URL ({reason})")
            }
            ConfigError::UnsupportedScheme(scheme) => {
                write!(f, "LOAN_SERVICE_BASE_URL must use http or https, got '{scheme}'")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "LOAN_HTTP_TIMEOUT_MS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
