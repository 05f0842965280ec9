/// Server configuration
///
/// # Environment variables
///
/// Every field can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 5000 | HTTP service port |
/// | ENVIRONMENT | development | Runtime environment |
/// | AVG_SERVICE_MINUTES | 2 | Default minutes to serve one booking |
/// | FORECAST_SERVICE_URL | (unset) | Base URL of the demand-forecast service |
/// | LOG_DIR | (unset) | Directory for daily-rolling log files |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 AVG_SERVICE_MINUTES=3 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API service port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Global default for wait-time estimation, overridable per slot
    pub avg_service_minutes: u32,
    /// Base URL of the external forecasting service, if any
    pub forecast_service_url: Option<String>,
    /// Optional log file directory
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            avg_service_minutes: std::env::var("AVG_SERVICE_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2),
            forecast_service_url: std::env::var("FORECAST_SERVICE_URL").ok(),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override selected fields, mostly for tests
    pub fn with_overrides(http_port: u16, avg_service_minutes: u32) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.avg_service_minutes = avg_service_minutes;
        config
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this is a development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
