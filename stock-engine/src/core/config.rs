/// Engine configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | tracing max level |
/// | LOG_DIR | (none) | daily-rolling log file directory |
/// | PLATFORM_FEE_RATE | 0.10 | marketplace commission rate |
#[derive(Debug, Clone)]
pub struct Config {
    /// Running environment: development | staging | production
    pub environment: String,
    /// tracing max level
    pub log_level: String,
    /// Optional log file directory
    pub log_dir: Option<String>,
    /// Commission taken on cross-production sales
    pub platform_fee_rate: f64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults when unset
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            platform_fee_rate: std::env::var("PLATFORM_FEE_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::pricing::PLATFORM_FEE_RATE),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
