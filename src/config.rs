use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_BASE: &str = "https://api.figma.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Process configuration, loaded once at startup and shared read-only.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Figma personal access token forwarded on every upstream call.
    pub figma_token: String,
    /// Address the HTTP server binds to.
    pub bind_host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Base URL of the Figma REST API.
    pub figma_api_base: String,
    /// Upper bound for a single upstream request, in seconds.
    pub figma_timeout_secs: u64,
}

impl AppConfig {
    /// Build the config from process environment variables.
    ///
    /// Required env vars:
    /// - `FIGMA_TOKEN`
    ///
    /// Optional: `BIND_HOST`, `PORT`, `FIGMA_API_BASE`, `FIGMA_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_environment(Environment::default())
    }

    /// Build the config from an explicit environment source.
    pub fn from_environment(environment: Environment) -> Result<Self, AppError> {
        let settings = Config::builder()
            .set_default("bind_host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("figma_api_base", DEFAULT_API_BASE)?
            .set_default("figma_timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .add_source(environment.try_parsing(true))
            .build()?;

        if settings.get_string("figma_token").is_err() {
            return Err(AppError::Config("FIGMA_TOKEN not set".into()));
        }

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Build with explicit values and defaults elsewhere (useful for testing).
    pub fn new(figma_token: impl Into<String>) -> Self {
        Self {
            figma_token: figma_token.into(),
            bind_host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            figma_api_base: DEFAULT_API_BASE.to_string(),
            figma_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.figma_token.trim().is_empty() {
            return Err(AppError::Config("FIGMA_TOKEN is empty".into()));
        }
        if self.figma_timeout_secs == 0 {
            return Err(AppError::Config("FIGMA_TIMEOUT_SECS must be positive".into()));
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.figma_timeout_secs)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.bind_host, self.port).parse().map_err(|e| {
            AppError::Config(format!(
                "Invalid bind address '{}:{}': {e}",
                self.bind_host, self.port
            ))
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("figma_token", &"<redacted>")
            .field("bind_host", &self.bind_host)
            .field("port", &self.port)
            .field("figma_api_base", &self.figma_api_base)
            .field("figma_timeout_secs", &self.figma_timeout_secs)
            .finish()
    }
}
