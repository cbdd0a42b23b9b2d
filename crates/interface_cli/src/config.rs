//! Dashboard configuration

use std::time::Duration;

use serde::Deserialize;

use core_kernel::{CoreError, ExternalSystemConfig};
use domain_tasks::SelectionMode;

/// Environment variable prefix, e.g. `DASHBOARD_BACKEND_URL`
pub const ENV_PREFIX: &str = "DASHBOARD";

/// Where task data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The REST backend at `backend_url`
    Http,
    /// Built-in demo data
    #[default]
    Fixture,
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the clinical backend
    pub backend_url: String,
    /// Backend implementation to use
    pub data_source: DataSource,
    /// Whether selecting a task generates its content
    pub selection_mode: SelectionMode,
    /// Per-request timeout; unset leaves timing to the transport
    pub request_timeout_secs: Option<u64>,
    /// Log level
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            data_source: DataSource::Fixture,
            selection_mode: SelectionMode::Auto,
            request_timeout_secs: None,
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from `DASHBOARD_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an environment source, filling gaps with defaults
    pub fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Checks the values that can only be validated together
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.data_source == DataSource::Http {
            let url = self.backend_url.trim();
            if url.is_empty() {
                return Err(CoreError::configuration("backend_url is required for the http data source"));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CoreError::configuration(format!(
                    "backend_url must be an http(s) URL, got {}",
                    url
                )));
            }
        }
        if self.request_timeout_secs == Some(0) {
            return Err(CoreError::configuration("request_timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Connection settings for the HTTP adapter
    pub fn http_config(&self) -> ExternalSystemConfig {
        let config = ExternalSystemConfig::new(self.backend_url.trim());
        match self.request_timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}
