//! Centralized configuration management for ngomate

use std::time::Duration;
use anyhow::{Result, Context};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_USER_AGENT: &str = "ngomate/0.1.0";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the portal API
    pub api_url: String,
    /// Primary API key, sent as a bearer token when present
    pub api_key: Option<String>,
    /// Secondary API key, only displayed on the API configuration page
    pub secondary_api_key: Option<String>,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Dashboard refresh interval (milliseconds)
    pub tick_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            secondary_api_key: None,
            http: HttpConfig::default(),
            tick_ms: 120,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("NGOMATE_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let api_key = non_empty_env("NGOMATE_API_KEY");
        let secondary_api_key = non_empty_env("NGOMATE_SECONDARY_API_KEY");

        let http = HttpConfig {
            timeout_seconds: parse_env_var("NGOMATE_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("NGOMATE_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        };

        Ok(Config {
            api_url,
            api_key,
            secondary_api_key,
            http,
            tick_ms: parse_env_var("NGOMATE_TICK_MS")?.unwrap_or(120),
        })
    }

    /// Base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Join an API path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base(), path.trim_start_matches('/'))
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get dashboard tick interval as Duration
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = self.api_base();
        if base.is_empty() {
            return Err(anyhow::anyhow!("NGOMATE_API_URL must not be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "NGOMATE_API_URL must start with http:// or https://, got '{}'",
                base
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }
        Ok(())
    }
}

fn non_empty_env(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.trim().is_empty())
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
