//! API endpoint configuration.

use std::time::Duration;

use clap::Args;

/// Connection settings for the marketplace API.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the marketplace API
    #[arg(long = "api-url", env = "MARKET_API_URL", default_value = "http://localhost:4000")]
    pub base_url: String,

    /// Request timeout in seconds, applied to every outbound call
    #[arg(long, env = "MARKET_API_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Point at the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            timeout_secs: 30,
        }
    }
}
