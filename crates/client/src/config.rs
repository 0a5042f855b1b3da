use std::time::Duration;

use crate::error::ClientError;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::RoutemixClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the `/api/v1` prefix, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default                        |
    /// |-------------------------|--------------------------------|
    /// | `ROUTEMIX_API_URL`      | `http://localhost:3000/api/v1` |
    /// | `ROUTEMIX_TOKEN`        | none                           |
    /// | `ROUTEMIX_TIMEOUT_SECS` | `30`                           |
    pub fn from_env() -> Result<Self, ClientError> {
        let api_url =
            std::env::var("ROUTEMIX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = match std::env::var("ROUTEMIX_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let mut config = Self::new(api_url).with_timeout(Duration::from_secs(timeout_secs));
        config.token = std::env::var("ROUTEMIX_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Ok(config)
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ClientError> {
    raw.trim().parse().map_err(|_| {
        ClientError::Config(format!(
            "ROUTEMIX_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
        ))
    })
}
