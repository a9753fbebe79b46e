use std::env;

use a2a_x402::DEFAULT_API_URL;
use url::Url;

#[derive(Clone)]
pub struct AgentConfig {
    /// Agent private key, used only to derive the agent address
    pub private_key: String,
    /// Marketplace API base URL
    pub api_url: String,
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("private_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        // Required: agent key (EVM_PRIVATE_KEY as a fallback)
        let private_key = non_empty("AGENT_PRIVATE_KEY")
            .or_else(|| non_empty("EVM_PRIVATE_KEY"))
            .ok_or(ConfigError::MissingRequired("AGENT_PRIVATE_KEY"))?;

        // Optional: API URL
        let api_url = non_empty("A2A_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&api_url).map_err(|_| ConfigError::InvalidUrl(api_url.clone()))?;

        Ok(Self {
            private_key,
            api_url,
        })
    }

    /// Replace the API URL, e.g. from a command-line flag.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        Url::parse(api_url).map_err(|_| ConfigError::InvalidUrl(api_url.to_string()))?;
        self.api_url = api_url.to_string();
        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
