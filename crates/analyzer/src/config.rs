use std::time::Duration;

pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_TIMEOUT_SECS: &str = "AZURE_OPENAI_TIMEOUT_SECS";
pub const ENV_MAX_TOKENS: &str = "AZURE_OPENAI_MAX_TOKENS";
pub const ENV_MAX_RETRIES: &str = "AZURE_OPENAI_MAX_RETRIES";

pub const DEFAULT_API_VERSION: &str = "2024-12-01-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Problems with analyzer settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("{0} is not set")]
    MissingVar(&'static str),

    /// A setting is present but cannot be used.
    #[error("{name} has invalid value '{value}': {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the Azure OpenAI chat-completions client.
///
/// Built once at startup (usually via [`AzureOpenAiConfig::from_env`]) and
/// handed to [`AzureOpenAiClient::new`](crate::AzureOpenAiClient::new). The
/// client never reads the environment itself.
#[derive(Clone)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    /// Deployment name the requests are routed to.
    pub deployment: String,
    /// Value of the `api-key` header.
    pub api_key: String,
    /// `api-version` query parameter.
    pub api_version: String,
    /// Upper bound on a single provider call, connect to last byte.
    pub request_timeout: Duration,
    /// `max_completion_tokens` sent with each request.
    pub max_output_tokens: u32,
    /// Retries on transient failures. `0` disables the retry decorator.
    pub max_retries: u32,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for AzureOpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAiConfig")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl AzureOpenAiConfig {
    /// Build a config with default version, timeout, and token budget.
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            max_retries: 0,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Default               |
    /// |-----------------------------|-----------------------|
    /// | `AZURE_OPENAI_ENDPOINT`     | required              |
    /// | `AZURE_OPENAI_DEPLOYMENT`   | required              |
    /// | `AZURE_OPENAI_API_KEY`      | required              |
    /// | `AZURE_OPENAI_API_VERSION`  | `2024-12-01-preview`  |
    /// | `AZURE_OPENAI_TIMEOUT_SECS` | `30`                  |
    /// | `AZURE_OPENAI_MAX_TOKENS`   | `1024`                |
    /// | `AZURE_OPENAI_MAX_RETRIES`  | `0`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));

        let endpoint = require(ENV_ENDPOINT)?;
        let deployment = require(ENV_DEPLOYMENT)?;
        let api_key = require(ENV_API_KEY)?;
        let api_version = get(ENV_API_VERSION).unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let timeout_secs: u64 = parse_or(get(ENV_TIMEOUT_SECS), ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidVar {
                name: ENV_TIMEOUT_SECS,
                value: "0".into(),
                reason: "timeout must be at least one second".into(),
            });
        }

        let max_output_tokens = parse_or(get(ENV_MAX_TOKENS), ENV_MAX_TOKENS, DEFAULT_MAX_OUTPUT_TOKENS)?;
        let max_retries = parse_or(get(ENV_MAX_RETRIES), ENV_MAX_RETRIES, 0)?;

        Ok(Self {
            endpoint,
            deployment,
            api_key,
            api_version,
            request_timeout: Duration::from_secs(timeout_secs),
            max_output_tokens,
            max_retries,
        })
    }

    /// Check that the required settings are present.
    ///
    /// Called by the client constructor so a hand-built config with blank
    /// values fails before any request is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingVar(ENV_ENDPOINT));
        }
        if self.deployment.trim().is_empty() {
            return Err(ConfigError::MissingVar(ENV_DEPLOYMENT));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar(ENV_API_KEY));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidVar {
                name: ENV_TIMEOUT_SECS,
                value: "0".into(),
                reason: "timeout must be non-zero".into(),
            });
        }
        Ok(())
    }

    /// Full chat-completions URL for this deployment.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
