use crate::core::health::Provider;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration loading failures. All of them abort the run before any
/// request is sent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Username is required. Provide --username or set DEFAULT_USERNAME in .env file.")]
    MissingUsername,
    #[error("PIN is required. Provide --pin or set DEFAULT_PIN in .env file.")]
    MissingPin,
    #[error("Invalid PROXY_TIMEOUT '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error("Invalid PROXY_BASE_URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Failed to parse env file: {0}")]
    EnvParse(String),
    #[error("Failed to read env file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Username + PIN pair sent to the registration endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub pin: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("pin", &"[REDACTED]")
            .finish()
    }
}

/// Provider API keys forwarded to the proxy as-is
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    pub openai: Option<String>,
    pub openai_org: Option<String>,
    pub anthropic: Option<String>,
}

impl ApiKeys {
    /// Key the given provider route expects, if the route needs one at all
    pub fn for_provider(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Opensource => None,
            Provider::Openai => self.openai.as_deref(),
            Provider::Anthropic => self.anthropic.as_deref(),
        }
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|k| format!("[{} chars]", k.len()));
        f.debug_struct("ApiKeys")
            .field("openai", &mask(&self.openai))
            .field("openai_org", &self.openai_org)
            .field("anthropic", &mask(&self.anthropic))
            .finish()
    }
}

/// What the run does once a token has been obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Register, then check every selected provider
    FullCheck { show_token: bool },
    /// Register and print the token; no provider checks
    TokenOnly,
}

impl RunMode {
    pub fn shows_token(&self) -> bool {
        match self {
            RunMode::FullCheck { show_token } => *show_token,
            RunMode::TokenOnly => true,
        }
    }
}

/// Fully resolved configuration, immutable for the rest of the process
#[derive(Debug, Clone)]
pub struct Config {
    /// Normalized proxy base URL (no trailing slash)
    pub proxy_base_url: String,
    pub timeout: Duration,
    pub credentials: Credentials,
    pub api_keys: ApiKeys,
    /// Providers to check, deduplicated, in command-line order
    pub providers: Vec<Provider>,
    pub verbose: bool,
    pub mode: RunMode,
    pub color: bool,
}
