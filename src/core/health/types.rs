// Core types for provider health checks
use serde::{Deserialize, Serialize};

/// Backend provider routes exposed by the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Opensource,
    Openai,
    Anthropic,
}

impl Provider {
    /// Check order when no provider is selected explicitly
    pub const ALL: [Provider; 3] = [Provider::Opensource, Provider::Openai, Provider::Anthropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Opensource => "opensource",
            Provider::Openai => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Opensource => "Opensource",
            Provider::Openai => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }

    /// Route path under the proxy base URL
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Provider::Opensource => "/opensource/v1/chat/completions",
            Provider::Openai => "/openai/v1/chat/completions",
            Provider::Anthropic => "/anthropic/v1/messages",
        }
    }

    /// Cheapest model on each route
    pub fn probe_model(&self) -> &'static str {
        match self {
            Provider::Opensource => "openai--gpt-oss-120b",
            Provider::Openai => "gpt-3.5-turbo",
            Provider::Anthropic => "claude-3-haiku-20240307",
        }
    }

    /// Header carrying the user's own provider key, for routes that need one
    pub fn api_key_header(&self) -> Option<&'static str> {
        match self {
            Provider::Opensource => None,
            Provider::Openai => Some("X-User-OpenAI-Key"),
            Provider::Anthropic => Some("X-User-Anthropic-Key"),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque bearer credential issued by the registration endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// None for an empty or whitespace-only token
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken([{} chars])", self.0.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    Pass,
    Fail,
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Pass => f.write_str("PASS"),
            CheckOutcome::Fail => f.write_str("FAIL"),
        }
    }
}

/// Why a check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The route needs a user API key and none is configured; nothing was sent
    MissingApiKey,
    /// The proxy or provider answered with an error
    Provider,
    /// No response: timeout, refused connection, DNS failure
    Network,
}

/// Outcome of one provider check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub provider: Provider,
    pub outcome: CheckOutcome,
    /// Wall-clock time around the request
    pub response_time_ms: u64,
    /// HTTP status, when a response was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Parsed response body, kept in verbose mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<serde_json::Value>,
}

impl HealthCheckResult {
    pub fn passed(&self) -> bool {
        self.outcome == CheckOutcome::Pass
    }

    pub fn response_time_secs(&self) -> f64 {
        self.response_time_ms as f64 / 1000.0
    }
}

/// All results of one run, in check order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub results: Vec<HealthCheckResult>,
}

impl HealthReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}
