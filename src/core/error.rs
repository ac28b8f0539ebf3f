use crate::config::ConfigError;
use crate::core::health::Provider;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// HTTP transport failures (no response was received)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// Health check errors
///
/// `Configuration` and `Authentication` are always fatal. `Network` is fatal
/// during registration; during a provider check it only fails that
/// provider's result, as do `MissingApiKey` and `Provider`.
#[derive(Debug, thiserror::Error)]
pub enum HealthCheckError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("Registration failed: {}", describe_rejection(.status, .message))]
    Authentication {
        /// HTTP status, None when the failure was not status-driven
        status: Option<u16>,
        message: String,
    },
    #[error("Network error: {0}")]
    Network(#[from] TransportError),
    #[error("{} API key not configured", .provider.display_name())]
    MissingApiKey { provider: Provider },
    #[error("{provider} check failed: {message}")]
    Provider { provider: Provider, message: String },
    #[error("Failed to set up HTTP client: {0}")]
    ClientSetup(TransportError),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl HealthCheckError {
    /// Every error that reaches the top of a run is fatal
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }

    /// Errors that stop the run before the health-check phase
    pub fn is_registration_failure(&self) -> bool {
        matches!(
            self,
            HealthCheckError::Authentication { .. } | HealthCheckError::Network(_)
        )
    }
}

fn describe_rejection(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("{} - {}", code, message),
        None => message.to_string(),
    }
}
