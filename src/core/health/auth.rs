//! User registration against the proxy
//!
//! One `POST {base}/auth/register` per run, never retried. Any non-2xx answer
//! is a rejection; whether re-registering an existing user succeeds is up to
//! the server.

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::core::debug_logger::EnhancedDebugLogger;
use crate::core::error::HealthCheckError;
use crate::core::health::client::{ProxyClient, ProxyRequest};
use crate::core::health::parsing::{extract_error_message, extract_token};
use crate::core::health::types::SessionToken;
use crate::core::health::url::build_register_url;

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    pin: &'a str,
}

/// Obtains the session token used by every provider check
pub struct Authenticator<'a> {
    client: &'a dyn ProxyClient,
    base_url: &'a str,
    timeout: Duration,
    logger: &'a EnhancedDebugLogger,
}

impl<'a> Authenticator<'a> {
    pub fn new(
        client: &'a dyn ProxyClient,
        base_url: &'a str,
        timeout: Duration,
        logger: &'a EnhancedDebugLogger,
    ) -> Self {
        Self {
            client,
            base_url,
            timeout,
            logger,
        }
    }

    /// Register `username`/`pin` and return the issued token
    ///
    /// # Errors
    /// * `HealthCheckError::Network` - no response (timeout, refused connection)
    /// * `HealthCheckError::Authentication` - non-2xx status, or 2xx without a token
    pub async fn register(&self, username: &str, pin: &str) -> Result<SessionToken, HealthCheckError> {
        let request = ProxyRequest::json(
            build_register_url(self.base_url),
            &RegisterRequest { username, pin },
            self.timeout,
        )
        .map_err(|e| HealthCheckError::Authentication {
            status: None,
            message: format!("failed to encode registration request: {}", e),
        })?;

        self.logger.registration_start(username);
        let start = Instant::now();

        let response = match self.client.post_json(request).await {
            Ok(response) => response,
            Err(e) => {
                self.logger
                    .error_sync("Authenticator", "register_transport_error", &e.to_string());
                self.logger
                    .registration_end("network_error", None, elapsed_ms(start));
                return Err(HealthCheckError::Network(e));
            }
        };

        if !response.is_success() {
            self.logger
                .registration_end("rejected", Some(response.status_code), elapsed_ms(start));
            return Err(HealthCheckError::Authentication {
                status: Some(response.status_code),
                message: extract_error_message(&response.body),
            });
        }

        match extract_token(&response.body).and_then(SessionToken::new) {
            Some(token) => {
                self.logger
                    .registration_end("ok", Some(response.status_code), elapsed_ms(start));
                Ok(token)
            }
            None => {
                self.logger
                    .registration_end("no_token", Some(response.status_code), elapsed_ms(start));
                Err(HealthCheckError::Authentication {
                    status: None,
                    message: "No token received".to_string(),
                })
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
