//! Provider Health Check Logic
//!
//! One request per provider, classified into PASS/FAIL:
//! - Routes that need a user API key fail up front (`FailureKind::MissingApiKey`)
//! - Transport failures become `FailureKind::Network`
//! - Non-2xx responses and 2xx bodies reporting an error become `FailureKind::Provider`
//!
//! Nothing here aborts the run; every call yields exactly one result.

use serde_json::json;
use std::time::Instant;

use crate::config::Config;
use crate::core::debug_logger::EnhancedDebugLogger;
use crate::core::error::HealthCheckError;
use crate::core::health::client::{ProxyClient, ProxyRequest, ProxyResponse};
use crate::core::health::parsing::{body_indicates_success, extract_error_message, parse_json_body};
use crate::core::health::types::{
    CheckOutcome, FailureKind, HealthCheckResult, Provider, SessionToken,
};
use crate::core::health::url::build_provider_url;

const PROBE_PROMPT: &str = "Say 'Health check successful' and nothing else.";
const PROBE_MAX_TOKENS: u32 = 10;

pub struct HealthChecker<'a> {
    client: &'a dyn ProxyClient,
    config: &'a Config,
    logger: &'a EnhancedDebugLogger,
}

impl<'a> HealthChecker<'a> {
    pub fn new(
        client: &'a dyn ProxyClient,
        config: &'a Config,
        logger: &'a EnhancedDebugLogger,
    ) -> Self {
        Self {
            client,
            config,
            logger,
        }
    }

    /// Check one provider route with the session token
    pub async fn check_provider(&self, provider: Provider, token: &SessionToken) -> HealthCheckResult {
        let correlation_id = format!("{}-{}", self.logger.get_session_id(), provider.as_str());
        self.logger.check_start(
            provider.as_str(),
            self.config.timeout.as_millis() as u64,
            correlation_id.clone(),
        );

        let start = Instant::now();
        let attempt = self.send_probe(provider, token).await;
        let response_time_ms = start.elapsed().as_millis() as u64;

        let result = match attempt {
            Ok(response) => self.classify_response(provider, response, response_time_ms),
            Err(error) => failed_result(provider, &error, response_time_ms),
        };

        self.logger.check_end(
            provider.as_str(),
            &result.outcome.to_string(),
            result.status_code,
            response_time_ms,
            correlation_id,
        );
        result
    }

    async fn send_probe(
        &self,
        provider: Provider,
        token: &SessionToken,
    ) -> Result<ProxyResponse, HealthCheckError> {
        let request = self.build_probe_request(provider, token)?;
        Ok(self.client.post_json(request).await?)
    }

    /// Chat request for the provider route, with user keys attached where needed
    pub fn build_probe_request(
        &self,
        provider: Provider,
        token: &SessionToken,
    ) -> Result<ProxyRequest, HealthCheckError> {
        let payload = json!({
            "model": provider.probe_model(),
            "messages": [
                {"role": "user", "content": PROBE_PROMPT}
            ],
            "max_tokens": PROBE_MAX_TOKENS,
            "stream": false
        });

        let mut request = ProxyRequest::json(
            build_provider_url(&self.config.proxy_base_url, provider),
            &payload,
            self.config.timeout,
        )
        .map_err(|e| HealthCheckError::Provider {
            provider,
            message: format!("failed to encode request: {}", e),
        })?
        .header("Authorization", &token.bearer());

        if let Some(header) = provider.api_key_header() {
            let key = self
                .config
                .api_keys
                .for_provider(provider)
                .ok_or(HealthCheckError::MissingApiKey { provider })?;
            request = request.header(header, key);
        }

        if provider == Provider::Openai {
            if let Some(org) = self.config.api_keys.openai_org.as_deref() {
                request = request.header("X-User-OpenAI-Org", org);
            }
        }

        Ok(request)
    }

    fn classify_response(
        &self,
        provider: Provider,
        response: ProxyResponse,
        response_time_ms: u64,
    ) -> HealthCheckResult {
        let passed = response.is_success() && body_indicates_success(&response.body);
        let response_data = if self.config.verbose {
            parse_json_body(&response.body)
        } else {
            None
        };

        if passed {
            HealthCheckResult {
                provider,
                outcome: CheckOutcome::Pass,
                response_time_ms,
                status_code: Some(response.status_code),
                error: None,
                failure: None,
                response_data,
            }
        } else {
            HealthCheckResult {
                provider,
                outcome: CheckOutcome::Fail,
                response_time_ms,
                status_code: Some(response.status_code),
                error: Some(extract_error_message(&response.body)),
                failure: Some(FailureKind::Provider),
                response_data,
            }
        }
    }
}

/// Result for a check that never got a usable response
fn failed_result(provider: Provider, error: &HealthCheckError, response_time_ms: u64) -> HealthCheckResult {
    let (failure, message) = match error {
        HealthCheckError::Network(e) => (FailureKind::Network, e.to_string()),
        HealthCheckError::MissingApiKey { .. } => (FailureKind::MissingApiKey, error.to_string()),
        HealthCheckError::Provider { message, .. } => (FailureKind::Provider, message.clone()),
        other => (FailureKind::Provider, other.to_string()),
    };

    HealthCheckResult {
        provider,
        outcome: CheckOutcome::Fail,
        response_time_ms,
        status_code: None,
        error: Some(message),
        failure: Some(failure),
        response_data: None,
    }
}
