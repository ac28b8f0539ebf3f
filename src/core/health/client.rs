//! Proxy Client Implementations
//!
//! HTTP transport used for registration and provider checks: JSON POST,
//! bearer auth headers, response body access, and no redirect following.

use crate::core::error::TransportError;
use serde::Serialize;
use std::time::Duration;

use isahc::config::{Configurable, RedirectPolicy};
use isahc::error::ErrorKind;
use isahc::{AsyncReadResponseExt, HttpClient, Request};

const USER_AGENT: &str = concat!("llm-proxy-health/", env!("CARGO_PKG_VERSION"));

/// Outgoing JSON POST request
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

impl ProxyRequest {
    /// JSON request with `Content-Type: application/json`
    pub fn json<T: Serialize>(
        url: String,
        payload: &T,
        timeout: Duration,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            url,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(payload)?,
            timeout,
        })
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Header value by case-insensitive name
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response data needed for success discrimination and error reporting
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl ProxyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// HTTP transport for proxy calls
///
/// # Implementation Requirements
/// * Must honour `request.timeout` for the whole exchange
/// * Must not follow redirects (a 3xx is returned as-is)
/// * Must return the complete response body
/// * Any HTTP status is `Ok`; `Err` means no response was received
#[async_trait::async_trait]
pub trait ProxyClient: Send + Sync {
    async fn post_json(&self, request: ProxyRequest) -> Result<ProxyResponse, TransportError>;
}

/// Production client implementation using isahc
pub struct IsahcProxyClient {
    client: HttpClient,
}

#[async_trait::async_trait]
impl ProxyClient for IsahcProxyClient {
    async fn post_json(&self, request: ProxyRequest) -> Result<ProxyResponse, TransportError> {
        let timeout = request.timeout;

        let mut builder = Request::post(&request.url)
            .timeout(timeout)
            .redirect_policy(RedirectPolicy::None)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let http_request = builder
            .body(request.body)
            .map_err(|e| TransportError::Request(format!("request creation failed: {}", e)))?;

        let mut response = self
            .client
            .send_async(http_request)
            .await
            .map_err(|e| classify_transport_error(&e, timeout))?;

        let status_code = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(format!("failed to read response body: {}", e)))?
            .to_vec();

        Ok(ProxyResponse { status_code, body })
    }
}

impl IsahcProxyClient {
    pub fn new() -> Result<Self, TransportError> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::None) // Global redirect policy
            .build()
            .map_err(|e| {
                TransportError::Request(format!("failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }
}

fn classify_transport_error(error: &isahc::Error, timeout: Duration) -> TransportError {
    match error.kind() {
        ErrorKind::Timeout => TransportError::Timeout(timeout),
        ErrorKind::ConnectionFailed | ErrorKind::NameResolution => {
            TransportError::Connect(error.to_string())
        }
        _ => TransportError::Request(error.to_string()),
    }
}
