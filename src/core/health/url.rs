//! URL Construction Utilities for Proxy Requests
//!
//! All endpoints hang off the configured proxy base URL:
//! - Registration: `{base}/auth/register`
//! - Provider checks: `{base}{provider route}`

use super::types::Provider;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    ParseError(#[from] url::ParseError),
    #[error("Unsupported scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
    #[error("Missing host in URL")]
    MissingHost,
}

/// Validate an absolute http(s) base URL and return it normalized
///
/// # Examples
/// - `http://proxy.local:7860/` → `http://proxy.local:7860`
/// - `https://proxy.example.com/api` → `https://proxy.example.com/api`
/// - `proxy.example.com` → `Err(ParseError)`
pub fn validate_base_url(base_url: &str) -> Result<String, UrlError> {
    let trimmed = base_url.trim();
    let url = Url::parse(trimmed)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(normalize_base_url(trimmed))
}

/// Normalize base URL by trimming trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

pub fn build_register_url(base_url: &str) -> String {
    format!("{}/auth/register", normalize_base_url(base_url))
}

pub fn build_provider_url(base_url: &str, provider: Provider) -> String {
    format!("{}{}", normalize_base_url(base_url), provider.endpoint_path())
}
