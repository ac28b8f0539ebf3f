//! Proxy Health Checking
//!
//! Registration against the proxy and per-provider health checks:
//! - `client`: HTTP transport abstraction (isahc in production, mocks in tests)
//! - `auth`: one-shot user registration that yields the session token
//! - `checker`: one request per provider, classified into PASS/FAIL
//! - `parsing`: response body interpretation (success discrimination, error messages)
//! - `url`: base URL validation and endpoint construction

pub mod auth;
pub mod checker;
pub mod client;
pub mod parsing;
pub mod types;
pub mod url;

// Re-export public API
pub use auth::Authenticator;
pub use checker::HealthChecker;
pub use client::{IsahcProxyClient, ProxyClient, ProxyRequest, ProxyResponse};
pub use types::{CheckOutcome, FailureKind, HealthCheckResult, HealthReport, Provider, SessionToken};
