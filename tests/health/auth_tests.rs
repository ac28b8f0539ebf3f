use crate::common::{MockProxyClient, BASE_URL, REGISTER_URL};
use llm_proxy_health::core::debug_logger::EnhancedDebugLogger;
use llm_proxy_health::core::health::Authenticator;
use llm_proxy_health::core::{HealthCheckError, TransportError};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_register_returns_token() {
    let client = MockProxyClient::with_token("tok-abc123");
    let logger = EnhancedDebugLogger::disabled();
    let authenticator = Authenticator::new(&client, BASE_URL, TIMEOUT, &logger);

    let token = authenticator.register("alice", "1234").await.unwrap();
    assert_eq!(token.as_str(), "tok-abc123");
    assert_eq!(token.bearer(), "Bearer tok-abc123");
}

#[tokio::test]
async fn test_register_sends_credentials_as_json() {
    let client = MockProxyClient::with_token("tok-abc123");
    let logger = EnhancedDebugLogger::disabled();
    let authenticator = Authenticator::new(&client, BASE_URL, TIMEOUT, &logger);

    authenticator.register("alice", "1234").await.unwrap();

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, REGISTER_URL);
    assert_eq!(request.timeout, TIMEOUT);
    assert_eq!(request.header_value("content-type"), Some("application/json"));
    assert_eq!(request.header_value("Authorization"), None);

    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body, serde_json::json!({"username": "alice", "pin": "1234"}));
}

#[tokio::test]
async fn test_register_rejected_with_status() {
    let mut client = MockProxyClient::new();
    client.add_response(REGISTER_URL, 401, r#"{"detail": "Invalid PIN"}"#);
    let logger = EnhancedDebugLogger::disabled();
    let authenticator = Authenticator::new(&client, BASE_URL, TIMEOUT, &logger);

    let err = authenticator.register("alice", "0000").await.unwrap_err();
    match &err {
        HealthCheckError::Authentication { status, message } => {
            assert_eq!(*status, Some(401));
            assert_eq!(message, "Invalid PIN");
        }
        other => panic!("expected Authentication error, got {:?}", other),
    }
    assert_eq!(err.to_string(), "Registration failed: 401 - Invalid PIN");
    assert!(err.is_registration_failure());
}

#[tokio::test]
async fn test_register_rejected_with_plain_text_body() {
    let mut client = MockProxyClient::new();
    client.add_response(REGISTER_URL, 503, "Service Unavailable");
    let logger = EnhancedDebugLogger::disabled();
    let authenticator = Authenticator::new(&client, BASE_URL, TIMEOUT, &logger);

    let err = authenticator.register("alice", "1234").await.unwrap_err();
    assert_eq!(err.to_string(), "Registration failed: 503 - Service Unavailable");
}

#[tokio::test]
async fn test_register_success_without_token() {
    let mut client = MockProxyClient::new();
    client.add_response(REGISTER_URL, 200, r#"{"username": "alice"}"#);
    let logger = EnhancedDebugLogger::disabled();
    let authenticator = Authenticator::new(&client, BASE_URL, TIMEOUT, &logger);

    let err = authenticator.register("alice", "1234").await.unwrap_err();
    assert!(matches!(
        err,
        HealthCheckError::Authentication { status: None, ref message } if message == "No token received"
    ));
}

#[tokio::test]
async fn test_register_empty_token_is_rejected() {
    let mut client = MockProxyClient::new();
    client.add_response(REGISTER_URL, 200, r#"{"token": "   "}"#);
    let logger = EnhancedDebugLogger::disabled();
    let authenticator = Authenticator::new(&client, BASE_URL, TIMEOUT, &logger);

    let result = authenticator.register("alice", "1234").await;
    assert!(matches!(result, Err(HealthCheckError::Authentication { .. })));
}

#[tokio::test]
async fn test_register_network_failure() {
    let mut client = MockProxyClient::new();
    client.add_error(
        REGISTER_URL,
        TransportError::Connect("connection refused".to_string()),
    );
    let logger = EnhancedDebugLogger::disabled();
    let authenticator = Authenticator::new(&client, BASE_URL, TIMEOUT, &logger);

    let err = authenticator.register("alice", "1234").await.unwrap_err();
    assert!(matches!(err, HealthCheckError::Network(TransportError::Connect(_))));
    assert!(err.is_registration_failure());
    assert_eq!(err.to_string(), "Network error: connection failed: connection refused");
}

#[tokio::test]
async fn test_register_timeout() {
    let mut client = MockProxyClient::new();
    client.add_error(REGISTER_URL, TransportError::Timeout(TIMEOUT));
    let logger = EnhancedDebugLogger::disabled();
    let authenticator = Authenticator::new(&client, BASE_URL, TIMEOUT, &logger);

    let err = authenticator.register("alice", "1234").await.unwrap_err();
    assert_eq!(err.to_string(), "Network error: request timed out after 5s");
}
