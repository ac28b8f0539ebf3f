use crate::common::{
    test_config, with_all_keys, MockProxyClient, ANTHROPIC_URL, HEALTHY_COMPLETION,
    HEALTHY_MESSAGE, OPENAI_URL, OPENSOURCE_URL,
};
use llm_proxy_health::core::debug_logger::EnhancedDebugLogger;
use llm_proxy_health::core::health::{
    CheckOutcome, FailureKind, HealthChecker, Provider, SessionToken,
};
use llm_proxy_health::core::{HealthCheckError, TransportError};
use std::time::Duration;

fn token() -> SessionToken {
    SessionToken::new("tok-abc123").unwrap()
}

#[tokio::test]
async fn test_opensource_check_passes() {
    let mut client = MockProxyClient::new();
    client.add_response(OPENSOURCE_URL, 200, HEALTHY_COMPLETION);
    let config = test_config(&[Provider::Opensource]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Opensource, &token()).await;

    assert_eq!(result.provider, Provider::Opensource);
    assert_eq!(result.outcome, CheckOutcome::Pass);
    assert!(result.passed());
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.error, None);
    assert_eq!(result.failure, None);
    assert_eq!(result.response_data, None);
}

#[tokio::test]
async fn test_probe_request_shape() {
    let mut client = MockProxyClient::new();
    client.add_response(OPENSOURCE_URL, 200, HEALTHY_COMPLETION);
    let config = test_config(&[Provider::Opensource]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    checker.check_provider(Provider::Opensource, &token()).await;

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, OPENSOURCE_URL);
    assert_eq!(request.timeout, Duration::from_secs(5));
    assert_eq!(request.header_value("Authorization"), Some("Bearer tok-abc123"));
    assert_eq!(request.header_value("X-User-OpenAI-Key"), None);

    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["model"], "openai--gpt-oss-120b");
    assert_eq!(body["max_tokens"], 10);
    assert_eq!(body["stream"], false);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(
        body["messages"][0]["content"],
        "Say 'Health check successful' and nothing else."
    );
}

#[tokio::test]
async fn test_openai_request_carries_key_and_org() {
    let mut client = MockProxyClient::new();
    client.add_response(OPENAI_URL, 200, HEALTHY_COMPLETION);
    let config = with_all_keys(test_config(&[Provider::Openai]));
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Openai, &token()).await;
    assert!(result.passed());

    let request = &client.requests()[0];
    assert_eq!(request.header_value("X-User-OpenAI-Key"), Some("sk-test-openai"));
    assert_eq!(request.header_value("X-User-OpenAI-Org"), Some("org-test"));
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["model"], "gpt-3.5-turbo");
}

#[test]
fn test_openai_org_header_is_optional() {
    let mut config = with_all_keys(test_config(&[Provider::Openai]));
    config.api_keys.openai_org = None;
    let logger = EnhancedDebugLogger::disabled();
    let client = MockProxyClient::new();
    let checker = HealthChecker::new(&client, &config, &logger);

    let request = checker.build_probe_request(Provider::Openai, &token()).unwrap();
    assert_eq!(request.header_value("X-User-OpenAI-Key"), Some("sk-test-openai"));
    assert_eq!(request.header_value("X-User-OpenAI-Org"), None);
}

#[tokio::test]
async fn test_anthropic_request_uses_messages_route() {
    let mut client = MockProxyClient::new();
    client.add_response(ANTHROPIC_URL, 200, HEALTHY_MESSAGE);
    let config = with_all_keys(test_config(&[Provider::Anthropic]));
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Anthropic, &token()).await;
    assert!(result.passed());

    let request = &client.requests()[0];
    assert_eq!(request.url, ANTHROPIC_URL);
    assert_eq!(request.header_value("X-User-Anthropic-Key"), Some("sk-ant-test"));
    assert_eq!(request.header_value("X-User-OpenAI-Org"), None);
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["model"], "claude-3-haiku-20240307");
}

#[tokio::test]
async fn test_missing_api_key_fails_without_request() {
    let client = MockProxyClient::new();
    let config = test_config(&[Provider::Openai, Provider::Anthropic]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let openai = checker.check_provider(Provider::Openai, &token()).await;
    assert_eq!(openai.outcome, CheckOutcome::Fail);
    assert_eq!(openai.error.as_deref(), Some("OpenAI API key not configured"));
    assert_eq!(openai.failure, Some(FailureKind::MissingApiKey));
    assert_eq!(openai.status_code, None);

    let anthropic = checker.check_provider(Provider::Anthropic, &token()).await;
    assert_eq!(anthropic.error.as_deref(), Some("Anthropic API key not configured"));

    assert!(client.requests().is_empty());
}

#[test]
fn test_build_probe_request_reports_missing_key() {
    let client = MockProxyClient::new();
    let config = test_config(&[Provider::Openai]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let err = checker
        .build_probe_request(Provider::Openai, &token())
        .unwrap_err();
    assert!(matches!(
        err,
        HealthCheckError::MissingApiKey { provider: Provider::Openai }
    ));
}

#[tokio::test]
async fn test_server_error_fails_with_extracted_message() {
    let mut client = MockProxyClient::new();
    client.add_response(
        OPENSOURCE_URL,
        500,
        r#"{"error": {"message": "upstream model unavailable", "type": "server_error"}}"#,
    );
    let config = test_config(&[Provider::Opensource]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Opensource, &token()).await;

    assert_eq!(result.outcome, CheckOutcome::Fail);
    assert_eq!(result.status_code, Some(500));
    assert_eq!(result.error.as_deref(), Some("upstream model unavailable"));
    assert_eq!(result.failure, Some(FailureKind::Provider));
}

#[tokio::test]
async fn test_ok_status_with_error_body_fails() {
    let mut client = MockProxyClient::new();
    client.add_response(OPENSOURCE_URL, 200, r#"{"error": "quota exceeded"}"#);
    let config = test_config(&[Provider::Opensource]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Opensource, &token()).await;

    assert_eq!(result.outcome, CheckOutcome::Fail);
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.error.as_deref(), Some("quota exceeded"));
}

#[tokio::test]
async fn test_ok_status_with_non_json_body_fails() {
    let mut client = MockProxyClient::new();
    client.add_response(OPENSOURCE_URL, 200, "<html>maintenance</html>");
    let config = test_config(&[Provider::Opensource]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Opensource, &token()).await;

    assert_eq!(result.outcome, CheckOutcome::Fail);
    assert_eq!(result.error.as_deref(), Some("<html>maintenance</html>"));
}

#[tokio::test]
async fn test_redirect_is_not_success() {
    let mut client = MockProxyClient::new();
    client.add_response(OPENSOURCE_URL, 302, "");
    let config = test_config(&[Provider::Opensource]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Opensource, &token()).await;

    assert_eq!(result.outcome, CheckOutcome::Fail);
    assert_eq!(result.status_code, Some(302));
    assert_eq!(result.error.as_deref(), Some("empty response body"));
}

#[tokio::test]
async fn test_timeout_is_network_failure() {
    let mut client = MockProxyClient::new();
    client.add_error(OPENSOURCE_URL, TransportError::Timeout(Duration::from_secs(5)));
    let config = test_config(&[Provider::Opensource]);
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Opensource, &token()).await;

    assert_eq!(result.outcome, CheckOutcome::Fail);
    assert_eq!(result.failure, Some(FailureKind::Network));
    assert_eq!(result.status_code, None);
    assert_eq!(result.error.as_deref(), Some("request timed out after 5s"));
}

#[tokio::test]
async fn test_verbose_keeps_response_data() {
    let mut client = MockProxyClient::new();
    client.add_response(OPENSOURCE_URL, 200, HEALTHY_COMPLETION);
    let mut config = test_config(&[Provider::Opensource]);
    config.verbose = true;
    let logger = EnhancedDebugLogger::disabled();
    let checker = HealthChecker::new(&client, &config, &logger);

    let result = checker.check_provider(Provider::Opensource, &token()).await;

    let data = result.response_data.expect("verbose result keeps the body");
    assert_eq!(
        data["choices"][0]["message"]["content"],
        "Health check successful"
    );
}
