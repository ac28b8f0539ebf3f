/*!
Health check run orchestration.

The run is strictly linear:

```text
ConfigLoaded → Authenticated → CheckingProvider_1 … CheckingProvider_n → ReportRendered
```

Registration failures end the run with an error before any provider is
checked. Provider failures are recorded in that provider's result and the
next provider is checked regardless.
*/

use std::io::Write;
use std::time::Instant;

use crate::config::{Config, RunMode};
use crate::core::debug_logger::EnhancedDebugLogger;
use crate::core::error::{HealthCheckError, EXIT_FAILURE, EXIT_SUCCESS};
use crate::core::health::{
    Authenticator, HealthChecker, HealthReport, IsahcProxyClient, ProxyClient, SessionToken,
};
use crate::core::report::ReportRenderer;

/// How a successful run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Token-only mode: registration succeeded, no checks were run
    TokenIssued(SessionToken),
    /// Full check: one result per selected provider
    Checked(HealthReport),
}

impl RunOutcome {
    /// 0 when every requested check passed (or token-only succeeded), else 1
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::TokenIssued(_) => EXIT_SUCCESS,
            RunOutcome::Checked(report) if report.all_passed() => EXIT_SUCCESS,
            RunOutcome::Checked(_) => EXIT_FAILURE,
        }
    }
}

pub struct HealthCheckRunner {
    config: Config,
    client: Box<dyn ProxyClient>,
    logger: EnhancedDebugLogger,
    renderer: ReportRenderer,
}

impl HealthCheckRunner {
    /// Runner using the production isahc client and the env-controlled debug logger
    pub fn new(config: Config) -> Result<Self, HealthCheckError> {
        let client = IsahcProxyClient::new().map_err(HealthCheckError::ClientSetup)?;
        let client: Box<dyn ProxyClient> = Box::new(client);
        Ok(Self::with_client(config, client).with_logger(EnhancedDebugLogger::new()))
    }

    /// Runner over any transport; debug logging stays off until `with_logger`
    pub fn with_client(config: Config, client: Box<dyn ProxyClient>) -> Self {
        let renderer = ReportRenderer::new(config.color);
        Self {
            config,
            client,
            logger: EnhancedDebugLogger::disabled(),
            renderer,
        }
    }

    pub fn with_logger(mut self, logger: EnhancedDebugLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// Run to completion, rendering any fatal error, and return the process exit code
    pub async fn execute(&self, out: &mut dyn Write) -> u8 {
        match self.run(&mut *out).await {
            Ok(outcome) => outcome.exit_code(),
            Err(e) => {
                let _ = self.renderer.fatal(out, &e);
                e.exit_code()
            }
        }
    }

    /// Register, then check each selected provider in order, writing progress to `out`
    pub async fn run(&self, out: &mut dyn Write) -> Result<RunOutcome, HealthCheckError> {
        let started = Instant::now();
        let config = &self.config;
        let renderer = &self.renderer;
        let provider_names: Vec<&str> = config.providers.iter().map(|p| p.as_str()).collect();
        self.logger.config_loaded(
            &config.proxy_base_url,
            &provider_names,
            config.timeout.as_secs(),
        );

        renderer.header(out, "LLM Proxy Health Checker")?;
        renderer.run_info(
            out,
            &config.proxy_base_url,
            &config.credentials.username,
            &config.providers,
        )?;

        // Authenticated
        renderer.registering(out, &config.credentials.username)?;
        let authenticator = Authenticator::new(
            self.client.as_ref(),
            &config.proxy_base_url,
            config.timeout,
            &self.logger,
        );
        let token = authenticator
            .register(&config.credentials.username, &config.credentials.pin)
            .await?;
        renderer.registration_succeeded(out, &config.credentials.username)?;

        if config.mode.shows_token() {
            renderer.token(out, &token)?;
        }
        if config.mode == RunMode::TokenOnly {
            self.logger
                .debug_sync("HealthCheckRunner", "token_only", "Skipping provider checks");
            renderer.token_only_notice(out)?;
            return Ok(RunOutcome::TokenIssued(token));
        }

        // CheckingProvider_i
        renderer.header(out, "Health Check Results")?;
        let checker = HealthChecker::new(self.client.as_ref(), config, &self.logger);
        let mut report = HealthReport::default();
        for &provider in &config.providers {
            renderer.testing(out, provider)?;
            let result = checker.check_provider(provider, &token).await;
            renderer.provider_status(out, &result)?;
            if config.verbose {
                renderer.verbose_result(out, &result)?;
            }
            report.results.push(result);
        }

        // ReportRendered
        renderer.summary(out, &report)?;
        self.logger.performance_sync(
            "HealthCheckRunner",
            &format!("{}/{} checks passed", report.passed(), report.total()),
            started.elapsed().as_millis() as u64,
        );
        Ok(RunOutcome::Checked(report))
    }
}
