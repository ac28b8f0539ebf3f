// Terminal rendering for the health check run
use ansi_term::{Colour, Style};
use std::io::{self, Write};

use crate::core::error::HealthCheckError;
use crate::core::health::parsing::truncate_chars;
use crate::core::health::types::{HealthCheckResult, HealthReport, Provider, SessionToken};

const HEADER_WIDTH: usize = 60;
/// Error text longer than this is cut in the compact view; verbose output keeps it whole
const MAX_COMPACT_ERROR_LEN: usize = 200;

/// Renders progress, per-provider status lines and the summary
pub struct ReportRenderer {
    color: bool,
}

impl ReportRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&self, out: &mut dyn Write, text: &str, style: Style) -> io::Result<()> {
        writeln!(out, "{}", self.paint(text, style))
    }

    /// Blank line, then a centered title between `=` rules
    pub fn header(&self, out: &mut dyn Write, title: &str) -> io::Result<()> {
        let rule = "=".repeat(HEADER_WIDTH);
        let style = Colour::Cyan.bold();
        writeln!(out)?;
        self.line(out, &rule, style)?;
        self.line(out, &format!("{:^width$}", title, width = HEADER_WIDTH), style)?;
        self.line(out, &rule, style)
    }

    pub fn run_info(
        &self,
        out: &mut dyn Write,
        proxy_url: &str,
        username: &str,
        providers: &[Provider],
    ) -> io::Result<()> {
        let names: Vec<&str> = providers.iter().map(Provider::as_str).collect();
        let style = Colour::Cyan.normal();
        self.line(out, &format!("Proxy URL: {}", proxy_url), style)?;
        self.line(out, &format!("Username: {}", username), style)?;
        self.line(out, &format!("Providers: {}", names.join(", ")), style)
    }

    pub fn registering(&self, out: &mut dyn Write, username: &str) -> io::Result<()> {
        writeln!(out)?;
        self.line(out, &format!("Registering user '{}'...", username), Colour::Blue.normal())
    }

    pub fn registration_succeeded(&self, out: &mut dyn Write, username: &str) -> io::Result<()> {
        self.line(
            out,
            &format!("✓ Registration successful for user: {}", username),
            Colour::Green.normal(),
        )
    }

    pub fn token(&self, out: &mut dyn Write, token: &SessionToken) -> io::Result<()> {
        writeln!(out)?;
        self.line(out, "Session Token:", Colour::Yellow.normal())?;
        self.line(out, token.as_str(), Colour::White.normal())
    }

    pub fn token_only_notice(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        self.line(out, "Token-only mode: Skipping health checks.", Colour::Yellow.normal())
    }

    pub fn testing(&self, out: &mut dyn Write, provider: Provider) -> io::Result<()> {
        writeln!(out)?;
        self.line(
            out,
            &format!("Testing {} provider...", provider.as_str()),
            Colour::Blue.normal(),
        )
    }

    /// Compact status line, green on PASS and red on FAIL
    pub fn provider_status(&self, out: &mut dyn Write, result: &HealthCheckResult) -> io::Result<()> {
        let style = if result.passed() {
            Colour::Green.normal()
        } else {
            Colour::Red.normal()
        };
        self.line(out, &format_status_line(result), style)
    }

    /// Full JSON record for one provider (verbose mode)
    pub fn verbose_result(&self, out: &mut dyn Write, result: &HealthCheckResult) -> io::Result<()> {
        writeln!(out)?;
        self.line(
            out,
            &format!("Detailed response for {}:", result.provider.as_str()),
            Colour::Yellow.normal(),
        )?;
        let json = serde_json::to_string_pretty(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        // Uncoloured so it can be piped into a JSON tool
        writeln!(out, "{}", json)
    }

    pub fn summary(&self, out: &mut dyn Write, report: &HealthReport) -> io::Result<()> {
        self.header(out, "Summary")?;
        self.line(out, &format!("Total Tests: {}", report.total()), Colour::Cyan.normal())?;
        self.line(out, &format!("Passed: {}", report.passed()), Colour::Green.normal())?;
        let failed_style = if report.failed() > 0 {
            Colour::Red.normal()
        } else {
            Colour::Green.normal()
        };
        self.line(out, &format!("Failed: {}", report.failed()), failed_style)
    }

    /// Fatal error; registration failures also say why nothing was checked
    pub fn fatal(&self, out: &mut dyn Write, error: &HealthCheckError) -> io::Result<()> {
        let style = Colour::Red.normal();
        match error {
            HealthCheckError::Configuration(e) => self.line(out, &format!("Error: {}", e), style),
            e @ HealthCheckError::ClientSetup(_) => self.line(out, &format!("Error: {}", e), style),
            e if e.is_registration_failure() => {
                self.line(out, &format!("✗ {}", e), style)?;
                self.line(out, "Registration failed. Cannot proceed with health checks.", style)
            }
            e => {
                writeln!(out)?;
                self.line(out, &format!("Unexpected error: {}", e), style)
            }
        }
    }

    pub fn interrupted(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out)?;
        self.line(out, "Health check interrupted by user.", Colour::Yellow.normal())
    }
}

/// `Provider     [PASS]   (0.42s)` or `Provider     [FAIL]   (0.42s) HTTP 401 - message`
pub fn format_status_line(result: &HealthCheckResult) -> String {
    let provider_text = format!("{:<12}", result.provider.display_name());
    let status_text = format!("{:<8}", format!("[{}]", result.outcome));
    let mut details = format!("({:.2}s)", result.response_time_secs());

    if !result.passed() {
        let error = result.error.as_deref().unwrap_or("unknown error");
        let error = truncate_chars(error, MAX_COMPACT_ERROR_LEN);
        match result.status_code {
            Some(code) => details.push_str(&format!(" Error: HTTP {} - {}", code, error)),
            None => details.push_str(&format!(" Error: {}", error)),
        }
    }

    format!("{} {} {}", provider_text, status_text, details)
}
