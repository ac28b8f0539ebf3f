use std::collections::HashMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Hardcoded configuration - only the on/off switch comes from the environment
const LOG_ROTATION_SIZE_MB: u64 = 8;
const MAX_ARCHIVES: u32 = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

pub const DEBUG_ENV_VAR: &str = "HEALTHCHECK_DEBUG";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,                              // ISO-8601 with timezone
    pub level: String,                                  // DEBUG, ERROR, PERF, AUTH, CHECK, CONFIG
    pub component: String,                              // Component name
    pub event: String,                                  // Event type
    pub message: String,                                // Human readable message (redacted)
    pub correlation_id: Option<String>,                 // Ties start/end events together
    pub fields: HashMap<String, serde_json::Value>,     // Structured data
}

struct RotatingLogger {
    log_path: PathBuf,
    write_count: AtomicU32,
}

impl RotatingLogger {
    fn new(log_path: PathBuf) -> Self {
        // Ensure parent directory exists
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        Self {
            log_path,
            write_count: AtomicU32::new(0),
        }
    }

    fn write_with_rotation(&self, json_line: &str) -> io::Result<()> {
        // Check for rotation every ROTATION_CHECK_INTERVAL writes
        if self.write_count.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate_if_needed(); // Rotation errors must not stop logging
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        writeln!(file, "{}", json_line)?;
        Ok(())
    }

    fn rotate_if_needed(&self) -> io::Result<()> {
        if !self.needs_rotation()? {
            return Ok(());
        }

        // Lock file keeps concurrent runs from rotating twice
        let lock_path = self.log_path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                // Re-check after acquiring the lock
                if self.needs_rotation()? {
                    self.perform_rotation()?;
                }
                let _ = std::fs::remove_file(&lock_path);
                Ok(())
            }
            Err(_) => Ok(()), // Another process is rotating
        }
    }

    fn needs_rotation(&self) -> io::Result<bool> {
        if !self.log_path.exists() {
            return Ok(false);
        }

        let metadata = std::fs::metadata(&self.log_path)?;
        Ok(metadata.len() >= LOG_ROTATION_SIZE_MB * 1024 * 1024)
    }

    fn log_dir_and_stem(&self) -> io::Result<(PathBuf, String)> {
        let dir = self
            .log_path
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no parent"))?;
        let stem = self
            .log_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?
            .to_string();
        Ok((dir, stem))
    }

    fn perform_rotation(&self) -> io::Result<()> {
        let (log_dir, base_name) = self.log_dir_and_stem()?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let archive_path = log_dir.join(format!("{}.{}.gz", base_name, timestamp));

        // Move current log aside, compress, then drop the temp file
        let temp_path = self.log_path.with_extension("rotating");
        std::fs::rename(&self.log_path, &temp_path)?;

        let source_file = File::open(&temp_path)?;
        let target_file = File::create(&archive_path)?;
        let mut encoder = GzEncoder::new(target_file, Compression::default());
        io::copy(&mut BufReader::new(source_file), &mut encoder)?;
        encoder.finish()?;

        std::fs::remove_file(&temp_path)?;

        let _ = self.cleanup_old_archives();
        Ok(())
    }

    fn cleanup_old_archives(&self) -> io::Result<()> {
        let (log_dir, base_name) = self.log_dir_and_stem()?;
        let prefix = format!("{}.", base_name);

        let mut archives = Vec::new();
        for entry in std::fs::read_dir(log_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            if name.starts_with(&prefix) && name.ends_with(".gz") {
                archives.push((entry.path(), entry.metadata()?.modified()?));
            }
        }

        // Keep only the most recent MAX_ARCHIVES
        archives.sort_by_key(|(_, modified)| *modified);
        if archives.len() > MAX_ARCHIVES as usize {
            let to_remove = archives.len() - MAX_ARCHIVES as usize;
            for (path, _) in archives.iter().take(to_remove) {
                let _ = std::fs::remove_file(path);
            }
        }

        Ok(())
    }
}

/// JSON Lines debug logger, off unless `HEALTHCHECK_DEBUG` is truthy
pub struct EnhancedDebugLogger {
    enabled: bool,
    rotating_logger: Option<Arc<Mutex<RotatingLogger>>>,
    session_id: String, // Correlation ID for this run
    redaction_patterns: Vec<Regex>,
}

impl EnhancedDebugLogger {
    pub fn new() -> Self {
        let enabled = Self::parse_debug_enabled();
        Self::with_path(enabled, Self::default_log_path())
    }

    /// Logger writing to an explicit path
    pub fn with_path(enabled: bool, log_path: PathBuf) -> Self {
        let session_id = Uuid::new_v4().to_string()[..8].to_string();

        let rotating_logger = if enabled {
            Some(Arc::new(Mutex::new(RotatingLogger::new(log_path))))
        } else {
            None
        };

        Self {
            enabled,
            rotating_logger,
            session_id,
            redaction_patterns: Self::compile_redaction_patterns(),
        }
    }

    pub fn disabled() -> Self {
        Self::with_path(false, PathBuf::new())
    }

    /// Supports: true/false, 1/0, yes/no, on/off (case insensitive)
    fn parse_debug_enabled() -> bool {
        env::var(DEBUG_ENV_VAR)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    pub fn default_log_path() -> PathBuf {
        let mut log_path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        log_path.push(".llm-proxy-health");
        log_path.push("health-debug.log");
        log_path
    }

    fn compile_redaction_patterns() -> Vec<Regex> {
        let patterns = [
            r"(?i)authorization[:\s]+(?:bearer\s+)?[^\s\n]+",
            r"(?i)bearer[:\s]+[^\s\n]+",
            r"(?i)\btoken[:\s=]+[^\s\n]+",
            r"(?i)\bpin[:\s=]+[^\s\n]+",
            r"(?i)password[:\s]+[^\s\n]+",
            r"(?i)api[_-]?key[:\s=]+[^\s\n]+",
            r"(?i)secret[:\s]+[^\s\n]+",
            r"sk-[A-Za-z0-9_-]{8,}",
        ];

        patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    }

    /// Redaction guardrails for sensitive data
    pub fn redact_sensitive_data(&self, text: &str) -> String {
        let mut redacted = text.to_string();

        for regex in &self.redaction_patterns {
            redacted = regex.replace_all(&redacted, "[REDACTED]").to_string();
        }

        // Suspiciously long unbroken strings are likely tokens
        if redacted.len() > 100
            && !redacted.contains(' ')
            && redacted
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c))
        {
            redacted = format!("[REDACTED_LONG_STRING_{}chars]", redacted.len());
        }

        redacted
    }

    fn log_sync(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        correlation_id: Option<String>,
        fields: HashMap<String, serde_json::Value>,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact_sensitive_data(message),
            correlation_id: correlation_id.or_else(|| Some(self.session_id.clone())),
            fields,
        };

        if let Some(logger) = &self.rotating_logger {
            if let Ok(logger) = logger.lock() {
                if let Ok(json_line) = serde_json::to_string(&entry) {
                    let _ = logger.write_with_rotation(&json_line); // Logging never fails the run
                }
            }
        }
    }

    pub fn debug_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("DEBUG", component, event, message, None, HashMap::new());
    }

    pub fn error_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("ERROR", component, event, message, None, HashMap::new());
    }

    pub fn performance_sync(&self, component: &str, operation: &str, duration_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("duration_ms".to_string(), serde_json::Value::Number(duration_ms.into()));

        self.log_sync("PERF", component, "operation_complete", operation, None, fields);
    }

    // Typed events for the health check run

    pub fn config_loaded(&self, proxy_url: &str, providers: &[&str], timeout_secs: u64) {
        let mut fields = HashMap::new();
        fields.insert("proxy_url".to_string(), serde_json::Value::String(proxy_url.to_string()));
        fields.insert(
            "providers".to_string(),
            serde_json::Value::Array(
                providers
                    .iter()
                    .map(|p| serde_json::Value::String(p.to_string()))
                    .collect(),
            ),
        );
        fields.insert("timeout_secs".to_string(), serde_json::Value::Number(timeout_secs.into()));

        self.log_sync("CONFIG", "ConfigLoader", "config_loaded",
                     &format!("Configuration loaded for {}", proxy_url),
                     None, fields);
    }

    pub fn registration_start(&self, username: &str) {
        let mut fields = HashMap::new();
        fields.insert("username".to_string(), serde_json::Value::String(username.to_string()));

        self.log_sync("AUTH", "Authenticator", "register_start",
                     &format!("Registering user '{}'", username),
                     None, fields);
    }

    pub fn registration_end(&self, status: &str, http_status: Option<u16>, duration_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), serde_json::Value::String(status.to_string()));
        fields.insert("duration_ms".to_string(), serde_json::Value::Number(duration_ms.into()));

        if let Some(code) = http_status {
            fields.insert("http_status".to_string(), serde_json::Value::Number(code.into()));
        }

        self.log_sync("AUTH", "Authenticator", "register_end",
                     &format!("Registration finished: {} ({}ms)", status, duration_ms),
                     None, fields);
    }

    pub fn check_start(&self, provider: &str, timeout_ms: u64, correlation_id: String) {
        let mut fields = HashMap::new();
        fields.insert("provider".to_string(), serde_json::Value::String(provider.to_string()));
        fields.insert("timeout_ms".to_string(), serde_json::Value::Number(timeout_ms.into()));

        self.log_sync("CHECK", "HealthChecker", "check_start",
                     &format!("Checking {} provider", provider),
                     Some(correlation_id), fields);
    }

    pub fn check_end(&self, provider: &str, outcome: &str, http_status: Option<u16>, duration_ms: u64, correlation_id: String) {
        let mut fields = HashMap::new();
        fields.insert("provider".to_string(), serde_json::Value::String(provider.to_string()));
        fields.insert("outcome".to_string(), serde_json::Value::String(outcome.to_string()));
        fields.insert("duration_ms".to_string(), serde_json::Value::Number(duration_ms.into()));

        if let Some(code) = http_status {
            fields.insert("http_status".to_string(), serde_json::Value::Number(code.into()));
        }

        self.log_sync("CHECK", "HealthChecker", "check_end",
                     &format!("Check completed: {} {} ({}ms)", provider, outcome, duration_ms),
                     Some(correlation_id), fields);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_session_id(&self) -> &str {
        &self.session_id
    }
}

impl Default for EnhancedDebugLogger {
    fn default() -> Self {
        Self::new()
    }
}
