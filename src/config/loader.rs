//! Configuration loading
//!
//! Resolution order, highest priority first:
//!
//! 1. **Command-line arguments** - username, PIN, provider selection, verbosity and run mode
//! 2. **Process environment** - any of the keys in [`CONFIG_KEYS`]
//! 3. **Dotenv file** - `--env-file PATH`, or `./.env` when present
//! 4. **Built-in defaults** - proxy URL and a 30 second timeout
//!
//! Empty values and the template placeholders (`your_openai_api_key_here`, ...) are
//! treated as missing at every level.
//!
//! ## Dotenv syntax
//!
//! - `KEY=value` and `export KEY=value`
//! - `"double quoted"` (escaped quotes allowed) and `'single quoted'` values
//! - trailing ` # comment` after an unquoted value; a `#` inside a value is kept
//! - blank lines and `#` comment lines are skipped

use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use super::defaults::{
    CONFIG_KEYS, DEFAULT_ENV_FILE, DEFAULT_PROXY_BASE_URL, DEFAULT_TIMEOUT_SECS,
    KEY_ANTHROPIC_API_KEY, KEY_DEFAULT_PIN, KEY_DEFAULT_USERNAME, KEY_OPENAI_API_KEY,
    KEY_OPENAI_ORG_ID, KEY_PROXY_BASE_URL, KEY_PROXY_TIMEOUT, NO_COLOR_ENV, PLACEHOLDER_VALUES,
};
use super::types::{ApiKeys, Config, ConfigError, Credentials, RunMode};
use crate::cli::Cli;
use crate::core::health::url::validate_base_url;
use crate::core::health::Provider;

/// Flat key/value view over the dotenv file and the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the dotenv file (explicit path or `./.env`) and overlay the process environment
    ///
    /// A missing default `.env` is fine; a missing explicit `--env-file` is an error.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut vars = match env_file {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_ENV_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::new()
                }
            }
        };

        vars.overlay_process_env();
        Ok(vars)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_dotenv(&content)
    }

    /// Parse dotenv content; later assignments of the same key win
    pub fn parse_dotenv(content: &str) -> Result<Self, ConfigError> {
        // Matches: KEY=value, export KEY="value", KEY='value'
        let assignment_regex =
            Regex::new(r#"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$"#)
                .map_err(|e| ConfigError::EnvParse(e.to_string()))?;
        let mut vars = HashMap::new();

        for line in content.lines() {
            let trimmed_line = line.trim_start();

            // Skip comments and blanks
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            if let Some(captures) = assignment_regex.captures(line) {
                let key = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                let raw_value = captures.get(2).map(|m| m.as_str()).unwrap_or("");
                vars.insert(key.to_string(), extract_dotenv_value(raw_value));
            }
        }

        Ok(Self { vars })
    }

    /// Process environment beats the dotenv file
    fn overlay_process_env(&mut self) {
        for key in CONFIG_KEYS {
            if let Ok(value) = env::var(key) {
                if !value.trim().is_empty() {
                    self.vars.insert(key.to_string(), value);
                }
            }
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Value for `key`, or None when unset, blank, or a template placeholder
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = self.vars.get(key)?.trim();
        if value.is_empty() || PLACEHOLDER_VALUES.contains(&value) {
            return None;
        }
        Some(value)
    }

    fn get_owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

impl Config {
    /// Load the dotenv file and environment, then resolve against the CLI
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let vars = EnvVars::load(cli.env_file.as_deref())?;
        let mut config = Self::resolve(cli, &vars)?;
        config.color = color_enabled(cli.no_color);
        Ok(config)
    }

    /// Resolve configuration from already-loaded key/values
    pub fn resolve(cli: &Cli, vars: &EnvVars) -> Result<Self, ConfigError> {
        let username = non_empty(cli.username.as_deref())
            .map(str::to_string)
            .or_else(|| vars.get_owned(KEY_DEFAULT_USERNAME))
            .ok_or(ConfigError::MissingUsername)?;
        let pin = non_empty(cli.pin.as_deref())
            .map(str::to_string)
            .or_else(|| vars.get_owned(KEY_DEFAULT_PIN))
            .ok_or(ConfigError::MissingPin)?;

        let raw_base_url = vars
            .get(KEY_PROXY_BASE_URL)
            .unwrap_or(DEFAULT_PROXY_BASE_URL);
        let proxy_base_url =
            validate_base_url(raw_base_url).map_err(|e| ConfigError::InvalidBaseUrl {
                url: raw_base_url.to_string(),
                reason: e.to_string(),
            })?;

        let timeout = match vars.get(KEY_PROXY_TIMEOUT) {
            Some(raw) => parse_timeout(raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let mode = if cli.token_only {
            RunMode::TokenOnly
        } else {
            RunMode::FullCheck {
                show_token: cli.show_token,
            }
        };

        Ok(Config {
            proxy_base_url,
            timeout,
            credentials: Credentials { username, pin },
            api_keys: ApiKeys {
                openai: vars.get_owned(KEY_OPENAI_API_KEY),
                openai_org: vars.get_owned(KEY_OPENAI_ORG_ID),
                anthropic: vars.get_owned(KEY_ANTHROPIC_API_KEY),
            },
            providers: select_providers(&cli.providers),
            verbose: cli.verbose,
            mode,
            color: !cli.no_color,
        })
    }
}

/// Requested providers in order, first occurrence only; empty selection means all
pub fn select_providers(requested: &[Provider]) -> Vec<Provider> {
    if requested.is_empty() {
        return Provider::ALL.to_vec();
    }

    let mut selected = Vec::with_capacity(requested.len());
    for provider in requested {
        if !selected.contains(provider) {
            selected.push(*provider);
        }
    }
    selected
}

/// Colour unless `--no-color` was given or `NO_COLOR` is set to anything non-empty
pub fn color_enabled(no_color_flag: bool) -> bool {
    let no_color_env = env::var(NO_COLOR_ENV)
        .map(|v| !v.is_empty())
        .unwrap_or(false);
    !no_color_flag && !no_color_env
}

/// Whole, positive seconds
pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Extract the value part of an assignment, handling quotes and trailing comments
fn extract_dotenv_value(raw_value: &str) -> String {
    let value = raw_value.trim();

    if value.starts_with('"') {
        // Double quoted - find the closing quote, handling escaped quotes
        if let Some(end_pos) = find_closing_quote(value, '"', 1) {
            return value[1..end_pos].replace("\\\"", "\"");
        }
    } else if let Some(stripped) = value.strip_prefix('\'') {
        // Single quoted - no escaping
        if let Some(end_pos) = stripped.find('\'') {
            return stripped[..end_pos].to_string();
        }
    } else {
        // Unquoted - a `#` starts a comment only at the start or after whitespace
        let mut previous: Option<char> = None;
        for (i, ch) in value.char_indices() {
            if ch == '#' && previous.map_or(true, char::is_whitespace) {
                return value[..i].trim_end().to_string();
            }
            previous = Some(ch);
        }
        return value.to_string();
    }

    // Unterminated quote: keep the whole value
    value.to_string()
}

/// Byte offset of the closing quote, skipping quotes preceded by an odd number of backslashes
fn find_closing_quote(value: &str, quote_char: char, start: usize) -> Option<usize> {
    let mut escapes = 0usize;
    for (i, ch) in value.char_indices().skip_while(|(i, _)| *i < start) {
        if ch == quote_char && escapes % 2 == 0 {
            return Some(i);
        }
        escapes = if ch == '\\' { escapes + 1 } else { 0 };
    }
    None
}
